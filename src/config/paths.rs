use std::path::PathBuf;

/// Environment variable that overrides the theme file location.
pub const THEME_PATH_ENV: &str = "STACK_FIXTURE_THEME";

pub fn theme_path() -> PathBuf {
    if let Some(path) = std::env::var_os(THEME_PATH_ENV) {
        return PathBuf::from(path);
    }

    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".stack-fixture");
    path.push("theme.json");
    path
}
