pub mod ansi;
pub mod loader;
pub mod types;

pub use loader::{load_theme, load_theme_from};
pub use types::Theme;
