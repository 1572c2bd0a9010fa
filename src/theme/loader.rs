// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::types::Theme;
use crate::config::paths::theme_path;

#[derive(Debug, Deserialize)]
struct ThemeConfig {
    error: Option<String>,
    warning: Option<String>,
    frame: Option<String>,
    dim: Option<String>,
}

/// Load the theme from the configured path, falling back to defaults.
pub fn load_theme() -> Theme {
    load_theme_from(&theme_path())
}

/// Missing files and malformed JSON both yield the default theme; missing
/// fields fall back individually.
pub fn load_theme_from(path: &Path) -> Theme {
    let default = Theme::default();

    let Ok(content) = fs::read_to_string(path) else {
        return default;
    };

    let config = match serde_json::from_str::<ThemeConfig>(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed theme file");
            return default;
        }
    };

    Theme {
        error: config.error.unwrap_or(default.error),
        warning: config.warning.unwrap_or(default.warning),
        frame: config.frame.unwrap_or(default.frame),
        dim: config.dim.unwrap_or(default.dim),
    }
}
