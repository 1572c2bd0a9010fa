// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

/// Colors used when printing a stack trace to a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub error: String,
    pub warning: String,
    pub frame: String,
    pub dim: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            error: "red".into(),
            warning: "yellow".into(),
            frame: "cyan".into(),
            dim: "bright_black".into(),
        }
    }
}
