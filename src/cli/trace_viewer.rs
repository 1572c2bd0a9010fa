// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

use std::io::IsTerminal;

use crate::stack_trace::StackTrace;
use crate::theme::load_theme;

/// Render a trace for stdout, colored only when stdout is a terminal.
pub fn render_trace(trace: &StackTrace) -> String {
    if std::io::stdout().is_terminal() {
        trace.display_themed(&load_theme())
    } else {
        trace.display()
    }
}
