// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! The fixed stage sequence the fixture walks through.
//!
//! Labels are cosmetic: every stage behaves identically, they only make the
//! resulting trail easier to read.

use std::fmt;

/// Stage labels in call order.
pub const STAGE_NAMES: [&str; 18] = [
    "get_user",
    "create_user",
    "set_user",
    "add_user",
    "delete_user",
    "ban_user",
    "update_user",
    "display_user",
    "login",
    "logout",
    "get_account_details",
    "get_event",
    "log_issue",
    "get_options",
    "set_options",
    "get_session",
    "refresh_session",
    "close_session",
];

pub const STAGE_COUNT: usize = STAGE_NAMES.len();

/// Highest value the per-stage depth counter reaches before advancing.
pub const MAX_DEPTH: u8 = 5;

pub const FRAMES_PER_STAGE: usize = MAX_DEPTH as usize + 1;

/// Number of stage frames live at the failure point.
pub const CHAIN_DEPTH: usize = STAGE_COUNT * FRAMES_PER_STAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    position: usize,
}

impl Stage {
    pub const fn first() -> Self {
        Self { position: 0 }
    }

    pub const fn at(position: usize) -> Option<Self> {
        if position < STAGE_COUNT {
            Some(Self { position })
        } else {
            None
        }
    }

    /// The stage that follows this one, `None` on the last stage.
    pub const fn next(self) -> Option<Self> {
        Self::at(self.position + 1)
    }

    pub const fn is_last(self) -> bool {
        self.position + 1 == STAGE_COUNT
    }

    pub const fn position(self) -> usize {
        self.position
    }

    pub const fn name(self) -> &'static str {
        STAGE_NAMES[self.position]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_walks_every_stage_once() {
        let mut seen = vec![Stage::first().name()];
        let mut stage = Stage::first();
        while let Some(next) = stage.next() {
            seen.push(next.name());
            stage = next;
        }
        assert_eq!(seen, STAGE_NAMES.to_vec());
        assert!(stage.is_last());
    }

    #[test]
    fn test_at_out_of_range() {
        assert!(Stage::at(STAGE_COUNT).is_none());
        assert_eq!(Stage::at(STAGE_COUNT - 1).map(Stage::name), Some("close_session"));
    }

    #[test]
    fn test_chain_depth() {
        assert_eq!(STAGE_COUNT, 18);
        assert_eq!(FRAMES_PER_STAGE, 6);
        assert_eq!(CHAIN_DEPTH, 108);
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(Stage::first().to_string(), "get_user");
        assert!(!Stage::first().is_last());
    }
}
