// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! Deep call chain that always ends in a [`FixtureError`].
//!
//! Every stage re-enters the shared [`descend`] helper until its depth
//! counter reaches [`MAX_DEPTH`], then hands off to the next stage at depth
//! zero. After the last stage the terminal [`fail`] raises the error, so the
//! stack at that point holds `STAGE_COUNT * FRAMES_PER_STAGE` chain frames.

use std::convert::Infallible;
use std::panic;

use tracing::debug;

use crate::error::{FixtureError, TrailEntry};
use crate::stages::{Stage, CHAIN_DEPTH, MAX_DEPTH};

/// How the terminal failure leaves the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    /// Returned as `Err` through every frame.
    Return,
    /// Raised as a panic carrying the error as payload.
    Unwind,
}

/// Per-call frame record. Each one lives on the stack of the `descend` call
/// that created it and points at its caller's record.
struct Frame<'a> {
    stage: Stage,
    depth: u8,
    parent: Option<&'a Frame<'a>>,
}

impl Frame<'_> {
    fn trail(&self) -> Vec<TrailEntry> {
        let mut trail = Vec::with_capacity(CHAIN_DEPTH);
        let mut cursor = Some(self);
        while let Some(frame) = cursor {
            trail.push(TrailEntry {
                stage: frame.stage.name(),
                position: frame.stage.position(),
                depth: frame.depth,
            });
            cursor = frame.parent;
        }
        trail
    }
}

/// Run the fixture. It never returns `Ok`.
///
/// The stack-length hint is accepted for harness compatibility and has no
/// effect on the depth of the chain.
pub fn run(_max_stack_length: Option<i64>) -> Result<Infallible, FixtureError> {
    descend(Stage::first(), 0, None, Delivery::Return)
}

/// Run the fixture and fail by panicking with the [`FixtureError`] as the
/// panic payload, for harnesses that observe failures through a panic hook.
pub fn run_panicking(_max_stack_length: Option<i64>) -> ! {
    match descend(Stage::first(), 0, None, Delivery::Unwind) {
        Ok(never) => match never {},
        Err(err) => panic::panic_any(err),
    }
}

// Frames hold references into their callers, which keeps each level a real
// stack frame instead of a loop.
#[inline(never)]
fn descend(
    stage: Stage,
    depth: u8,
    parent: Option<&Frame<'_>>,
    delivery: Delivery,
) -> Result<Infallible, FixtureError> {
    let frame = Frame {
        stage,
        depth,
        parent,
    };

    if depth < MAX_DEPTH {
        return descend(stage, depth + 1, Some(&frame), delivery);
    }

    match stage.next() {
        Some(next) => {
            debug!(from = %stage, to = %next, position = next.position(), "advancing stage");
            descend(next, 0, Some(&frame), delivery)
        }
        None => fail(&frame, delivery),
    }
}

#[inline(never)]
fn fail(frame: &Frame<'_>, delivery: Delivery) -> Result<Infallible, FixtureError> {
    let err = FixtureError::new(frame.trail());
    match delivery {
        Delivery::Return => Err(err),
        Delivery::Unwind => panic::panic_any(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{FRAMES_PER_STAGE, STAGE_COUNT, STAGE_NAMES};

    fn run_err(hint: Option<i64>) -> FixtureError {
        match run(hint) {
            Ok(never) => match never {},
            Err(err) => err,
        }
    }

    #[test]
    fn test_run_fails_with_fixed_message() {
        let err = run_err(None);
        assert_eq!(err.to_string(), "failed!");
    }

    #[test]
    fn test_trail_covers_every_stage_and_depth() {
        let err = run_err(None);
        assert_eq!(err.depth(), CHAIN_DEPTH);

        // Innermost first: last stage at full depth, outermost is first stage at 0.
        let innermost = &err.trail()[0];
        assert_eq!(innermost.stage, "close_session");
        assert_eq!(innermost.depth, MAX_DEPTH);
        let outermost = err.trail().last().expect("trail is never empty");
        assert_eq!(outermost.stage, "get_user");
        assert_eq!(outermost.depth, 0);

        for (position, name) in STAGE_NAMES.iter().enumerate() {
            let levels: Vec<u8> = err
                .trail()
                .iter()
                .rev()
                .filter(|e| e.position == position)
                .map(|e| e.depth)
                .collect();
            assert_eq!(levels, vec![0, 1, 2, 3, 4, 5], "stage {name}");
        }
    }

    #[test]
    fn test_stage_advances_only_at_max_depth() {
        let err = run_err(None);
        let outer_first: Vec<&TrailEntry> = err.trail().iter().rev().collect();
        for pair in outer_first.windows(2) {
            let (caller, callee) = (pair[0], pair[1]);
            if callee.position != caller.position {
                assert_eq!(caller.depth, MAX_DEPTH);
                assert_eq!(callee.depth, 0);
                assert_eq!(callee.position, caller.position + 1);
            } else {
                assert_eq!(callee.depth, caller.depth + 1);
            }
        }
        assert_eq!(outer_first.len(), STAGE_COUNT * FRAMES_PER_STAGE);
    }

    #[test]
    fn test_hint_is_inert() {
        let baseline = run_err(None);
        for hint in [Some(100), Some(-1), Some(0), Some(i64::MAX)] {
            let err = run_err(hint);
            assert_eq!(err.to_string(), baseline.to_string());
            assert_eq!(err.trail(), baseline.trail());
        }
    }

    #[test]
    fn test_run_panicking_carries_error_payload() {
        let payload = panic::catch_unwind(|| run_panicking(Some(7)))
            .expect_err("fixture never returns");
        let err = payload
            .downcast::<FixtureError>()
            .expect("payload is the fixture error");
        assert_eq!(err.message(), "failed!");
        assert_eq!(err.depth(), CHAIN_DEPTH);
    }
}
