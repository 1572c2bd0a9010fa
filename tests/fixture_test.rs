// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! End-to-end checks of the fixture as a harness would drive it.

use std::panic;
use std::thread;

use stack_fixture::stack_trace::StackTrace;
use stack_fixture::stages::{CHAIN_DEPTH, STAGE_NAMES};
use stack_fixture::{run, run_panicking, FixtureError};

fn failure(hint: Option<i64>) -> FixtureError {
    match run(hint) {
        Ok(never) => match never {},
        Err(err) => err,
    }
}

#[test]
fn test_no_argument_fails_with_message() {
    let err = failure(None);
    assert_eq!(err.to_string(), "failed!");
}

#[test]
fn test_numeric_hint_produces_identical_failure() {
    let baseline = StackTrace::from_error(&failure(None));
    for hint in [100, -1] {
        let trace = StackTrace::from_error(&failure(Some(hint)));
        assert_eq!(trace.message, "failed!");
        assert_eq!(trace.frames, baseline.frames);
    }
}

#[test]
fn test_sequential_runs_are_independent() {
    let first = failure(None);
    let second = failure(None);
    assert_eq!(first.depth(), CHAIN_DEPTH);
    assert_eq!(second.depth(), CHAIN_DEPTH);
    assert_eq!(first.trail(), second.trail());
}

#[test]
fn test_concurrent_runs_do_not_interfere() {
    let handles: Vec<_> = (0..4i64)
        .map(|i| thread::spawn(move || StackTrace::from_error(&failure(Some(i))).fingerprint()))
        .collect();

    let fingerprints: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().expect("worker thread"))
        .collect();
    assert!(fingerprints.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_every_stage_appears_in_order() {
    let err = failure(None);
    let mut stages: Vec<&str> = err.trail().iter().rev().map(|e| e.stage).collect();
    stages.dedup();
    assert_eq!(stages, STAGE_NAMES.to_vec());
}

#[test]
fn test_panic_delivery_is_observable_by_catch_unwind() {
    let payload = panic::catch_unwind(|| run_panicking(None)).expect_err("fixture never returns");
    let err = payload
        .downcast_ref::<FixtureError>()
        .expect("payload is the fixture error");
    assert_eq!(err.to_string(), "failed!");
    assert_eq!(err.depth(), CHAIN_DEPTH);
}
