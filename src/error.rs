// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::any::Any;
use std::backtrace::Backtrace;
use std::sync::Arc;

pub const FAILURE_MESSAGE: &str = "failed!";

/// One live chain frame at the moment of failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrailEntry {
    pub stage: &'static str,
    pub position: usize,
    pub depth: u8,
}

/// The only outcome of running the fixture.
#[derive(Debug, thiserror::Error)]
#[error("failed!")]
pub struct FixtureError {
    trail: Vec<TrailEntry>,
    backtrace: Arc<Backtrace>,
}

impl FixtureError {
    /// `trail` is innermost first.
    pub(crate) fn new(trail: Vec<TrailEntry>) -> Self {
        Self {
            trail,
            backtrace: Arc::new(Backtrace::force_capture()),
        }
    }

    pub fn message(&self) -> &'static str {
        FAILURE_MESSAGE
    }

    /// Chain frames that were live at the failure point, innermost first.
    pub fn trail(&self) -> &[TrailEntry] {
        &self.trail
    }

    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    /// Native backtrace captured where the error was raised.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

/// Errors raised by the harness driver around the fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureRunError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render flamegraph: {0}")]
    Flamegraph(String),

    #[error("fixture did not fail with its own error: {0}")]
    ForeignPanic(String),
}

/// Decode a panic payload into a message.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(err) = payload.downcast_ref::<FixtureError>() {
        err.to_string()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
