// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! Deep call-chain fixture for exercising stack-trace capture.
//!
//! [`run`] walks eighteen named stages, six frames each, and then fails with
//! [`FixtureError`]. It has no success path. Crash reporters, panic hooks and
//! backtrace parsers under test can use the failure to check how they handle
//! long, repetitive stacks.

pub mod chain;
pub mod cli;
pub mod config;
pub mod error;
pub mod flamegraph;
pub mod stack_trace;
pub mod stages;
pub mod theme;

pub use chain::{run, run_panicking};
pub use error::{FixtureError, FixtureRunError, TrailEntry};
pub use stack_trace::{StackFrame, StackTrace};
pub use stages::Stage;
