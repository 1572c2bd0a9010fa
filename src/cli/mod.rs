// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

pub mod trace_viewer;

use std::panic;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::chain::{run, run_panicking};
use crate::error::{panic_message, FixtureError, FixtureRunError};
use crate::stack_trace::StackTrace;

/// Drive the deep call-chain fixture and print the resulting stack trace.
#[derive(Parser, Debug)]
#[command(name = "stack-fixture", version)]
pub struct Cli {
    /// Accepted for harness compatibility; does not change the chain depth.
    #[arg(long, allow_negative_numbers = true)]
    pub max_stack_length: Option<i64>,

    /// How the failure leaves the chain.
    #[arg(long, value_enum, default_value_t = Mode::Result)]
    pub mode: Mode,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Build the trace from the recorded frame trail or the native backtrace.
    #[arg(long, value_enum, default_value_t = Source::Trail)]
    pub source: Source,

    /// Keep only frames whose function name contains this text.
    #[arg(long)]
    pub focus: Option<String>,

    /// Trim the trace to at most this many frames.
    #[arg(long)]
    pub truncate: Option<usize>,

    /// Write a flamegraph SVG of the trace to this path.
    #[arg(long)]
    pub flamegraph: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Error returned through every frame.
    Result,
    /// Error raised as a panic payload and recovered with `catch_unwind`.
    Panic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    /// Exception interface payload as sent by error-reporting clients.
    Exception,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Trail,
    Native,
}

impl Cli {
    /// Run the fixture and collect its failure.
    pub fn capture(&self) -> Result<FixtureError, FixtureRunError> {
        match self.mode {
            Mode::Result => match run(self.max_stack_length) {
                Ok(never) => match never {},
                Err(err) => Ok(err),
            },
            Mode::Panic => {
                let hint = self.max_stack_length;
                let payload = panic::catch_unwind(move || run_panicking(hint))
                    .err()
                    .ok_or_else(|| FixtureRunError::ForeignPanic("no panic".to_string()))?;
                payload
                    .downcast::<FixtureError>()
                    .map(|err| *err)
                    .map_err(|other| FixtureRunError::ForeignPanic(panic_message(other.as_ref())))
            }
        }
    }

    /// Turn a captured failure into the trace this invocation asked for.
    pub fn trace(&self, err: &FixtureError) -> StackTrace {
        let mut trace = match self.source {
            Source::Trail => StackTrace::from_error(err),
            Source::Native => StackTrace::from_native(err),
        };
        if let Some(needle) = &self.focus {
            trace = trace.retain_matching(needle);
        }
        if let Some(max_frames) = self.truncate {
            trace.truncate(max_frames);
        }
        trace
    }

    pub fn format_trace(&self, trace: &StackTrace) -> Result<String, FixtureRunError> {
        Ok(match self.format {
            Format::Text => trace_viewer::render_trace(trace),
            Format::Json => serde_json::to_string_pretty(trace)?,
            Format::Exception => serde_json::to_string_pretty(&trace.to_exception_value())?,
        })
    }
}
