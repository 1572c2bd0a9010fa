// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! Structured stack traces built from a fixture failure.
//!
//! A trace can come from the fixture's own frame trail or from a rendered
//! native backtrace. Either way it can be trimmed, fingerprinted, folded for
//! flamegraphs, or shaped like the exception interface an error-reporting
//! client submits.

use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::error::FixtureError;
use crate::theme::ansi::apply;
use crate::theme::Theme;

/// Function name of the entry frame in trail-based traces.
pub const ENTRY_FUNCTION: &str = "run";
/// Function name of the terminal frame in trail-based traces.
pub const TERMINAL_FUNCTION: &str = "fail";

/// A single frame in a call stack.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StackFrame {
    /// Index within the call stack (0 = innermost/failure site).
    pub index: usize,
    /// Stage label or demangled symbol.
    pub function: String,
    /// Depth counter of the stage frame, if the frame is a stage frame.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u8>,
    /// `file:line:col`, when the backtrace carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TraceSource {
    /// Built from the fixture's recorded frame trail.
    Trail,
    /// Parsed from a rendered native backtrace.
    Native,
}

#[derive(Debug, Clone, Serialize)]
pub struct StackTrace {
    pub message: String,
    pub source: TraceSource,
    /// Ordered frames, index 0 = failure site.
    pub frames: Vec<StackFrame>,
    /// Frames dropped by [`StackTrace::truncate`].
    pub omitted_frames: usize,
    /// Index of the first frame after the truncation gap; equal to the frame
    /// count when the gap is at the outer end.
    #[serde(skip)]
    pub elided_at: Option<usize>,
}

impl StackTrace {
    /// Build a trace from the fixture's frame trail, framed by the terminal
    /// and entry functions.
    pub fn from_error(err: &FixtureError) -> Self {
        let mut frames = Vec::with_capacity(err.depth() + 2);
        frames.push(StackFrame {
            index: 0,
            function: TERMINAL_FUNCTION.to_string(),
            depth: None,
            location: None,
        });
        for entry in err.trail() {
            frames.push(StackFrame {
                index: frames.len(),
                function: entry.stage.to_string(),
                depth: Some(entry.depth),
                location: None,
            });
        }
        frames.push(StackFrame {
            index: frames.len(),
            function: ENTRY_FUNCTION.to_string(),
            depth: None,
            location: None,
        });

        Self {
            message: err.to_string(),
            source: TraceSource::Trail,
            frames,
            omitted_frames: 0,
            elided_at: None,
        }
    }

    /// Build a trace from the fixture error's native backtrace.
    pub fn from_native(err: &FixtureError) -> Self {
        Self::from_backtrace(&err.to_string(), &err.backtrace().to_string())
    }

    /// Parse a rendered Rust backtrace.
    pub fn from_backtrace(message: &str, rendered: &str) -> Self {
        Self {
            message: message.to_string(),
            source: TraceSource::Native,
            frames: extract_frames(rendered),
            omitted_frames: 0,
            elided_at: None,
        }
    }

    /// Keep only frames whose function contains `needle`, re-indexed.
    #[must_use]
    pub fn retain_matching(mut self, needle: &str) -> Self {
        self.frames.retain(|f| f.function.contains(needle));
        reindex(&mut self.frames);
        let len = self.frames.len();
        self.elided_at = self.elided_at.map(|at| at.min(len));
        self
    }

    /// Trim the trace to at most `max_frames`, keeping the innermost and
    /// outermost halves. The gap is recorded in `omitted_frames`.
    pub fn truncate(&mut self, max_frames: usize) {
        let len = self.frames.len();
        if len <= max_frames {
            return;
        }

        let head = max_frames.div_ceil(2);
        let tail = max_frames - head;
        let omitted = len - head - tail;
        self.frames.drain(head..len - tail);
        self.omitted_frames += omitted;
        self.elided_at = Some(head);
        reindex(&mut self.frames);
    }

    /// Hex SHA-256 over frame function names, innermost first.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for frame in &self.frames {
            hasher.update(frame.function.as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }

    /// Folded-stack line (`outer;...;inner 1`) for flamegraph tools.
    pub fn folded(&self) -> String {
        let path: Vec<&str> = self
            .frames
            .iter()
            .rev()
            .map(|f| f.function.as_str())
            .collect();
        format!("{} 1\n", path.join(";"))
    }

    /// Exception payload in the shape error-reporting clients submit.
    /// Frames are listed outermost first.
    pub fn to_exception_value(&self) -> Value {
        let frames: Vec<Value> = self
            .frames
            .iter()
            .rev()
            .map(|f| {
                let mut frame = json!({
                    "function": f.function,
                    "in_app": true,
                });
                if let Some(depth) = f.depth {
                    frame["vars"] = json!({ "level": depth });
                }
                if let Some(location) = &f.location {
                    frame["filename"] = json!(location);
                }
                frame
            })
            .collect();

        let mut stacktrace = json!({ "frames": frames });
        if self.omitted_frames > 0 {
            stacktrace["frames_omitted"] = json!(self.omitted_frames);
        }

        json!({
            "values": [{
                "type": "Error",
                "value": self.message,
                "stacktrace": stacktrace,
            }]
        })
    }

    /// Format the trace as a human-readable string.
    pub fn display(&self) -> String {
        self.render(None)
    }

    /// Same as [`StackTrace::display`], colored with `theme`.
    pub fn display_themed(&self, theme: &Theme) -> String {
        self.render(Some(theme))
    }

    fn render(&self, theme: Option<&Theme>) -> String {
        let paint = |color: &str, text: &str| match theme {
            Some(_) => apply(color, text),
            None => text.to_string(),
        };
        let theme_or_default = theme.cloned().unwrap_or_default();

        let mut out = String::new();
        out.push_str(&format!(
            "{} {}\n",
            paint(&theme_or_default.error, "Error:"),
            paint(&theme_or_default.error, &self.message)
        ));

        let marker = format!("    ... {} frames omitted ...", self.omitted_frames);

        if self.frames.is_empty() {
            if self.omitted_frames > 0 {
                out.push_str(&paint(&theme_or_default.warning, &marker));
            } else {
                out.push_str(&paint(&theme_or_default.dim, "  <no frames captured>"));
            }
            out.push('\n');
            return out;
        }

        out.push_str("  Call stack (most recent call first):\n");
        let elide_at = self.elision_index();
        for frame in &self.frames {
            if Some(frame.index) == elide_at {
                out.push_str(&paint(&theme_or_default.warning, &marker));
                out.push('\n');
            }
            out.push_str(&format!("    #{}: ", frame.index));
            out.push_str(&paint(&theme_or_default.frame, &frame.function));
            if let Some(depth) = frame.depth {
                out.push_str(&paint(&theme_or_default.dim, &format!(" (level {depth})")));
            }
            if let Some(ref location) = frame.location {
                out.push_str(&paint(&theme_or_default.dim, &format!(" at {location}")));
            }
            out.push('\n');
        }
        if elide_at == Some(self.frames.len()) {
            out.push_str(&paint(&theme_or_default.warning, &marker));
            out.push('\n');
        }
        out
    }

    /// Index of the first frame after the truncation gap.
    fn elision_index(&self) -> Option<usize> {
        if self.omitted_frames == 0 {
            return None;
        }
        self.elided_at
    }
}

fn reindex(frames: &mut [StackFrame]) {
    for (index, frame) in frames.iter_mut().enumerate() {
        frame.index = index;
    }
}

/// Extract frames from a rendered Rust backtrace.
///
/// `std::backtrace::Backtrace` renders frames as:
///   `   3: stack_fixture::chain::descend`
///   `             at ./src/chain.rs:82:16`
fn extract_frames(rendered: &str) -> Vec<StackFrame> {
    let mut frames: Vec<StackFrame> = Vec::new();

    for line in rendered.lines() {
        let trimmed = line.trim();

        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(last) = frames.last_mut() {
                if last.location.is_none() {
                    last.location = Some(location.trim().to_string());
                }
            }
            continue;
        }

        if let Some(function) = try_parse_numbered_frame(trimmed) {
            frames.push(StackFrame {
                index: frames.len(),
                function,
                depth: None,
                location: None,
            });
        }
    }

    frames
}

/// Parse `"N: symbol"` into the symbol, with any `::h<hash>` suffix removed.
fn try_parse_numbered_frame(line: &str) -> Option<String> {
    let (index_str, rest) = line.split_once(':')?;
    index_str.trim().parse::<usize>().ok()?;
    let symbol = rest.trim();
    if symbol.is_empty() {
        return None;
    }
    Some(strip_symbol_hash(symbol).to_string())
}

fn strip_symbol_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::h") {
        Some((path, hash))
            if hash.len() == 16 && hash.chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            path
        }
        _ => symbol,
    }
}
