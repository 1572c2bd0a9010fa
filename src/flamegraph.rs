// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

use crate::error::FixtureRunError;
use crate::stack_trace::StackTrace;

/// Render `trace` as a flamegraph SVG.
pub fn render(trace: &StackTrace, title: &str) -> Result<String, FixtureRunError> {
    let folded = trace.folded();
    let mut result = Vec::new();
    let mut options = inferno::flamegraph::Options::default();
    options.title = title.to_string();

    inferno::flamegraph::from_reader(&mut options, folded.as_bytes(), &mut result)
        .map_err(|e| FixtureRunError::Flamegraph(e.to_string()))?;

    Ok(String::from_utf8_lossy(&result).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::run;

    #[test]
    fn test_render_contains_stage_names() {
        let err = match run(None) {
            Ok(never) => match never {},
            Err(err) => err,
        };
        let trace = StackTrace::from_error(&err);
        let svg = render(&trace, "Fixture Call Chain").expect("flamegraph renders");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Fixture Call Chain"));
        assert!(svg.contains("get_user"));
    }
}
