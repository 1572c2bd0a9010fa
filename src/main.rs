// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::panic;
use std::process::ExitCode;

use clap::Parser;
use stack_fixture::cli::Cli;
use stack_fixture::error::{panic_message, FixtureRunError};
use stack_fixture::flamegraph;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn init_logger() {
    // STACK_FIXTURE_LOG_FORMAT=json switches to machine-parsable output
    let use_json = env::var("STACK_FIXTURE_LOG_FORMAT")
        .map(|val| val.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if use_json {
        subscriber.json().flatten_event(true).init();
    } else {
        subscriber.compact().init();
    }
}

fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        error!(
            payload = %panic_message(info.payload()),
            %location,
            "fixture panicked"
        );
    }));
}

fn drive(cli: &Cli) -> Result<(), FixtureRunError> {
    info!(mode = ?cli.mode, hint = ?cli.max_stack_length, "running fixture");

    let err = cli.capture()?;
    error!(error = %err, depth = err.depth(), "fixture failed");

    let trace = cli.trace(&err);
    info!(frames = trace.frames.len(), fingerprint = %trace.fingerprint(), "trace built");

    if let Some(path) = &cli.flamegraph {
        let svg = flamegraph::render(&trace, "Fixture Call Chain")?;
        std::fs::write(path, svg)?;
        info!(path = %path.display(), "flamegraph written");
    }

    println!("{}", cli.format_trace(&trace)?);
    Ok(())
}

fn main() -> ExitCode {
    init_logger();
    install_panic_hook();

    let cli = Cli::parse();
    match drive(&cli) {
        // The fixture has no success path, so a clean run still exits non-zero.
        Ok(()) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "harness failure");
            ExitCode::from(2)
        }
    }
}
