//! unikey
//!
//! Generates and validates legacy product activation keys.
//!
//! Usage:
//!   unikey generate oem --count 5
//!   unikey validate ten-digit 111-1111111
//!   unikey generate hash-derived --release 73g --site 889884 --prefix fdaa

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use unikey_cli::{Cli, Outcome, run};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let stdout = io::stdout();
    let outcome = run(&cli, &mut stdout.lock())?;
    Ok(match outcome {
        Outcome::Valid => ExitCode::SUCCESS,
        Outcome::Invalid => ExitCode::FAILURE,
    })
}
