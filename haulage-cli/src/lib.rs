//! Command-line interface for the Haulage routing engine.
//!
//! The `haulage` binary reads JSON from a file or standard input and writes
//! JSON to standard output. Logs go to stderr. Subcommand options layer
//! configuration files, `HAULAGE_*` environment variables and flags through
//! `ortho_config`.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use haulage_core::ErrorResponse;
use log::LevelFilter;
use serde::Serialize;

mod error;
mod handoff;
mod input;
mod logging;
mod solve;

pub use error::CliError;

use handoff::{SignArgs, VerifyArgs};
use solve::SolveArgs;

const ARG_REQUEST: &str = "request";
const ARG_BACKEND: &str = "backend";
const ARG_TIME_LIMIT_SECS: &str = "time-limit-secs";
const ARG_MAX_ROUTE_DISTANCE: &str = "max-route-distance";
const ARG_MAX_GENERATIONS: &str = "max-generations";
const ARG_IMPROVE: &str = "improve";
const ARG_PAYLOAD: &str = "payload";
const ARG_HANDOFF_KEY: &str = "handoff-key";
const ARG_SIGNATURE: &str = "signature";
const ENV_SIGN_HANDOFF_KEY: &str = "HAULAGE_CMDS_SIGN_HANDOFF_KEY";
const ENV_VERIFY_HANDOFF_KEY: &str = "HAULAGE_CMDS_VERIFY_HANDOFF_KEY";
const ENV_VERIFY_SIGNATURE: &str = "HAULAGE_CMDS_VERIFY_SIGNATURE";

/// Run the Haulage CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration, input decoding
/// or the command itself fails. Input and validation failures have already
/// been reported on stdout as `{"error": ...}` when this returns.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    logging::init(cli.log_level);
    match cli.command {
        Command::Solve(args) => solve::run_solve(args),
        Command::Sign(args) => handoff::run_sign(args),
        Command::Verify(args) => handoff::run_verify(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "haulage",
    about = "Capacitated vehicle routing with a greedy fallback",
    version
)]
struct Cli {
    /// Log filter for stderr (`off`, `error`, `warn`, `info`, `debug`, `trace`).
    #[arg(long = "log-level", value_name = "level", global = true)]
    log_level: Option<LevelFilter>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build vehicle routes for a JSON request.
    Solve(SolveArgs),
    /// Sign a JSON handoff payload.
    Sign(SignArgs),
    /// Verify the signature of a JSON handoff payload.
    Verify(VerifyArgs),
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

/// Emit `err` as an [`ErrorResponse`] and hand it back for the exit status.
fn report(writer: &mut dyn Write, err: CliError) -> CliError {
    match write_json(writer, &ErrorResponse::new(&err)) {
        Ok(()) => err,
        Err(write_err) => {
            log::error!("could not report {err}: {write_err}");
            write_err
        }
    }
}

#[cfg(test)]
mod tests;
