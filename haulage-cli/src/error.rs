//! Error types emitted by the Haulage CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use haulage_core::{InstanceError, SolveError};
use haulage_handoff::HandoffError;
use thiserror::Error;

/// Errors emitted by the Haulage CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Long flag name.
        field: &'static str,
        /// Environment variable that also supplies the value.
        env: &'static str,
    },
    /// An option carried a value outside its accepted range.
    #[error("invalid --{field}: {reason}")]
    InvalidOption {
        /// Long flag name.
        field: &'static str,
        /// What was wrong with the value.
        reason: String,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Argument naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Argument naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Argument naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Reading the JSON input failed.
    #[error("failed to read input from {origin}: {source}")]
    ReadInput {
        /// File path or `stdin`.
        origin: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The input was not valid JSON for the command.
    #[error("invalid JSON input: {0}")]
    ParseInput(#[source] serde_json::Error),
    /// The solve request did not describe a valid instance.
    #[error(transparent)]
    InvalidSolveRequest(#[from] InstanceError),
    /// The planner failed.
    #[error("solver failed: {0}")]
    Solve(#[from] SolveError),
    /// Signing or verifying a handoff payload failed.
    #[error("handoff signing failed: {0}")]
    Handoff(#[from] HandoffError),
    /// The supplied signature does not authenticate the payload.
    #[error("signature does not match the payload")]
    SignatureMismatch,
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
