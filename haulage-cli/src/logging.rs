//! Logger installation for the binary.
//!
//! Records go to stderr so stdout carries nothing but JSON.

use env_logger::{Builder, Env, Target, WriteStyle};
use log::LevelFilter;

/// Environment variable consulted when `--log-level` is absent.
pub(crate) const ENV_LOG: &str = "HAULAGE_LOG";

/// Install the global logger.
///
/// `level` overrides [`ENV_LOG`]; without either only warnings and errors are
/// shown.
pub(crate) fn init(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().filter_or(ENV_LOG, "warn"));
    if let Some(filter) = level {
        builder.filter_level(filter);
    }
    builder
        .target(Target::Stderr)
        .write_style(WriteStyle::Never)
        .format_timestamp_millis();
    if builder.try_init().is_err() {
        log::debug!("logger already installed");
    }
}
