//! Entry point for the `haulage` binary.
#![forbid(unsafe_code)]

use haulage_cli::CliError;

fn main() {
    match haulage_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("haulage: {err}");
            std::process::exit(1);
        }
    }
}
