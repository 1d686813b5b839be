//! `sign` and `verify` commands for handoff payloads.

use std::io::{Read, Write};

use camino::Utf8PathBuf;
use clap::Parser;
use haulage_handoff::HandoffSigner;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::{parse_json, read_input};
use crate::{
    ARG_HANDOFF_KEY, ARG_PAYLOAD, ARG_SIGNATURE, CliError, ENV_SIGN_HANDOFF_KEY,
    ENV_VERIFY_HANDOFF_KEY, ENV_VERIFY_SIGNATURE, report, write_json,
};

/// CLI arguments for the `sign` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Sign a JSON handoff payload read from the given path or \
                 from standard input. Object keys are sorted before hashing, \
                 so the signature does not depend on key order.",
    about = "Sign a JSON handoff payload"
)]
#[ortho_config(prefix = "HAULAGE")]
pub(crate) struct SignArgs {
    /// Path to the JSON payload; stdin when omitted.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) payload_path: Option<Utf8PathBuf>,
    /// Secret shared by the signing and verifying stages.
    #[arg(long = ARG_HANDOFF_KEY, value_name = "secret")]
    #[serde(default)]
    pub(crate) handoff_key: Option<String>,
}

/// CLI arguments for the `verify` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Check a hex signature against a JSON handoff payload read \
                 from the given path or from standard input. Exits with a \
                 failure status when the signature does not match.",
    about = "Verify the signature of a JSON handoff payload"
)]
#[ortho_config(prefix = "HAULAGE")]
pub(crate) struct VerifyArgs {
    /// Path to the JSON payload; stdin when omitted.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) payload_path: Option<Utf8PathBuf>,
    /// Secret shared by the signing and verifying stages.
    #[arg(long = ARG_HANDOFF_KEY, value_name = "secret")]
    #[serde(default)]
    pub(crate) handoff_key: Option<String>,
    /// Hex signature produced by `sign`.
    #[arg(long = ARG_SIGNATURE, value_name = "hex")]
    #[serde(default)]
    pub(crate) signature: Option<String>,
}

/// Resolved `sign` configuration.
#[derive(Debug, Clone)]
pub(crate) struct SignConfig {
    pub(crate) payload_path: Option<Utf8PathBuf>,
    pub(crate) signer: HandoffSigner,
}

/// Resolved `verify` configuration.
#[derive(Debug, Clone)]
pub(crate) struct VerifyConfig {
    pub(crate) payload_path: Option<Utf8PathBuf>,
    pub(crate) signer: HandoffSigner,
    pub(crate) signature: String,
}

impl TryFrom<SignArgs> for SignConfig {
    type Error = CliError;

    fn try_from(args: SignArgs) -> Result<Self, Self::Error> {
        let key = args.handoff_key.ok_or(CliError::MissingArgument {
            field: ARG_HANDOFF_KEY,
            env: ENV_SIGN_HANDOFF_KEY,
        })?;
        Ok(Self {
            payload_path: args.payload_path,
            signer: HandoffSigner::new(key)?,
        })
    }
}

impl TryFrom<VerifyArgs> for VerifyConfig {
    type Error = CliError;

    fn try_from(args: VerifyArgs) -> Result<Self, Self::Error> {
        let key = args.handoff_key.ok_or(CliError::MissingArgument {
            field: ARG_HANDOFF_KEY,
            env: ENV_VERIFY_HANDOFF_KEY,
        })?;
        let signature = args.signature.ok_or(CliError::MissingArgument {
            field: ARG_SIGNATURE,
            env: ENV_VERIFY_SIGNATURE,
        })?;
        Ok(Self {
            payload_path: args.payload_path,
            signer: HandoffSigner::new(key)?,
            signature,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SignatureResponse {
    pub(crate) signature: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct VerificationResponse {
    pub(crate) valid: bool,
}

pub(super) fn run_sign(args: SignArgs) -> Result<(), CliError> {
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    run_sign_with(args, &mut stdin, &mut stdout)
}

pub(super) fn run_sign_with(
    args: SignArgs,
    input: &mut dyn Read,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = SignConfig::try_from(merged)?;
    let payload = load_payload(config.payload_path.as_ref(), input, writer)?;
    let signature = config.signer.sign(&payload)?;
    write_json(writer, &SignatureResponse { signature })
}

pub(super) fn run_verify(args: VerifyArgs) -> Result<(), CliError> {
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    run_verify_with(args, &mut stdin, &mut stdout)
}

pub(super) fn run_verify_with(
    args: VerifyArgs,
    input: &mut dyn Read,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = VerifyConfig::try_from(merged)?;
    let payload = load_payload(config.payload_path.as_ref(), input, writer)?;
    let valid = config.signer.verify(&payload, &config.signature)?;
    write_json(writer, &VerificationResponse { valid })?;
    if valid {
        Ok(())
    } else {
        log::warn!("handoff signature rejected");
        Err(CliError::SignatureMismatch)
    }
}

fn load_payload(
    path: Option<&Utf8PathBuf>,
    input: &mut dyn Read,
    writer: &mut dyn Write,
) -> Result<Value, CliError> {
    let text = read_input(path.map(Utf8PathBuf::as_path), ARG_PAYLOAD, input)
        .map_err(|err| report(writer, err))?;
    parse_json(&text).map_err(|err| report(writer, err))
}
