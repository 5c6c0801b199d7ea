//! # Check-Policy Subcommand
//!
//! Loads and validates a policy file and prints its table sizes.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tea_policy::load_policy;

/// Arguments for the `tea check-policy` subcommand.
#[derive(Args, Debug)]
pub struct CheckPolicyArgs {
    /// Policy file (.json, .yaml or .yml).
    #[arg(value_name = "FILE")]
    pub policy: PathBuf,
}

/// Execute the check-policy subcommand. An invalid policy is an `Err`.
pub fn run_check_policy(args: &CheckPolicyArgs) -> Result<u8> {
    execute(args, &mut std::io::stdout().lock())
}

pub fn execute(args: &CheckPolicyArgs, out: &mut dyn Write) -> Result<u8> {
    let config = load_policy(&args.policy)
        .with_context(|| format!("invalid policy {}", args.policy.display()))?;
    let summary = config.summary();
    tracing::info!(path = %args.policy.display(), "policy is valid");

    writeln!(out, "OK: {}", args.policy.display())?;
    serde_json::to_writer_pretty(&mut *out, &summary)?;
    writeln!(out)?;
    Ok(0)
}
