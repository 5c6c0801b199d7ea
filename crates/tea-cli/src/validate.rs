//! # Validate Subcommand
//!
//! Evaluates one request object, or an array of request objects, against a
//! policy file and prints the report(s) as JSON.
//!
//! In a batch each request is independent: a request that cannot be read
//! is reported as `{"erro": "..."}` in its position and does not discard
//! the reports of the others.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::{json, Value};

use tea_policy::load_policy;
use tea_rules::ComplianceEngine;

/// Arguments for the `tea validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Policy file (.json, .yaml or .yml).
    #[arg(long, value_name = "FILE")]
    pub policy: PathBuf,

    /// Request file (one object, or an array evaluated item by item).
    /// Reads standard input when omitted or `-`.
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the validate subcommand against the process's stdin/stdout.
///
/// Returns exit code: 0 when every request is compliant, 1 when any is
/// non-compliant, 2 when any request in a batch was rejected.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    execute(args, &mut stdin.lock(), &mut stdout.lock())
}

/// Execute the validate subcommand with explicit I/O.
pub fn execute(args: &ValidateArgs, stdin: &mut dyn Read, out: &mut dyn Write) -> Result<u8> {
    let config = load_policy(&args.policy)
        .with_context(|| format!("failed to load policy {}", args.policy.display()))?;
    let engine = ComplianceEngine::new(config);

    let text = crate::read_input(args.request.as_deref(), stdin)?;
    let input: Value = serde_json::from_str(&text).context("request is not valid JSON")?;

    let (output, code) = match input {
        Value::Array(requests) => evaluate_batch(&engine, &requests)?,
        Value::Object(_) => {
            let report = engine.validate_json(&input).context("request rejected")?;
            tracing::info!(compliant = report.is_compliant(), "request evaluated");
            (serde_json::to_value(&report)?, verdict(report.is_compliant()))
        }
        other => bail!("request must be a JSON object or array, got {}", kind(&other)),
    };

    if args.pretty {
        serde_json::to_writer_pretty(&mut *out, &output)?;
    } else {
        serde_json::to_writer(&mut *out, &output)?;
    }
    writeln!(out)?;

    Ok(code)
}

/// Evaluate each request independently. A rejected request becomes an
/// `{"erro": ...}` entry in its slot and the other reports are kept.
///
/// Exit code: 2 if any request was rejected, else 1 if any report is
/// non-compliant, else 0.
fn evaluate_batch(engine: &ComplianceEngine, requests: &[Value]) -> Result<(Value, u8)> {
    let mut entries = Vec::with_capacity(requests.len());
    let mut rejected = 0usize;
    let mut non_compliant = 0usize;

    for (i, request) in requests.iter().enumerate() {
        match engine.validate_json(request) {
            Ok(report) => {
                if !report.is_compliant() {
                    non_compliant += 1;
                }
                entries.push(serde_json::to_value(&report)?);
            }
            Err(e) => {
                tracing::warn!(index = i, error = %e, "request rejected");
                rejected += 1;
                entries.push(json!({ "erro": e.to_string() }));
            }
        }
    }

    tracing::info!(
        requests = requests.len(),
        non_compliant,
        rejected,
        "batch evaluated"
    );

    let code = if rejected > 0 {
        2
    } else {
        verdict(non_compliant == 0)
    };
    Ok((Value::Array(entries), code))
}

fn verdict(compliant: bool) -> u8 {
    if compliant {
        0
    } else {
        1
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
