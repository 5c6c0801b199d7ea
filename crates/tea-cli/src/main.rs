//! # tea CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tea_cli::check_policy::{run_check_policy, CheckPolicyArgs};
use tea_cli::validate::{run_validate, ValidateArgs};

/// TEA therapy compliance engine.
///
/// Validates therapy authorization requests against a policy and reports,
/// per rule, whether the request complies and why.
#[derive(Parser, Debug)]
#[command(name = "tea", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate one request or an array of requests against a policy.
    Validate(ValidateArgs),

    /// Load and validate a policy file.
    CheckPolicy(CheckPolicyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::CheckPolicy(args) => run_check_policy(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_validate_with_request_file() {
        let cli = Cli::try_parse_from([
            "tea",
            "validate",
            "--policy",
            "politica.yaml",
            "--request",
            "pedido.json",
            "--pretty",
        ])
        .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.policy, PathBuf::from("politica.yaml"));
        assert_eq!(args.request, Some(PathBuf::from("pedido.json")));
        assert!(args.pretty);
    }

    #[test]
    fn parse_validate_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["tea", "validate", "--policy", "p.json"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert!(args.request.is_none());
        assert!(!args.pretty);
    }

    #[test]
    fn validate_requires_policy() {
        assert!(Cli::try_parse_from(["tea", "validate"]).is_err());
    }

    #[test]
    fn parse_check_policy() {
        let cli = Cli::try_parse_from(["tea", "check-policy", "p.yml"]).unwrap();
        assert!(matches!(cli.command, Commands::CheckPolicy(ref a) if a.policy == PathBuf::from("p.yml")));
    }

    #[test]
    fn verbosity_is_global_and_counted() {
        let cli = Cli::try_parse_from(["tea", "check-policy", "p.yml", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
