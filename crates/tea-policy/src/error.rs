//! Policy-specific error types.
//!
//! File and parse failures carry the path of the policy being loaded.
//! Semantic violations are wrapped [`ConfigurationError`]s.

use std::path::PathBuf;

use tea_core::ConfigurationError;
use thiserror::Error;

/// Errors that can occur while loading or building a policy.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy file does not exist.
    #[error("policy file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The policy file could not be read.
    #[error("failed to read policy at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file extension is neither JSON nor YAML.
    #[error("unsupported policy format at {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: PathBuf },

    /// JSON parsing failed for a policy file.
    #[error("failed to parse JSON policy at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// YAML parsing failed for a policy file.
    #[error("failed to parse YAML policy at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing failed for an in-memory document.
    #[error("failed to parse JSON policy: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failed for an in-memory document.
    #[error("failed to parse YAML policy: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed but violates a policy invariant.
    #[error("invalid policy: {0}")]
    Invalid(#[from] ConfigurationError),
}

/// Convenience alias for policy results.
pub type PolicyResult<T> = Result<T, PolicyError>;
