//! # Error Hierarchy
//!
//! Structured error types for the compliance engine, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! The taxonomy follows the lifecycle of the engine:
//!
//! - [`ConfigurationError`] is raised only while a policy is being turned into
//!   a validated configuration. A failure aborts construction entirely.
//! - [`ContextError`] and [`DateParseError`] are raised while a request is being
//!   turned into a typed context. A failure aborts that single request.
//!
//! Every variant names the offending field or therapy type and the value that
//! was rejected.

use thiserror::Error;

/// Top-level error type for the compliance engine.
#[derive(Error, Debug)]
pub enum TeaError {
    /// Invalid policy definition.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Missing or malformed request field.
    #[error("context error: {0}")]
    Context(#[from] ContextError),

    /// A request date is not a calendar date.
    #[error("date parse error: {0}")]
    DateParse(#[from] DateParseError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors detected while validating a policy document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A frequency rule names a period outside `diario|semanal|mensal|anual`.
    #[error("unsupported period for {therapy_type:?}: {value:?} (supported: diario, semanal, mensal, anual)")]
    UnsupportedPeriod {
        /// Therapy type owning the rule.
        therapy_type: String,
        /// The period as written in the policy.
        value: String,
    },

    /// A frequency rule quantity is not a non-negative integer.
    #[error("invalid quantity in frequencia_maxima for {therapy_type:?}: {value} (expected non-negative integer)")]
    InvalidQuantity {
        /// Therapy type owning the rule.
        therapy_type: String,
        /// The quantity as written in the policy, rendered as JSON.
        value: String,
    },

    /// A numeric policy parameter is negative or does not fit a day/session count.
    #[error("value out of range for {field}: {value} (expected a non-negative count)")]
    OutOfRange {
        /// Dotted path of the parameter (e.g. `intervalo_minimo_dias.Fono`).
        field: String,
        /// The rejected value.
        value: i64,
    },

    /// A therapy type name is empty.
    #[error("invalid therapy type in {field}: must be non-empty")]
    InvalidTherapyType {
        /// Section of the policy that carries the name.
        field: String,
    },
}

/// Errors detected while building a typed request context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// A required field is absent.
    #[error("missing required field: {field}")]
    MissingField {
        /// Dotted path of the field (e.g. `procedimento.tipo`).
        field: String,
    },

    /// A field is present but its value is not acceptable.
    #[error("invalid value for {field}: {reason}")]
    InvalidField {
        /// Dotted path of the field.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request document does not have the expected shape.
    #[error("malformed request: {reason}")]
    Malformed {
        /// Deserializer diagnostic.
        reason: String,
    },
}

impl ContextError {
    /// Shorthand for [`ContextError::MissingField`].
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Shorthand for [`ContextError::InvalidField`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A date string is not a strict `YYYY-MM-DD` calendar date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid date for {field}: {value:?} ({reason})")]
pub struct DateParseError {
    /// Dotted path of the field that carried the date.
    pub field: String,
    /// The rejected input.
    pub value: String,
    /// Parser diagnostic.
    pub reason: String,
}
