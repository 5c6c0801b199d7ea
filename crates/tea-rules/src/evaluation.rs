//! # Rule Results & the Evaluator Trait
//!
//! Defines [`RuleResult`], the [`Evidence`] every result carries, and the
//! [`RuleEvaluator`] trait implemented by each rule.
//!
//! ## Auditability
//!
//! A result is never just a boolean. Every evaluator records, as evidence,
//! each quantity that went into its decision (limits, counts, dates, the
//! band or period used) so that an auditor can recompute the verdict by
//! hand. Evidence keys are kept in sorted order so that serialization is
//! deterministic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tea_core::RuleContext;
use tea_policy::PolicyConfig;

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// Diagnostic key/value pairs backing a rule decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evidence(BTreeMap<String, Value>);

impl Evidence {
    /// Empty evidence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style. A repeated key overwrites the earlier value.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ---------------------------------------------------------------------------
// RuleResult
// ---------------------------------------------------------------------------

/// Outcome of one rule for one request.
///
/// Serialized with the response vocabulary:
/// `{"conforme": bool, "mensagem": "...", "evidencias": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    /// Whether the request satisfies the rule.
    #[serde(rename = "conforme")]
    pub compliant: bool,
    /// Human-readable explanation.
    #[serde(rename = "mensagem")]
    pub message: String,
    /// Every quantity used in the decision.
    #[serde(rename = "evidencias")]
    pub evidence: Evidence,
}

impl RuleResult {
    /// Build a result.
    pub fn new(compliant: bool, message: impl Into<String>, evidence: Evidence) -> Self {
        Self {
            compliant,
            message: message.into(),
            evidence,
        }
    }

    /// A compliant result.
    pub fn pass(message: impl Into<String>, evidence: Evidence) -> Self {
        Self::new(true, message, evidence)
    }

    /// A non-compliant result.
    pub fn fail(message: impl Into<String>, evidence: Evidence) -> Self {
        Self::new(false, message, evidence)
    }
}

// ---------------------------------------------------------------------------
// RuleEvaluator Trait
// ---------------------------------------------------------------------------

/// A single, independent compliance check.
///
/// Implementations must be pure: no I/O, no clock, no interior mutability.
/// The same `(ctx, config)` must always produce the same result, which is
/// what lets one engine serve concurrent callers without locking.
///
/// ## Extensibility
///
/// Register additional evaluators on
/// [`ComplianceEngine`](crate::engine::ComplianceEngine) via `register()`.
/// The engine's orchestration does not change when rules are added.
pub trait RuleEvaluator: Send + Sync + fmt::Debug {
    /// Report key for this rule (e.g. `frequencia_maxima`).
    fn name(&self) -> &str;

    /// Evaluate the rule.
    fn evaluate(&self, ctx: &RuleContext, config: &PolicyConfig) -> RuleResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn evidence_is_sorted_and_overwrites() {
        let ev = Evidence::new()
            .with("limit", 8)
            .with("band", "ate_12")
            .with("limit", 9);
        let keys: Vec<&str> = ev.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["band", "limit"]);
        assert_eq!(ev.get("limit"), Some(&json!(9)));
        assert_eq!(ev.iter().count(), 2);
    }

    #[test]
    fn result_serializes_with_response_vocabulary() {
        let result = RuleResult::fail(
            "9 exceeds limit of 8",
            Evidence::new().with("limit", 8).with("requested", 9),
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "conforme": false,
                "mensagem": "9 exceeds limit of 8",
                "evidencias": {"limit": 8, "requested": 9}
            })
        );
    }

    #[test]
    fn null_evidence_values() {
        let ev = Evidence::new().with("limit", Value::Null).with("last", None::<String>);
        assert_eq!(ev.get("limit"), Some(&Value::Null));
        assert_eq!(ev.get("last"), Some(&Value::Null));
    }
}
