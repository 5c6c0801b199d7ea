//! # Compliance Engine
//!
//! Runs every registered rule against a request and combines the results
//! into a [`ComplianceReport`].
//!
//! ## Orchestration
//!
//! - All rules run, every time. A failing rule never hides the others, so
//!   the report always shows the full picture.
//! - The overall verdict is the logical AND of the individual verdicts.
//! - The report lists rules in registry order.
//!
//! The engine holds no mutable state after construction. One instance can
//! be shared by reference across threads.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tea_core::{ConfigurationError, ContentDigest, RequestDocument, RuleContext, TeaError};
use tea_policy::{PolicyConfig, PolicyDocument};

use crate::evaluation::{RuleEvaluator, RuleResult};
use crate::rules::default_rules;

// ---------------------------------------------------------------------------
// ComplianceEngine
// ---------------------------------------------------------------------------

/// A policy plus an ordered registry of rules.
#[derive(Debug)]
pub struct ComplianceEngine {
    config: PolicyConfig,
    rules: Vec<Box<dyn RuleEvaluator>>,
}

impl ComplianceEngine {
    /// Engine with the seven built-in rules.
    pub fn new(config: PolicyConfig) -> Self {
        Self::with_rules(config, default_rules())
    }

    /// Engine with an explicit registry. Rules are added in order through
    /// [`register`](Self::register), so a repeated name keeps the first
    /// position and the last rule given for it.
    pub fn with_rules(config: PolicyConfig, rules: Vec<Box<dyn RuleEvaluator>>) -> Self {
        let mut engine = Self {
            config,
            rules: Vec::with_capacity(rules.len()),
        };
        for rule in rules {
            engine.register(rule);
        }
        engine
    }

    /// Validate a policy document and build an engine with the built-in rules.
    pub fn from_document(doc: PolicyDocument) -> Result<Self, ConfigurationError> {
        Ok(Self::new(PolicyConfig::from_document(doc)?))
    }

    /// Add a rule. A rule whose name is already registered is replaced in
    /// place and keeps its position; otherwise the rule is appended.
    pub fn register(&mut self, rule: Box<dyn RuleEvaluator>) {
        match self.rules.iter().position(|r| r.name() == rule.name()) {
            Some(idx) => self.rules[idx] = rule,
            None => self.rules.push(rule),
        }
    }

    /// The policy this engine evaluates against.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Registered rule names, in report order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Evaluate every rule against `ctx`.
    pub fn validate(&self, ctx: &RuleContext) -> ComplianceReport {
        let mut rules = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let result = rule.evaluate(ctx, &self.config);
            tracing::debug!(
                rule = rule.name(),
                compliant = result.compliant,
                message = %result.message,
                "rule evaluated"
            );
            rules.push((rule.name().to_string(), result));
        }
        let report = ComplianceReport::from_results(rules);
        tracing::debug!(
            therapy_type = %ctx.procedure.therapy_type,
            compliant = report.is_compliant(),
            failed = report.failed_rules().len(),
            "request evaluated"
        );
        report
    }

    /// Convert a request document and validate it.
    pub fn validate_document(&self, doc: RequestDocument) -> Result<ComplianceReport, TeaError> {
        let ctx = RuleContext::from_document(doc)?;
        Ok(self.validate(&ctx))
    }

    /// Validate a request given as a JSON value.
    pub fn validate_json(&self, value: &serde_json::Value) -> Result<ComplianceReport, TeaError> {
        let ctx = RuleContext::from_json_value(value)?;
        Ok(self.validate(&ctx))
    }

    /// Validate a request given as JSON text.
    pub fn validate_str(&self, text: &str) -> Result<ComplianceReport, TeaError> {
        let ctx = RuleContext::from_json_str(text)?;
        Ok(self.validate(&ctx))
    }
}

// ---------------------------------------------------------------------------
// ComplianceReport
// ---------------------------------------------------------------------------

/// Overall verdict plus every per-rule result.
///
/// Serializes as `{"conforme": bool, "regras": {name: result, ...}}` with
/// rules in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceReport {
    compliant: bool,
    rules: Vec<(String, RuleResult)>,
}

impl ComplianceReport {
    /// Build a report, deriving the overall verdict from the results.
    pub fn from_results(rules: Vec<(String, RuleResult)>) -> Self {
        let compliant = rules.iter().all(|(_, r)| r.compliant);
        Self { compliant, rules }
    }

    /// True iff every rule is compliant.
    pub fn is_compliant(&self) -> bool {
        self.compliant
    }

    /// Result of the named rule.
    pub fn get(&self, name: &str) -> Option<&RuleResult> {
        self.rules.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// `(rule name, result)` pairs in registry order.
    pub fn results(&self) -> impl Iterator<Item = (&str, &RuleResult)> {
        self.rules.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Names of non-compliant rules, in registry order.
    pub fn failed_rules(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|(_, r)| !r.compliant)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// SHA-256 over the serialized report. Identical evaluations give
    /// identical digests.
    pub fn digest(&self) -> Result<ContentDigest, TeaError> {
        ContentDigest::of_json(self)
    }
}

struct OrderedRules<'a>(&'a [(String, RuleResult)]);

impl Serialize for OrderedRules<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, result) in self.0 {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

impl Serialize for ComplianceReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("conforme", &self.compliant)?;
        map.serialize_entry("regras", &OrderedRules(&self.rules))?;
        map.end()
    }
}
