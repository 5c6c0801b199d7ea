//! # tea-rules — Compliance Rule Engine
//!
//! Evaluates a therapy request against a [`PolicyConfig`](tea_policy::PolicyConfig)
//! and returns an auditable [`ComplianceReport`]: one [`RuleResult`] per rule,
//! each with a message and the evidence behind it, plus the overall verdict.
//!
//! ## Architecture
//!
//! ```text
//! request JSON ──► RuleContext (tea-core)
//!                      │
//!                      ▼
//!   ComplianceEngine { PolicyConfig, [Box<dyn RuleEvaluator>] }
//!                      │  every rule, registry order, no short-circuit
//!                      ▼
//!   ComplianceReport { conforme, regras: { name → RuleResult } }
//! ```
//!
//! ## Crate Policy
//!
//! - Rules are pure functions of `(RuleContext, PolicyConfig)`.
//! - No I/O. Policy loading lives in `tea-policy`, the CLI in `tea-cli`.
//! - No `.unwrap()` outside tests.

pub mod engine;
pub mod evaluation;
pub mod rules;

#[cfg(test)]
mod testing;

pub use engine::{ComplianceEngine, ComplianceReport};
pub use evaluation::{Evidence, RuleEvaluator, RuleResult};
pub use rules::{
    default_rules, Coverage, Eligibility, ForbiddenRepetition, FrequencyMax, MinimumInterval,
    SameDayExclusion, SessionLimit,
};
