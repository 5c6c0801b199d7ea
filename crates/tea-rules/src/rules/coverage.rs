//! Coverage: the diagnosis code must start with a covered prefix and the
//! therapy type must be in the covered set.

use serde_json::Value;
use tea_core::RuleContext;
use tea_policy::PolicyConfig;

use crate::evaluation::{Evidence, RuleEvaluator, RuleResult};

/// Report key.
pub const NAME: &str = "cobertura";

/// Coverage rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coverage;

impl RuleEvaluator for Coverage {
    fn name(&self) -> &str {
        NAME
    }

    fn evaluate(&self, ctx: &RuleContext, config: &PolicyConfig) -> RuleResult {
        let proc = &ctx.procedure;
        let matched_prefix = proc
            .diagnosis_code
            .matching_prefix(config.diagnosis_prefixes());
        let covered = config.covers(&proc.therapy_type);
        let evidence = Evidence::new()
            .with("diagnosis_code", proc.diagnosis_code.as_str())
            .with("matched_prefix", matched_prefix.map_or(Value::Null, Value::from))
            .with("therapy_type", proc.therapy_type.as_str())
            .with("therapy_covered", covered);

        if matched_prefix.is_none() {
            return RuleResult::fail(
                format!("diagnosis code not compatible: {}", proc.diagnosis_code),
                evidence,
            );
        }
        if !covered {
            return RuleResult::fail(
                format!("therapy not covered: {}", proc.therapy_type),
                evidence,
            );
        }
        RuleResult::pass("procedure covered", evidence)
    }
}
