//! Maximum sessions per period bucket.
//!
//! Consumption is counted over the request date's bucket (day, ISO week,
//! month, or year), so history entries dated later in the same bucket count
//! too. The requested sessions are added before comparing to the limit.

use serde_json::Value;
use tea_core::RuleContext;
use tea_policy::PolicyConfig;

use crate::evaluation::{Evidence, RuleEvaluator, RuleResult};

/// Report key.
pub const NAME: &str = "frequencia_maxima";

/// Frequency rule. Unconfigured therapy types pass through.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyMax;

impl RuleEvaluator for FrequencyMax {
    fn name(&self) -> &str {
        NAME
    }

    fn evaluate(&self, ctx: &RuleContext, config: &PolicyConfig) -> RuleResult {
        let proc = &ctx.procedure;
        let therapy = &proc.therapy_type;

        let Some(rule) = config.frequency_rule(therapy) else {
            return RuleResult::pass(
                format!("no frequency rule configured for {therapy}"),
                Evidence::new().with("consumed", 0).with("limit", Value::Null),
            );
        };

        let consumed = ctx
            .sessions()
            .count_in_period(therapy, rule.period, proc.request_date) as u64;
        let requested = u64::from(proc.requested_quantity.get());
        let projected = consumed + requested;
        let limit = u64::from(rule.quantity);

        let evidence = Evidence::new()
            .with("period", rule.period.as_str())
            .with("period_key", proc.request_date.period_key(rule.period).to_string())
            .with("consumed", consumed)
            .with("requested", requested)
            .with("projected", projected)
            .with("limit", limit);

        if projected <= limit {
            RuleResult::pass(
                format!("frequency within limit: {projected}/{limit} in period {}", rule.period),
                evidence,
            )
        } else {
            RuleResult::fail(
                format!("frequency exceeded: {projected}/{limit} in period {}", rule.period),
                evidence,
            )
        }
    }
}
