//! Forbidden repetition window: a procedure (typically an assessment) may
//! not be repeated within a configured number of days of its last
//! occurrence. Unlike the minimum interval, the requested quantity plays no
//! part.

use serde_json::Value;
use tea_core::RuleContext;
use tea_policy::PolicyConfig;

use crate::evaluation::{Evidence, RuleEvaluator, RuleResult};

/// Report key.
pub const NAME: &str = "repeticao_proibida";

/// Forbidden repetition window rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbiddenRepetition;

impl RuleEvaluator for ForbiddenRepetition {
    fn name(&self) -> &str {
        NAME
    }

    fn evaluate(&self, ctx: &RuleContext, config: &PolicyConfig) -> RuleResult {
        let proc = &ctx.procedure;
        let therapy = &proc.therapy_type;
        let window_days = config.forbidden_repetition_days(therapy);

        if window_days == 0 {
            return RuleResult::pass(
                format!("no forbidden repetition window for {therapy}"),
                Evidence::new().with("window_days", 0),
            );
        }

        let Some(last) = ctx.sessions().last_on_or_before(therapy, proc.request_date) else {
            return RuleResult::pass(
                "first occurrence; repetition window respected",
                Evidence::new()
                    .with("window_days", window_days)
                    .with("days_since_last", Value::Null),
            );
        };

        let days = proc.request_date.days_since(last);
        let evidence = Evidence::new()
            .with("last_occurrence_date", last.to_iso8601())
            .with("days_since_last", days)
            .with("window_days", window_days);

        if days >= i64::from(window_days) {
            RuleResult::pass(
                format!("repetition window respected: {days}d >= {window_days}d"),
                evidence,
            )
        } else {
            RuleResult::fail(
                format!("forbidden repetition: {days}d < {window_days}d since last occurrence"),
                evidence,
            )
        }
    }
}
