//! Same-day exclusion: for configured types, at most one session per day
//! counting both the history and the sessions being requested.

use tea_core::RuleContext;
use tea_policy::PolicyConfig;

use crate::evaluation::{Evidence, RuleEvaluator, RuleResult};

/// Report key.
pub const NAME: &str = "mesmo_dia";

/// Same-day exclusion rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameDayExclusion;

impl RuleEvaluator for SameDayExclusion {
    fn name(&self) -> &str {
        NAME
    }

    fn evaluate(&self, ctx: &RuleContext, config: &PolicyConfig) -> RuleResult {
        let proc = &ctx.procedure;
        let therapy = &proc.therapy_type;

        if !config.forbids_same_day(therapy) {
            return RuleResult::pass(
                format!("no same-day restriction for {therapy}"),
                Evidence::new()
                    .with("therapy_type", therapy.as_str())
                    .with("restricted", false),
            );
        }

        let already = ctx.sessions().count_on_date(therapy, proc.request_date) as u64;
        let requested = u64::from(proc.requested_quantity.get());
        let total = already + requested;
        let evidence = Evidence::new()
            .with("therapy_type", therapy.as_str())
            .with("restricted", true)
            .with("date", proc.request_date.to_iso8601())
            .with("already_on_date", already)
            .with("requested", requested)
            .with("total", total);

        if total <= 1 {
            RuleResult::pass("same-day restriction satisfied", evidence)
        } else {
            RuleResult::fail(
                format!(
                    "same-day violation: {total} sessions of {therapy} on {}",
                    proc.request_date
                ),
                evidence,
            )
        }
    }
}
