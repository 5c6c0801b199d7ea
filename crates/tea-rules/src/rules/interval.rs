//! Minimum number of days between sessions of the same type.
//!
//! The last session considered is the latest one on or before the request
//! date. A request for more than one session at once is never compliant
//! when an interval is configured, because the sessions inside the batch
//! could not be spaced; the message says so explicitly.

use serde_json::Value;
use tea_core::RuleContext;
use tea_policy::PolicyConfig;

use crate::evaluation::{Evidence, RuleEvaluator, RuleResult};

/// Report key.
pub const NAME: &str = "intervalo_minimo";

/// Minimum interval rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimumInterval;

impl RuleEvaluator for MinimumInterval {
    fn name(&self) -> &str {
        NAME
    }

    fn evaluate(&self, ctx: &RuleContext, config: &PolicyConfig) -> RuleResult {
        let proc = &ctx.procedure;
        let therapy = &proc.therapy_type;
        let min_days = config.minimum_interval_days(therapy);

        if min_days == 0 {
            return RuleResult::pass(
                format!("no minimum interval configured for {therapy}"),
                Evidence::new().with("min_days", 0),
            );
        }

        let Some(last) = ctx.sessions().last_on_or_before(therapy, proc.request_date) else {
            return RuleResult::pass(
                "no prior session; minimum interval satisfied",
                Evidence::new()
                    .with("min_days", min_days)
                    .with("days_since_last", Value::Null),
            );
        };

        let days = proc.request_date.days_since(last);
        let requested = proc.requested_quantity.get();
        let interval_ok = days >= i64::from(min_days);
        let compliant = interval_ok && (requested == 1 || min_days == 0);

        let evidence = Evidence::new()
            .with("last_session_date", last.to_iso8601())
            .with("days_since_last", days)
            .with("min_days", min_days)
            .with("requested", requested);

        if compliant {
            RuleResult::pass(
                format!("minimum interval satisfied: {days}d >= {min_days}d"),
                evidence,
            )
        } else if interval_ok {
            RuleResult::fail(
                format!(
                    "minimum interval of {min_days}d cannot hold for {requested} sessions requested at once"
                ),
                evidence,
            )
        } else {
            RuleResult::fail(
                format!("minimum interval not satisfied: {days}d since last session, {min_days}d required"),
                evidence,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{policy, ContextBuilder};
    use serde_json::json;

    fn eval(ctx: ContextBuilder) -> RuleResult {
        MinimumInterval.evaluate(&ctx.build(), &policy())
    }

    fn fono() -> ContextBuilder {
        ContextBuilder::new().therapy("Fono")
    }

    #[test]
    fn too_soon_after_last_session() {
        let r = eval(fono().on("2024-03-10").session("Fono", "2024-03-07"));
        assert!(!r.compliant);
        assert_eq!(r.evidence.get("days_since_last"), Some(&json!(3)));
        assert_eq!(r.evidence.get("min_days"), Some(&json!(7)));
        assert_eq!(r.evidence.get("last_session_date"), Some(&json!("2024-03-07")));
    }

    #[test]
    fn exactly_min_days_is_compliant() {
        let r = eval(fono().on("2024-03-10").session("Fono", "2024-03-03"));
        assert!(r.compliant);
        assert_eq!(r.evidence.get("days_since_last"), Some(&json!(7)));
    }

    #[test]
    fn latest_prior_session_is_used() {
        let r = eval(
            fono()
                .on("2024-03-10")
                .session("Fono", "2024-03-08")
                .session("Fono", "2024-02-01"),
        );
        assert_eq!(r.evidence.get("last_session_date"), Some(&json!("2024-03-08")));
    }

    #[test]
    fn future_sessions_are_ignored() {
        let r = eval(fono().on("2024-03-10").session("Fono", "2024-03-12"));
        assert!(r.compliant);
        assert_eq!(r.evidence.get("days_since_last"), Some(&Value::Null));
    }

    #[test]
    fn same_day_session_gives_zero_days() {
        let r = eval(fono().on("2024-03-10").session("Fono", "2024-03-10"));
        assert!(!r.compliant);
        assert_eq!(r.evidence.get("days_since_last"), Some(&json!(0)));
    }

    #[test]
    fn no_prior_session() {
        let r = eval(fono().session("ABA", "2024-03-09"));
        assert!(r.compliant);
        assert!(r.message.contains("no prior session"));
    }

    #[test]
    fn batched_request_fails_even_when_interval_holds() {
        let r = eval(fono().quantity(2).on("2024-03-30").session("Fono", "2024-03-01"));
        assert!(!r.compliant);
        assert!(r.message.contains("2 sessions requested at once"));
        assert_eq!(r.evidence.get("requested"), Some(&json!(2)));
    }

    #[test]
    fn batched_request_without_history_passes() {
        assert!(eval(fono().quantity(3)).compliant);
    }

    #[test]
    fn unconfigured_type_passes() {
        let r = eval(ContextBuilder::new().therapy("ABA").session("ABA", "2024-03-09"));
        assert!(r.compliant);
        assert_eq!(r.evidence.get("min_days"), Some(&json!(0)));
    }
}
