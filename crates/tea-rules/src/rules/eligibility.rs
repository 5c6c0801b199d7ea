//! Beneficiary eligibility: active plan, age ceiling, satisfied waiting period.
//!
//! Checks run in that order and the first failure determines the message.
//! Evidence always carries all four inputs.

use tea_core::RuleContext;
use tea_policy::PolicyConfig;

use crate::evaluation::{Evidence, RuleEvaluator, RuleResult};

/// Report key.
pub const NAME: &str = "elegibilidade";

/// Eligibility rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct Eligibility;

impl RuleEvaluator for Eligibility {
    fn name(&self) -> &str {
        NAME
    }

    fn evaluate(&self, ctx: &RuleContext, config: &PolicyConfig) -> RuleResult {
        let b = &ctx.beneficiary;
        let max_age = config.max_age();
        let evidence = Evidence::new()
            .with("active", b.active)
            .with("age", b.age)
            .with("max_age", max_age)
            .with("waiting_period_days", b.waiting_period_days);

        if !b.active {
            return RuleResult::fail("inactive beneficiary", evidence);
        }
        if b.age > max_age {
            return RuleResult::fail(format!("age exceeds limit of {max_age}"), evidence);
        }
        if b.waiting_period_days > 0 {
            return RuleResult::fail(
                format!(
                    "waiting period of {} days not satisfied",
                    b.waiting_period_days
                ),
                evidence,
            );
        }
        RuleResult::pass("beneficiary eligible", evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{policy, ContextBuilder};
    use serde_json::json;

    fn eval(ctx: ContextBuilder) -> RuleResult {
        Eligibility.evaluate(&ctx.build(), &policy())
    }

    #[test]
    fn eligible_beneficiary() {
        let r = eval(ContextBuilder::new());
        assert!(r.compliant);
        assert_eq!(r.message, "beneficiary eligible");
    }

    #[test]
    fn inactive_beneficiary() {
        let r = eval(ContextBuilder::new().active(false).age(10));
        assert!(!r.compliant);
        assert!(r.message.contains("inactive"));
        assert_eq!(r.evidence.get("active"), Some(&json!(false)));
    }

    #[test]
    fn inactive_takes_precedence_over_age() {
        let r = eval(ContextBuilder::new().active(false).age(40));
        assert_eq!(r.message, "inactive beneficiary");
    }

    #[test]
    fn age_over_limit() {
        let r = eval(ContextBuilder::new().age(22));
        assert!(!r.compliant);
        assert_eq!(r.message, "age exceeds limit of 21");
        assert_eq!(r.evidence.get("age"), Some(&json!(22)));
        assert_eq!(r.evidence.get("max_age"), Some(&json!(21)));
    }

    #[test]
    fn age_at_limit_is_eligible() {
        assert!(eval(ContextBuilder::new().age(21)).compliant);
    }

    #[test]
    fn waiting_period_pending() {
        let r = eval(ContextBuilder::new().waiting_period(30));
        assert!(!r.compliant);
        assert_eq!(r.message, "waiting period of 30 days not satisfied");
    }

    #[test]
    fn non_positive_waiting_period_is_satisfied() {
        assert!(eval(ContextBuilder::new().waiting_period(0)).compliant);
        assert!(eval(ContextBuilder::new().waiting_period(-5)).compliant);
    }
}
