//! Session quantity limit per therapy type and age band.

use serde_json::Value;
use tea_core::RuleContext;
use tea_policy::{AgeBand, PolicyConfig};

use crate::evaluation::{Evidence, RuleEvaluator, RuleResult};

/// Report key.
pub const NAME: &str = "limites";

/// Session limit rule.
///
/// An unparameterized therapy type fails: the policy must state a limit for
/// every type it expects to authorize.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionLimit;

impl RuleEvaluator for SessionLimit {
    fn name(&self) -> &str {
        NAME
    }

    fn evaluate(&self, ctx: &RuleContext, config: &PolicyConfig) -> RuleResult {
        let therapy = &ctx.procedure.therapy_type;
        let requested = ctx.procedure.requested_quantity.get();
        let band = AgeBand::for_age(ctx.beneficiary.age);
        let evidence = Evidence::new()
            .with("therapy_type", therapy.as_str())
            .with("band", band.as_str())
            .with("requested", requested);

        let Some(limits) = config.session_limits(therapy) else {
            return RuleResult::fail(
                format!("type not parameterized: {therapy}"),
                evidence.with("limit", Value::Null),
            );
        };

        let limit = limits.limit_for(band);
        let evidence = evidence.with("limit", limit);
        if requested > limit {
            RuleResult::fail(
                format!("{requested} exceeds limit of {limit} for {therapy} in band {band}"),
                evidence,
            )
        } else {
            RuleResult::pass(
                format!("{requested} within limit of {limit} for {therapy} in band {band}"),
                evidence,
            )
        }
    }
}
