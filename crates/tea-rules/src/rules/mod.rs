//! # Built-in Rules
//!
//! The seven checks every request goes through, in report order:
//!
//! | Rule | Report key |
//! |---|---|
//! | [`Eligibility`] | `elegibilidade` |
//! | [`Coverage`] | `cobertura` |
//! | [`SessionLimit`] | `limites` |
//! | [`FrequencyMax`] | `frequencia_maxima` |
//! | [`MinimumInterval`] | `intervalo_minimo` |
//! | [`ForbiddenRepetition`] | `repeticao_proibida` |
//! | [`SameDayExclusion`] | `mesmo_dia` |

pub mod coverage;
pub mod eligibility;
pub mod frequency;
pub mod interval;
pub mod repetition;
pub mod same_day;
pub mod session_limit;

pub use coverage::Coverage;
pub use eligibility::Eligibility;
pub use frequency::FrequencyMax;
pub use interval::MinimumInterval;
pub use repetition::ForbiddenRepetition;
pub use same_day::SameDayExclusion;
pub use session_limit::SessionLimit;

use crate::evaluation::RuleEvaluator;

/// The built-in registry, in report order.
pub fn default_rules() -> Vec<Box<dyn RuleEvaluator>> {
    vec![
        Box::new(Eligibility),
        Box::new(Coverage),
        Box::new(SessionLimit),
        Box::new(FrequencyMax),
        Box::new(MinimumInterval),
        Box::new(ForbiddenRepetition),
        Box::new(SameDayExclusion),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_order_and_names() {
        let names: Vec<String> = default_rules().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(
            names,
            [
                "elegibilidade",
                "cobertura",
                "limites",
                "frequencia_maxima",
                "intervalo_minimo",
                "repeticao_proibida",
                "mesmo_dia"
            ]
        );
    }
}
