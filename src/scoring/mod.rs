//! Probability-to-score transformation and credit decision policy.
//!
//! - map a default probability onto a display score (`transform`)
//! - band scores into risk tiers and recommendations (`tier`)
//! - qualitative ratio indicators for the assessment printout (`indicators`)

pub mod indicators;
pub mod tier;
pub mod transform;

pub use indicators::*;
pub use tier::*;
pub use transform::*;

use serde::Serialize;

use crate::domain::FinancialRecord;

/// Everything the scorer says about one applicant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub probability: f64,
    pub score: f64,
    pub tier: RiskTier,
    pub recommendation: Recommendation,
    pub indicators: Indicators,
}

/// Turn a model probability for `record` into a full assessment.
pub fn assess(
    record: &FinancialRecord,
    probability: f64,
    scale: &ScoreScale,
    policy: &TierPolicy,
) -> Assessment {
    let score = scale.score(probability);
    let tier = policy.tier(score);
    Assessment {
        probability,
        score,
        tier,
        recommendation: tier.recommendation(),
        indicators: Indicators::from_record(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assess_combines_score_tier_and_indicators() {
        let record = FinancialRecord::try_new(3.0, 0.5, 0.2, 0.1, 20, 4e7).unwrap();
        let a = assess(&record, 0.1, &ScoreScale::default(), &TierPolicy::default());
        assert!((a.score - 90.0).abs() < 1e-9);
        assert_eq!(a.tier, RiskTier::Low);
        assert_eq!(a.recommendation, Recommendation::Approve);
        assert_eq!(a.indicators.liquidity, Liquidity::Strong);
    }
}
