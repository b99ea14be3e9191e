//! Batch report: score previews, importance rankings, tier counts, and the
//! text formatting in `format`.

pub mod format;

pub use format::*;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::Feature;
use crate::math::ColumnSummary;
use crate::scoring::{RiskTier, ScoreScale, TierPolicy};

/// One scored test-set customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleScore {
    /// 1-based position in the test set.
    pub customer: usize,
    pub probability: f64,
    pub score: f64,
    pub tier: RiskTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: Feature,
    pub importance: f64,
}

/// Count of test-set customers per risk tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Everything the batch report prints, in one serializable value.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Local>,
    pub sample_count: usize,
    pub sample_seed: u64,
    pub n_train: usize,
    pub n_test: usize,
    pub default_rate: f64,
    pub features: Vec<&'static str>,
    pub statistics: Vec<ColumnSummary>,
    /// ROC-AUC on the test split (`None` if the split holds a single class).
    pub roc_auc: Option<f64>,
    pub tier_policy: TierPolicy,
    pub score_scale: ScoreScale,
    pub tier_counts: TierCounts,
    pub sample_scores: Vec<SampleScore>,
    pub top_features: Vec<FeatureImportance>,
    /// All test-set scores (not serialized; used for the histogram).
    #[serde(skip)]
    pub test_scores: Vec<f64>,
}

/// Score and tier the first `limit` probabilities.
pub fn sample_scores(
    probabilities: &[f64],
    limit: usize,
    scale: &ScoreScale,
    policy: &TierPolicy,
) -> Vec<SampleScore> {
    probabilities
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, &p)| {
            let score = scale.score(p);
            SampleScore {
                customer: i + 1,
                probability: p,
                score,
                tier: policy.tier(score),
            }
        })
        .collect()
}

/// Rank features by importance (descending) and keep the top `top_n`.
///
/// Ties keep column order.
pub fn rank_importances(importances: &[f64], top_n: usize) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = Feature::ALL
        .iter()
        .zip(importances)
        .map(|(&feature, &importance)| FeatureImportance {
            feature,
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked.truncate(top_n);
    ranked
}

pub fn count_tiers(scores: &[f64], policy: &TierPolicy) -> TierCounts {
    let mut counts = TierCounts::default();
    for &s in scores {
        match policy.tier(s) {
            RiskTier::Low => counts.low += 1,
            RiskTier::Medium => counts.medium += 1,
            RiskTier::High => counts.high += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_scores_number_from_one() {
        let probs = [0.1, 0.4, 0.8, 0.2];
        let out = sample_scores(&probs, 3, &ScoreScale::default(), &TierPolicy::default());
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].customer, 1);
        assert!((out[0].score - 90.0).abs() < 1e-9);
        assert_eq!(out[0].tier, RiskTier::Low);
        assert_eq!(out[1].tier, RiskTier::Medium);
        assert_eq!(out[2].tier, RiskTier::High);
    }

    #[test]
    fn importances_rank_descending() {
        let imp = [0.05, 0.40, 0.10, 0.05, 0.25, 0.15];
        let ranked = rank_importances(&imp, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].feature, Feature::DebtToEquity);
        assert_eq!(ranked[1].feature, Feature::YearsInOperation);
        assert_eq!(ranked[2].feature, Feature::TradeVolume);
        // Tie between current_ratio and customer_concentration keeps column order.
        assert_eq!(ranked[4].feature, Feature::CurrentRatio);
    }

    #[test]
    fn tier_counts_cover_every_score() {
        let scores = [95.0, 71.0, 70.0, 55.0, 50.0, 10.0];
        let counts = count_tiers(&scores, &TierPolicy::default());
        assert_eq!(counts, TierCounts { low: 2, medium: 2, high: 2 });
    }
}
