//! Synthetic SME credit sample generation.
//!
//! Each feature is drawn column by column from its own uniform range. A
//! simulated default probability is then derived from six risk sub-scores,
//! and a binary default label is drawn against it. Everything comes from one
//! `StdRng` seeded once, so the same seed reproduces the sample exactly.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Uniform;
use tracing::debug;

use crate::domain::{Dataset, FinancialRecord};
use crate::error::AppError;

/// Floor and cap on the simulated default probability.
pub const MIN_DEFAULT_PROB: f64 = 0.05;
pub const MAX_DEFAULT_PROB: f64 = 0.80;

const CURRENT_RATIO_RANGE: (f64, f64) = (0.5, 4.0);
const DEBT_TO_EQUITY_RANGE: (f64, f64) = (0.1, 8.0);
const EBITDA_MARGIN_RANGE: (f64, f64) = (-0.2, 0.4);
const CONCENTRATION_RANGE: (f64, f64) = (0.1, 0.9);
/// Half-open: years are drawn from 1..=24.
const YEARS_RANGE: (u32, u32) = (1, 25);
const TRADE_VOLUME_RANGE: (f64, f64) = (100_000.0, 50_000_000.0);

/// Generated sample plus the probabilities its labels were drawn from.
#[derive(Debug, Clone)]
pub struct SyntheticData {
    pub dataset: Dataset,
    /// Simulated default probability per record (never shown to the model).
    pub default_probs: Vec<f64>,
}

pub fn generate_dataset(sample_count: usize, seed: u64) -> Result<SyntheticData, AppError> {
    if sample_count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let current_ratio = uniform_column(&mut rng, CURRENT_RATIO_RANGE, sample_count);
    let debt_to_equity = uniform_column(&mut rng, DEBT_TO_EQUITY_RANGE, sample_count);
    let ebitda_margin = uniform_column(&mut rng, EBITDA_MARGIN_RANGE, sample_count);
    let concentration = uniform_column(&mut rng, CONCENTRATION_RANGE, sample_count);
    let years: Vec<u32> = Uniform::new(YEARS_RANGE.0, YEARS_RANGE.1)
        .sample_iter(&mut rng)
        .take(sample_count)
        .collect();
    let trade_volume = uniform_column(&mut rng, TRADE_VOLUME_RANGE, sample_count);

    let mut records = Vec::with_capacity(sample_count);
    for i in 0..sample_count {
        let record = FinancialRecord::try_new(
            current_ratio[i],
            debt_to_equity[i],
            ebitda_margin[i],
            concentration[i],
            years[i],
            trade_volume[i],
        )
        .map_err(|e| AppError::new(4, format!("Generated an invalid record: {e}")))?;
        records.push(record);
    }

    let default_probs: Vec<f64> = records.iter().map(default_probability).collect();

    // Label draws come after all feature draws so the feature columns do not
    // depend on how labels are sampled.
    let labels: Vec<u8> = default_probs
        .iter()
        .map(|&p| u8::from(rng.r#gen::<f64>() < p))
        .collect();

    let dataset = Dataset::new(records, labels)?;
    debug!(
        n = dataset.len(),
        default_rate = dataset.default_rate(),
        "generated synthetic sample"
    );

    Ok(SyntheticData {
        dataset,
        default_probs,
    })
}

fn uniform_column(rng: &mut StdRng, range: (f64, f64), n: usize) -> Vec<f64> {
    Uniform::new(range.0, range.1)
        .sample_iter(rng)
        .take(n)
        .collect()
}

/// Individually normalized risk sub-scores for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskComponents {
    pub liquidity: f64,
    pub leverage: f64,
    pub profitability: f64,
    pub concentration: f64,
    pub maturity: f64,
    pub volume: f64,
}

impl RiskComponents {
    pub fn from_record(record: &FinancialRecord) -> Self {
        Self {
            liquidity: 1.0 / (1.0 + record.current_ratio()),
            leverage: record.debt_to_equity() / 10.0,
            // Only negative margins add risk.
            profitability: (-record.ebitda_margin() * 2.0).max(0.0),
            concentration: record.customer_concentration() * 0.5,
            maturity: 1.0 / (1.0 + f64::from(record.years_in_operation()) / 10.0),
            volume: 1.0 / (1.0 + record.trade_volume() / 10_000_000.0),
        }
    }

    pub fn mean(&self) -> f64 {
        (self.liquidity
            + self.leverage
            + self.profitability
            + self.concentration
            + self.maturity
            + self.volume)
            / 6.0
    }
}

/// Simulated probability of default, clamped to `[0.05, 0.80]`.
pub fn default_probability(record: &FinancialRecord) -> f64 {
    RiskComponents::from_record(record)
        .mean()
        .clamp(MIN_DEFAULT_PROB, MAX_DEFAULT_PROB)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Feature;
    use crate::scoring::{RiskTier, TierPolicy, probability_to_score};

    #[test]
    fn same_seed_reproduces_sample() {
        let a = generate_dataset(1000, 42).unwrap();
        let b = generate_dataset(1000, 42).unwrap();
        assert_eq!(a.dataset, b.dataset);
        assert_eq!(a.default_probs, b.default_probs);

        let c = generate_dataset(1000, 43).unwrap();
        assert_ne!(a.dataset, c.dataset);
    }

    #[test]
    fn probabilities_respect_floor_and_cap() {
        let data = generate_dataset(1000, 42).unwrap();
        assert_eq!(data.default_probs.len(), 1000);
        for &p in &data.default_probs {
            assert!(
                (MIN_DEFAULT_PROB..=MAX_DEFAULT_PROB).contains(&p),
                "probability out of bounds: {p}"
            );
        }
    }

    #[test]
    fn features_stay_in_their_ranges() {
        let data = generate_dataset(1000, 7).unwrap();
        let ranges = [
            (Feature::CurrentRatio, CURRENT_RATIO_RANGE),
            (Feature::DebtToEquity, DEBT_TO_EQUITY_RANGE),
            (Feature::EbitdaMargin, EBITDA_MARGIN_RANGE),
            (Feature::CustomerConcentration, CONCENTRATION_RANGE),
            (Feature::TradeVolume, TRADE_VOLUME_RANGE),
        ];
        for r in data.dataset.records() {
            for (feature, (lo, hi)) in ranges {
                let v = r.value(feature);
                assert!(v >= lo && v < hi, "{} = {v} outside [{lo}, {hi})", feature.name());
            }
            assert!((1..=24).contains(&r.years_in_operation()));
        }
    }

    #[test]
    fn labels_track_simulated_probability() {
        let data = generate_dataset(1000, 42).unwrap();
        let mean_prob: f64 = data.default_probs.iter().sum::<f64>() / 1000.0;
        let rate = data.dataset.default_rate();
        // 1000 Bernoulli draws: the realised rate sits well within 0.06 of the mean.
        assert!(
            (rate - mean_prob).abs() < 0.06,
            "default rate {rate:.3} far from mean probability {mean_prob:.3}"
        );
    }

    #[test]
    fn healthy_applicant_scores_low_risk() {
        let r = FinancialRecord::try_new(3.0, 0.5, 0.2, 0.1, 20, 40_000_000.0).unwrap();
        let p = default_probability(&r);
        // (0.25 + 0.05 + 0 + 0.05 + 1/3 + 0.2) / 6
        let expected = (0.25 + 0.05 + 0.0 + 0.05 + 1.0 / 3.0 + 0.2) / 6.0;
        assert!((p - expected).abs() < 1e-12, "got {p}, expected {expected}");

        let score = probability_to_score(p);
        assert!(score > 70.0, "score {score:.1} should be above 70");
        assert_eq!(TierPolicy::default().tier(score), RiskTier::Low);
    }

    #[test]
    fn distressed_applicant_scores_high_risk() {
        let r = FinancialRecord::try_new(0.6, 7.0, -0.15, 0.85, 1, 150_000.0).unwrap();
        let p = default_probability(&r);
        assert!(p > 0.6, "simulated probability {p:.3} should be high");

        let score = probability_to_score(p);
        let policy = TierPolicy::default();
        assert!(score <= policy.medium_floor, "score {score:.1} should be HIGH risk");
        assert_eq!(policy.tier(score), RiskTier::High);
    }

    #[test]
    fn clamping_applies_at_extremes() {
        let best = FinancialRecord::try_new(1e6, 0.0, 1.0, 0.0, 1_000, 1e12).unwrap();
        assert_eq!(default_probability(&best), MIN_DEFAULT_PROB);

        let worst = FinancialRecord::try_new(1e-6, 100.0, -1.0, 1.0, 1, 1.0).unwrap();
        assert_eq!(default_probability(&worst), MAX_DEFAULT_PROB);
    }

    #[test]
    fn zero_samples_is_an_error() {
        assert!(generate_dataset(0, 42).is_err());
    }
}
