//! Default probability to credit score.
//!
//! `score = max - p * (max - min)`; with the default 0–100 scale this is
//! `100 - 100p`, so the score falls as the default probability rises.

use serde::Serialize;

use crate::error::AppError;

/// Output range of the credit score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreScale {
    pub min: f64,
    pub max: f64,
}

impl Default for ScoreScale {
    fn default() -> Self {
        Self { min: 0.0, max: 100.0 }
    }
}

impl ScoreScale {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.min.is_finite() && self.max.is_finite() && self.max > self.min) {
            return Err(AppError::usage(format!(
                "Invalid score scale [{}, {}]: max must exceed min.",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Map a default probability onto the scale.
    ///
    /// Not clamped: a probability in [0, 1] lands in [min, max].
    pub fn score(&self, probability: f64) -> f64 {
        self.max - probability * (self.max - self.min)
    }
}

/// Score on the default 0–100 scale.
pub fn probability_to_score(probability: f64) -> f64 {
    ScoreScale::default().score(probability)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_is_one_hundred_minus_percent() {
        for i in 0..=100 {
            let p = i as f64 / 100.0;
            let s = probability_to_score(p);
            assert!((s - (100.0 - 100.0 * p)).abs() < 1e-9, "p={p}: got {s}");
        }
        assert_eq!(probability_to_score(0.0), 100.0);
        assert_eq!(probability_to_score(1.0), 0.0);
    }

    #[test]
    fn score_is_non_increasing_in_probability() {
        let mut prev = f64::INFINITY;
        for i in 0..=1000 {
            let s = probability_to_score(i as f64 / 1000.0);
            assert!(s <= prev, "score rose at step {i}: {prev} -> {s}");
            prev = s;
        }
    }

    #[test]
    fn custom_scale_maps_endpoints() {
        let scale = ScoreScale { min: 300.0, max: 850.0 };
        assert!((scale.score(0.0) - 850.0).abs() < 1e-9);
        assert!((scale.score(1.0) - 300.0).abs() < 1e-9);
        assert!((scale.score(0.5) - 575.0).abs() < 1e-9);
    }

    #[test]
    fn inverted_scale_is_rejected() {
        assert!(ScoreScale { min: 100.0, max: 0.0 }.validate().is_err());
        assert!(ScoreScale::default().validate().is_ok());
    }
}
