//! Column summaries for the dataset statistics table.
//!
//! Quantiles use linear interpolation between order statistics and the
//! standard deviation is the sample (n - 1) estimator.

use nalgebra::DMatrix;
use serde::Serialize;

use crate::domain::{Dataset, Feature};

/// Name of the label column in summaries.
pub const LABEL_COLUMN: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN for fewer than two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summarize one column. Returns `None` for an empty or non-finite column.
pub fn describe_column(name: &str, values: &[f64]) -> Option<ColumnSummary> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
        (ss / (n as f64 - 1.0)).sqrt()
    } else {
        f64::NAN
    };

    Some(ColumnSummary {
        name: name.to_string(),
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear-interpolation quantile of an ascending, non-empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (n as f64 - 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Summaries for every feature column followed by the label column.
pub fn describe_dataset(dataset: &Dataset) -> Vec<ColumnSummary> {
    let x: DMatrix<f64> = dataset.design_matrix();
    let mut out = Vec::with_capacity(Feature::COUNT + 1);

    for feature in Feature::ALL {
        let column: Vec<f64> = x.column(feature.index()).iter().copied().collect();
        if let Some(summary) = describe_column(feature.name(), &column) {
            out.push(summary);
        }
    }

    let labels: Vec<f64> = dataset.labels().iter().map(|&y| f64::from(y)).collect();
    if let Some(summary) = describe_column(LABEL_COLUMN, &labels) {
        out.push(summary);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_matches_hand_computed_values() {
        let s = describe_column("x", &[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        // Sample std of 1..4 = sqrt(5/3)
        assert!((s.std - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert!((s.q25 - 1.75).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.q75 - 3.25).abs() < 1e-12);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn single_value_has_undefined_std() {
        let s = describe_column("x", &[7.0]).unwrap();
        assert!(s.std.is_nan());
        assert_eq!(s.median, 7.0);
    }

    #[test]
    fn empty_or_non_finite_columns_are_skipped() {
        assert!(describe_column("x", &[]).is_none());
        assert!(describe_column("x", &[1.0, f64::NAN]).is_none());
    }

    #[test]
    fn dataset_summary_has_label_column_last() {
        let data = crate::data::generate_dataset(100, 42).unwrap();
        let summary = describe_dataset(&data.dataset);
        assert_eq!(summary.len(), Feature::COUNT + 1);
        assert_eq!(summary[0].name, "current_ratio");
        let label = summary.last().unwrap();
        assert_eq!(label.name, LABEL_COLUMN);
        assert!((label.mean - data.dataset.default_rate()).abs() < 1e-12);
    }
}
