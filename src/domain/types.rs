//! Shared domain types.
//!
//! These types are intentionally kept small: a record is six numbers, a dataset
//! is a list of records plus a parallel 0/1 label vector.

use nalgebra::DMatrix;
use serde::Serialize;

use crate::error::AppError;
use crate::models::GbmParams;
use crate::scoring::{ScoreScale, TierPolicy};

/// One column of the SME feature table, in canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    CurrentRatio,
    DebtToEquity,
    EbitdaMargin,
    CustomerConcentration,
    YearsInOperation,
    TradeVolume,
}

impl Feature {
    /// All features in design-matrix column order.
    pub const ALL: [Feature; 6] = [
        Feature::CurrentRatio,
        Feature::DebtToEquity,
        Feature::EbitdaMargin,
        Feature::CustomerConcentration,
        Feature::YearsInOperation,
        Feature::TradeVolume,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Column index in the design matrix.
    pub fn index(self) -> usize {
        match self {
            Feature::CurrentRatio => 0,
            Feature::DebtToEquity => 1,
            Feature::EbitdaMargin => 2,
            Feature::CustomerConcentration => 3,
            Feature::YearsInOperation => 4,
            Feature::TradeVolume => 5,
        }
    }

    /// Column name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Feature::CurrentRatio => "current_ratio",
            Feature::DebtToEquity => "debt_to_equity",
            Feature::EbitdaMargin => "ebitda_margin",
            Feature::CustomerConcentration => "customer_concentration",
            Feature::YearsInOperation => "years_in_operation",
            Feature::TradeVolume => "trade_volume",
        }
    }

    /// Console prompt for the interactive scorer.
    pub fn prompt(self) -> &'static str {
        match self {
            Feature::CurrentRatio => "Current Ratio (current assets/current liabilities, e.g., 1.8): ",
            Feature::DebtToEquity => "Debt-to-Equity Ratio (total debt/total equity, e.g., 1.5): ",
            Feature::EbitdaMargin => "EBITDA Margin (as decimal, e.g., 0.12 for 12%): ",
            Feature::CustomerConcentration => {
                "Customer Concentration (% of revenue from top clients as decimal, e.g., 0.45): "
            }
            Feature::YearsInOperation => "Years in Operation (e.g., 6): ",
            Feature::TradeVolume => "Annual Trade Volume (in currency units, e.g., 5000000): ",
        }
    }

    /// Whether the value must be a whole number.
    pub fn is_integer(self) -> bool {
        matches!(self, Feature::YearsInOperation)
    }

    /// Check a value against the field's admissible range.
    ///
    /// Returns the corrective message shown to the operator on failure.
    pub fn validate(self, value: f64) -> Result<(), &'static str> {
        if !value.is_finite() {
            return Err("Please enter a valid number");
        }
        let ok = match self {
            Feature::CurrentRatio => value > 0.0,
            Feature::DebtToEquity => value >= 0.0,
            Feature::EbitdaMargin => (-1.0..=1.0).contains(&value),
            Feature::CustomerConcentration => (0.0..=1.0).contains(&value),
            Feature::YearsInOperation => value > 0.0 && value.fract() == 0.0,
            Feature::TradeVolume => value > 0.0,
        };
        if ok { Ok(()) } else { Err(self.range_message()) }
    }

    fn range_message(self) -> &'static str {
        match self {
            Feature::CurrentRatio => "Current ratio must be positive",
            Feature::DebtToEquity => "Debt-to-equity ratio must be non-negative",
            Feature::EbitdaMargin => "EBITDA margin should be between -1 and 1",
            Feature::CustomerConcentration => "Customer concentration should be between 0 and 1",
            Feature::YearsInOperation => "Years in operation must be positive",
            Feature::TradeVolume => "Trade volume must be positive",
        }
    }
}

/// A field that failed validation while building a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {}: {message}", .feature.name())]
pub struct InvalidField {
    pub feature: Feature,
    pub message: &'static str,
}

/// Financial profile of one SME applicant.
///
/// Fields are private so a record can only exist in a validated state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancialRecord {
    current_ratio: f64,
    debt_to_equity: f64,
    ebitda_margin: f64,
    customer_concentration: f64,
    years_in_operation: u32,
    trade_volume: f64,
}

impl FinancialRecord {
    pub fn try_new(
        current_ratio: f64,
        debt_to_equity: f64,
        ebitda_margin: f64,
        customer_concentration: f64,
        years_in_operation: u32,
        trade_volume: f64,
    ) -> Result<Self, InvalidField> {
        let record = Self {
            current_ratio,
            debt_to_equity,
            ebitda_margin,
            customer_concentration,
            years_in_operation,
            trade_volume,
        };
        for feature in Feature::ALL {
            feature
                .validate(record.value(feature))
                .map_err(|message| InvalidField { feature, message })?;
        }
        Ok(record)
    }

    /// Build a record from values in `Feature::ALL` order.
    pub fn from_values(values: [f64; Feature::COUNT]) -> Result<Self, InvalidField> {
        let years = values[Feature::YearsInOperation.index()];
        Feature::YearsInOperation
            .validate(years)
            .map_err(|message| InvalidField {
                feature: Feature::YearsInOperation,
                message,
            })?;
        if years > f64::from(u32::MAX) {
            return Err(InvalidField {
                feature: Feature::YearsInOperation,
                message: "Years in operation is out of range",
            });
        }

        Self::try_new(
            values[0],
            values[1],
            values[2],
            values[3],
            years as u32,
            values[5],
        )
    }

    pub fn current_ratio(&self) -> f64 {
        self.current_ratio
    }

    pub fn debt_to_equity(&self) -> f64 {
        self.debt_to_equity
    }

    pub fn ebitda_margin(&self) -> f64 {
        self.ebitda_margin
    }

    pub fn customer_concentration(&self) -> f64 {
        self.customer_concentration
    }

    pub fn years_in_operation(&self) -> u32 {
        self.years_in_operation
    }

    pub fn trade_volume(&self) -> f64 {
        self.trade_volume
    }

    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::CurrentRatio => self.current_ratio,
            Feature::DebtToEquity => self.debt_to_equity,
            Feature::EbitdaMargin => self.ebitda_margin,
            Feature::CustomerConcentration => self.customer_concentration,
            Feature::YearsInOperation => f64::from(self.years_in_operation),
            Feature::TradeVolume => self.trade_volume,
        }
    }

    /// Feature values in design-matrix column order.
    pub fn values(&self) -> [f64; Feature::COUNT] {
        Feature::ALL.map(|f| self.value(f))
    }
}

/// Labelled sample: records plus a parallel default flag (1 = defaulted).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<FinancialRecord>,
    labels: Vec<u8>,
}

impl Dataset {
    pub fn new(records: Vec<FinancialRecord>, labels: Vec<u8>) -> Result<Self, AppError> {
        if records.len() != labels.len() {
            return Err(AppError::new(
                4,
                format!(
                    "Dataset shape mismatch: {} records vs {} labels.",
                    records.len(),
                    labels.len()
                ),
            ));
        }
        if labels.iter().any(|&y| y > 1) {
            return Err(AppError::new(4, "Dataset labels must be 0 or 1."));
        }
        Ok(Self { records, labels })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Fraction of records labelled as defaulted (0 for an empty dataset).
    pub fn default_rate(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        let defaults = self.labels.iter().filter(|&&y| y == 1).count();
        defaults as f64 / self.labels.len() as f64
    }

    /// Dense `n x 6` design matrix, columns in `Feature::ALL` order.
    pub fn design_matrix(&self) -> DMatrix<f64> {
        design_matrix(&self.records)
    }

    /// New dataset holding the rows at `indices` (in that order).
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            records: indices.iter().map(|&i| self.records[i]).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

/// Build a design matrix for arbitrary records.
pub fn design_matrix(records: &[FinancialRecord]) -> DMatrix<f64> {
    DMatrix::from_fn(records.len(), Feature::COUNT, |i, j| {
        records[i].value(Feature::ALL[j])
    })
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment and defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sample_count: usize,
    pub sample_seed: u64,
    pub test_size: f64,
    pub split_seed: u64,
    pub gbm: GbmParams,
    pub tier_policy: TierPolicy,
    pub score_scale: ScoreScale,

    /// Number of test-set scores listed in the report.
    pub preview: usize,
    /// Number of features listed in the importance table.
    pub top_features: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sample_count: 1000,
            sample_seed: 42,
            test_size: 0.3,
            split_seed: 42,
            gbm: GbmParams::default(),
            tier_policy: TierPolicy::default(),
            score_scale: ScoreScale::default(),
            preview: 10,
            top_features: 5,
            plot: true,
            plot_width: 60,
            plot_height: 12,
            json: false,
        }
    }
}

impl RunConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.sample_count == 0 {
            return Err(AppError::usage("Sample count must be > 0."));
        }
        if !(self.test_size.is_finite() && self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(AppError::usage(format!(
                "Invalid test size {}: must be in (0, 1).",
                self.test_size
            )));
        }
        self.tier_policy.validate()?;
        self.score_scale.validate()?;
        self.gbm
            .validate()
            .map_err(|e| AppError::usage(e.to_string()))?;
        Ok(())
    }
}
