//! Default-probability classifiers.
//!
//! The pipeline only needs two capabilities from a model: fit on a design
//! matrix with 0/1 labels, and predict a default probability per row. Those
//! live on the `Classifier` trait so the interactive scorer can take any
//! fitted model by reference.

pub mod gbm;
pub mod tree;

pub use gbm::*;
pub use tree::*;

use nalgebra::DMatrix;
use thiserror::Error;

use crate::domain::{FinancialRecord, design_matrix};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Training labels contain a single class; need both defaults and non-defaults")]
    SingleClass,

    #[error("Model not trained")]
    NotTrained,

    #[error("Feature count mismatch: model expects {expected}, got {got}")]
    FeatureMismatch { expected: usize, got: usize },
}

pub trait Classifier {
    /// Fit on rows of `x` with labels `y` (1 = default).
    fn fit(&mut self, x: &DMatrix<f64>, y: &[u8]) -> Result<(), ModelError>;

    /// Probability of default for each row of `x`.
    fn predict_proba(&self, x: &DMatrix<f64>) -> Result<Vec<f64>, ModelError>;

    /// Probability of default for a single applicant.
    fn predict_record(&self, record: &FinancialRecord) -> Result<f64, ModelError> {
        let x = design_matrix(std::slice::from_ref(record));
        self.predict_proba(&x)?
            .first()
            .copied()
            .ok_or_else(|| ModelError::InvalidData("Empty prediction for a single record".to_string()))
    }
}
