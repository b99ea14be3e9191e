//! Gradient boosting classifier for binary default prediction.
//!
//! Log-loss boosting with least-squares regression trees:
//!
//! - start from the prior log-odds of default
//! - each stage fits a tree to the negative gradient `y - p`
//! - leaves take a single Newton step `Σ(y - p) / Σ p(1 - p)`
//! - the raw score moves by `learning_rate * leaf`
//!
//! `p = sigmoid(raw)` is the predicted probability of default.

use nalgebra::DMatrix;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::math::log_loss;
use crate::models::tree::{RegressionTree, TreeParams};
use crate::models::{Classifier, ModelError};

/// Denominators below this give a zero leaf step.
const MIN_HESSIAN: f64 = 1e-150;

/// GBM hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GbmParams {
    /// Number of boosting stages (trees).
    pub n_estimators: usize,
    /// Shrinkage applied to each tree's contribution.
    pub learning_rate: f64,
    /// Maximum depth of each tree.
    pub max_depth: usize,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Minimum samples required in a leaf.
    pub min_samples_leaf: usize,
    /// Fraction of rows drawn (without replacement) for each stage.
    pub subsample: f64,
    /// Seed for row subsampling.
    pub seed: u64,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: 42,
        }
    }
}

impl GbmParams {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParams("n_estimators must be >= 1".to_string()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ModelError::InvalidParams(format!(
                "learning_rate must be > 0 (got {})",
                self.learning_rate
            )));
        }
        if self.max_depth == 0 {
            return Err(ModelError::InvalidParams("max_depth must be >= 1".to_string()));
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidParams("min_samples_split must be >= 2".to_string()));
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParams("min_samples_leaf must be >= 1".to_string()));
        }
        if !(self.subsample.is_finite() && self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(ModelError::InvalidParams(format!(
                "subsample must be in (0, 1] (got {})",
                self.subsample
            )));
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

#[derive(Debug, Clone)]
struct FittedEnsemble {
    init: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
    importances: Vec<f64>,
    train_loss: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct GradientBoostingClassifier {
    params: GbmParams,
    fitted: Option<FittedEnsemble>,
}

impl GradientBoostingClassifier {
    pub fn new() -> Self {
        Self::with_params(GbmParams::default())
    }

    pub fn with_params(params: GbmParams) -> Self {
        Self {
            params,
            fitted: None,
        }
    }

    pub fn params(&self) -> &GbmParams {
        &self.params
    }

    pub fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    /// Normalized impurity-decrease importances, one per feature column.
    ///
    /// Sums to 1 unless no tree ever split (then all zeros).
    pub fn feature_importances(&self) -> Result<&[f64], ModelError> {
        self.fitted
            .as_ref()
            .map(|f| f.importances.as_slice())
            .ok_or(ModelError::NotTrained)
    }

    /// Training log-loss after each stage.
    pub fn train_loss(&self) -> Result<&[f64], ModelError> {
        self.fitted
            .as_ref()
            .map(|f| f.train_loss.as_slice())
            .ok_or(ModelError::NotTrained)
    }

    fn raw_score(ensemble: &FittedEnsemble, learning_rate: f64, x: &DMatrix<f64>, row: usize) -> f64 {
        ensemble
            .trees
            .iter()
            .fold(ensemble.init, |acc, tree| acc + learning_rate * tree.predict_row(x, row))
    }
}

impl Default for GradientBoostingClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for GradientBoostingClassifier {
    fn fit(&mut self, x: &DMatrix<f64>, y: &[u8]) -> Result<(), ModelError> {
        self.params.validate()?;

        let n = x.nrows();
        if n == 0 || x.ncols() == 0 {
            return Err(ModelError::InvalidData("Empty feature matrix".to_string()));
        }
        if y.len() != n {
            return Err(ModelError::InvalidData(format!(
                "{} rows but {} labels",
                n,
                y.len()
            )));
        }
        if y.iter().any(|&v| v > 1) {
            return Err(ModelError::InvalidData("Labels must be 0 or 1".to_string()));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidData("Feature matrix has non-finite values".to_string()));
        }

        let n_pos = y.iter().filter(|&&v| v == 1).count();
        if n_pos == 0 || n_pos == n {
            return Err(ModelError::SingleClass);
        }

        info!(
            "Training GBM classifier with {} samples and {} features",
            n,
            x.ncols()
        );
        debug!("Parameters: {:?}", self.params);

        let prior = n_pos as f64 / n as f64;
        let init = (prior / (1.0 - prior)).ln();
        let targets: Vec<f64> = y.iter().map(|&v| f64::from(v)).collect();
        let tree_params = self.params.tree_params();
        let lr = self.params.learning_rate;

        let mut raw = vec![init; n];
        let mut importances = vec![0.0; x.ncols()];
        let mut trees = Vec::with_capacity(self.params.n_estimators);
        let mut train_loss = Vec::with_capacity(self.params.n_estimators);
        let mut rng = StdRng::seed_from_u64(self.params.seed);

        for stage in 0..self.params.n_estimators {
            let probs: Vec<f64> = raw.iter().map(|&f| sigmoid(f)).collect();
            let residual: Vec<f64> = targets.iter().zip(&probs).map(|(t, p)| t - p).collect();

            let rows = sample_rows(&mut rng, n, self.params.subsample);

            let newton_step = |leaf_rows: &[usize]| {
                let mut num = 0.0;
                let mut den = 0.0;
                for &r in leaf_rows {
                    num += residual[r];
                    den += probs[r] * (1.0 - probs[r]);
                }
                if den.abs() < MIN_HESSIAN { 0.0 } else { num / den }
            };

            let tree = RegressionTree::fit(x, &residual, &rows, &tree_params, &mut importances, &newton_step);

            raw.par_iter_mut()
                .enumerate()
                .for_each(|(i, f)| *f += lr * tree.predict_row(x, i));
            trees.push(tree);

            let probs: Vec<f64> = raw.iter().map(|&f| sigmoid(f)).collect();
            let loss = log_loss(y, &probs).unwrap_or(f64::NAN);
            train_loss.push(loss);
            if stage % 10 == 0 {
                debug!(stage, loss, "boosting stage");
            }
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for v in &mut importances {
                *v /= total;
            }
        }

        info!(
            "Classifier training completed; final training log-loss {:.4}",
            train_loss.last().copied().unwrap_or(f64::NAN)
        );

        self.fitted = Some(FittedEnsemble {
            init,
            trees,
            n_features: x.ncols(),
            importances,
            train_loss,
        });
        Ok(())
    }

    fn predict_proba(&self, x: &DMatrix<f64>) -> Result<Vec<f64>, ModelError> {
        let ensemble = self.fitted.as_ref().ok_or(ModelError::NotTrained)?;
        if x.ncols() != ensemble.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: ensemble.n_features,
                got: x.ncols(),
            });
        }

        let lr = self.params.learning_rate;
        Ok((0..x.nrows())
            .into_par_iter()
            .map(|row| sigmoid(Self::raw_score(ensemble, lr, x, row)))
            .collect())
    }
}

fn sigmoid(f: f64) -> f64 {
    if f >= 0.0 {
        1.0 / (1.0 + (-f).exp())
    } else {
        let e = f.exp();
        e / (1.0 + e)
    }
}

/// Row indices for one stage, ascending.
fn sample_rows(rng: &mut StdRng, n: usize, subsample: f64) -> Vec<usize> {
    if subsample >= 1.0 {
        return (0..n).collect();
    }
    let k = ((subsample * n as f64).round() as usize).clamp(1, n);
    let mut rows = index::sample(rng, n, k).into_vec();
    rows.sort_unstable();
    rows
}
