//! Shared training pipeline used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! synthetic data -> train/test split -> GBM fit -> test-set scoring
//!
//! The subcommands then only differ in what they print.

use tracing::info;

use crate::data::{SyntheticData, generate_dataset, train_test_split};
use crate::domain::{Dataset, Feature, RunConfig};
use crate::error::AppError;
use crate::math::{describe_dataset, roc_auc};
use crate::models::{Classifier, GradientBoostingClassifier};
use crate::report::{RunSummary, count_tiers, rank_importances, sample_scores};

/// All computed outputs of a single training run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub synthetic: SyntheticData,
    pub train: Dataset,
    pub test: Dataset,
    pub model: GradientBoostingClassifier,
    /// Predicted default probabilities for the test split, in test order.
    pub test_probs: Vec<f64>,
    pub test_scores: Vec<f64>,
    pub roc_auc: Option<f64>,
}

/// Generate data, split it, fit the classifier and score the test split.
pub fn run_training(config: &RunConfig) -> Result<RunOutput, AppError> {
    config.validate()?;

    let synthetic = generate_dataset(config.sample_count, config.sample_seed)?;
    info!(
        "Generated {} records (default rate {:.2}%)",
        synthetic.dataset.len(),
        synthetic.dataset.default_rate() * 100.0
    );

    let (train, test) = train_test_split(&synthetic.dataset, config.test_size, config.split_seed)?;
    info!("Split: train={} test={}", train.len(), test.len());

    let mut model = GradientBoostingClassifier::with_params(config.gbm.clone());
    model.fit(&train.design_matrix(), train.labels())?;

    let test_probs = model.predict_proba(&test.design_matrix())?;
    let test_scores: Vec<f64> = test_probs
        .iter()
        .map(|&p| config.score_scale.score(p))
        .collect();
    let auc = roc_auc(test.labels(), &test_probs);
    match auc {
        Some(auc) => info!("Test ROC-AUC: {auc:.3}"),
        None => info!("Test ROC-AUC undefined: test split holds a single class"),
    }

    Ok(RunOutput {
        synthetic,
        train,
        test,
        model,
        test_probs,
        test_scores,
        roc_auc: auc,
    })
}

/// Collect everything the batch report prints.
pub fn build_summary(run: &RunOutput, config: &RunConfig) -> Result<RunSummary, AppError> {
    let dataset = &run.synthetic.dataset;
    let importances = run.model.feature_importances()?;

    Ok(RunSummary {
        generated_at: chrono::Local::now(),
        sample_count: dataset.len(),
        sample_seed: config.sample_seed,
        n_train: run.train.len(),
        n_test: run.test.len(),
        default_rate: dataset.default_rate(),
        features: Feature::ALL.iter().map(|f| f.name()).collect(),
        statistics: describe_dataset(dataset),
        roc_auc: run.roc_auc,
        tier_policy: config.tier_policy,
        score_scale: config.score_scale,
        tier_counts: count_tiers(&run.test_scores, &config.tier_policy),
        sample_scores: sample_scores(
            &run.test_probs,
            config.preview,
            &config.score_scale,
            &config.tier_policy,
        ),
        top_features: rank_importances(importances, config.top_features),
        test_scores: run.test_scores.clone(),
    })
}
