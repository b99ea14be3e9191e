//! Command-line parsing for the SME credit scorer.
//!
//! Argument parsing and command dispatch stay separate from the modeling code:
//! this module only describes flags and turns them into a `RunConfig`.

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::RunConfig;
use crate::models::GbmParams;
use crate::scoring::{ScoreScale, TierPolicy};

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "sme",
    version,
    about = "SME Trade Finance Credit Risk Scoring (synthetic data + gradient boosting)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train, print the batch report, then score applicants interactively.
    Run(RunArgs),
    /// Train and print the batch report only (useful for scripting).
    Report(RunArgs),
    /// Train quietly, then score applicants interactively.
    Score(RunArgs),
}

impl Command {
    pub fn args(&self) -> &RunArgs {
        match self {
            Command::Run(args) | Command::Report(args) | Command::Score(args) => args,
        }
    }
}

/// Options shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Number of synthetic SMEs to generate.
    #[arg(short = 'n', long, env = "SME_SAMPLES", default_value_t = 1000)]
    pub samples: usize,

    /// Random seed for dataset generation.
    #[arg(long, env = "SME_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Fraction of the dataset held out for evaluation.
    #[arg(long, default_value_t = 0.3)]
    pub test_size: f64,

    /// Random seed for the train/test shuffle.
    #[arg(long, default_value_t = 42)]
    pub split_seed: u64,

    /// Number of boosting stages.
    #[arg(long, default_value_t = 100)]
    pub n_estimators: usize,

    /// Shrinkage per boosting stage.
    #[arg(long, default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Maximum depth of each tree.
    #[arg(long, default_value_t = 3)]
    pub max_depth: usize,

    /// Minimum samples required to split a node.
    #[arg(long, default_value_t = 2)]
    pub min_samples_split: usize,

    /// Minimum samples required in a leaf.
    #[arg(long, default_value_t = 1)]
    pub min_samples_leaf: usize,

    /// Fraction of training rows drawn for each stage.
    #[arg(long, default_value_t = 1.0)]
    pub subsample: f64,

    /// Scores above this are LOW risk.
    #[arg(long, default_value_t = 70.0)]
    pub low_floor: f64,

    /// Scores above this (and not LOW) are MEDIUM risk; the rest are HIGH.
    #[arg(long, default_value_t = 50.0)]
    pub medium_floor: f64,

    /// How many test-set scores to list in the report.
    #[arg(long, default_value_t = 10)]
    pub preview: usize,

    /// How many features to list in the importance table.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Render an ASCII score histogram in the report (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the score histogram.
    #[arg(long)]
    pub no_plot: bool,

    /// Histogram width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Histogram height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,

    /// Print the batch report as JSON instead of text (`report` only).
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl RunArgs {
    pub fn to_config(&self) -> RunConfig {
        RunConfig {
            sample_count: self.samples,
            sample_seed: self.seed,
            test_size: self.test_size,
            split_seed: self.split_seed,
            gbm: GbmParams {
                n_estimators: self.n_estimators,
                learning_rate: self.learning_rate,
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
                min_samples_leaf: self.min_samples_leaf,
                subsample: self.subsample,
                seed: self.seed,
            },
            tier_policy: TierPolicy {
                low_floor: self.low_floor,
                medium_floor: self.medium_floor,
            },
            score_scale: ScoreScale::default(),
            preview: self.preview,
            top_features: self.top,
            plot: self.plot && !self.no_plot,
            plot_width: self.width,
            plot_height: self.height,
            json: self.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn defaults_reproduce_the_reference_run() {
        let cli = parse(&["sme", "report", "--seed", "42", "-n", "1000"]);
        let config = cli.command.args().to_config();
        let reference = RunConfig::default();

        assert_eq!(config.sample_count, reference.sample_count);
        assert_eq!(config.sample_seed, reference.sample_seed);
        assert_eq!(config.test_size, reference.test_size);
        assert_eq!(config.gbm, reference.gbm);
        assert_eq!(config.tier_policy, reference.tier_policy);
        assert_eq!(config.preview, 10);
        assert_eq!(config.top_features, 5);
        assert!(config.plot);
        assert!(!config.json);
    }

    #[test]
    fn no_plot_and_json_flags() {
        let cli = parse(&["sme", "report", "--no-plot", "--json", "--seed", "1"]);
        let config = cli.command.args().to_config();
        assert!(!config.plot);
        assert!(config.json);
    }

    #[test]
    fn verbosity_counts_repeats() {
        let cli = parse(&["sme", "score", "-vv", "--seed", "1"]);
        assert_eq!(cli.command.args().verbose, 2);
    }

    #[test]
    fn tier_floors_flow_into_policy() {
        let cli = parse(&[
            "sme",
            "run",
            "--low-floor",
            "80",
            "--medium-floor",
            "40",
            "--seed",
            "1",
        ]);
        let policy = cli.command.args().to_config().tier_policy;
        assert_eq!(policy.low_floor, 80.0);
        assert_eq!(policy.medium_floor, 40.0);
    }
}
