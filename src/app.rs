//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - generates the synthetic dataset and trains the classifier
//! - prints the batch report (text or JSON) and the score histogram
//! - runs the interactive scorer

use std::io;

use clap::Parser;
use tracing::info;

use crate::cli::prompt::{Prompter, run_session};
use crate::cli::{Cli, Command};
use crate::domain::RunConfig;
use crate::error::{AppError, EXIT_MODEL};

pub mod pipeline;

/// Entry point for the `sme` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; flags and the process environment still apply.
    let _ = dotenvy::dotenv();

    // `sme` and `sme --seed 7` behave like `sme run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    let args = cli.command.args();
    crate::logging::init(args.verbose);
    let config = args.to_config();
    config.validate()?;

    let mode = match cli.command {
        Command::Run(_) => Mode::ReportAndScore,
        Command::Report(_) => Mode::ReportOnly,
        Command::Score(_) => Mode::ScoreOnly,
    };
    check_output_mode(mode, &config)?;
    handle_run(&config, mode)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    ReportAndScore,
    ReportOnly,
    ScoreOnly,
}

/// JSON owns stdout, so it cannot share it with the interactive prompts.
fn check_output_mode(mode: Mode, config: &RunConfig) -> Result<(), AppError> {
    if config.json && mode != Mode::ReportOnly {
        return Err(AppError::usage(
            "--json is only supported by `sme report`; the interactive scorer writes to stdout.",
        ));
    }
    Ok(())
}

fn handle_run(config: &RunConfig, mode: Mode) -> Result<(), AppError> {
    if mode != Mode::ScoreOnly && !config.json {
        println!("Creating SME Trade Finance Dataset...");
    }

    let run = pipeline::run_training(config)?;

    if mode != Mode::ScoreOnly {
        print_report(&run, config)?;
    }

    if mode != Mode::ReportOnly {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        let scored = run_session(
            &run.model,
            &config.score_scale,
            &config.tier_policy,
            &mut prompter,
        )?;
        info!("Session ended after {scored} assessment(s)");
    }

    Ok(())
}

fn print_report(run: &pipeline::RunOutput, config: &RunConfig) -> Result<(), AppError> {
    let summary = pipeline::build_summary(run, config)?;

    if config.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| AppError::new(EXIT_MODEL, format!("Failed to serialize report: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", crate::report::format_run_summary(&summary));

    if config.plot {
        let plot = crate::plot::render_score_histogram(
            &summary.test_scores,
            &config.score_scale,
            &config.tier_policy,
            config.plot_width,
            config.plot_height,
        );
        println!("Test-set score distribution:");
        println!("{plot}");
    }

    Ok(())
}

/// Rewrite argv so `sme` defaults to `sme run`.
///
/// Rules:
/// - `sme`                       -> `sme run`
/// - `sme --seed 7 ...`          -> `sme run --seed 7 ...`
/// - `sme --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "report" | "score");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_run() {
        assert_eq!(rewrite_args(argv(&["sme"])), argv(&["sme", "run"]));
    }

    #[test]
    fn leading_flag_is_routed_to_run() {
        assert_eq!(
            rewrite_args(argv(&["sme", "--seed", "7"])),
            argv(&["sme", "run", "--seed", "7"])
        );
        assert_eq!(
            rewrite_args(argv(&["sme", "-n", "500"])),
            argv(&["sme", "run", "-n", "500"])
        );
    }

    #[test]
    fn json_is_limited_to_report_only() {
        let json = RunConfig {
            json: true,
            ..RunConfig::default()
        };
        assert!(check_output_mode(Mode::ReportOnly, &json).is_ok());
        for mode in [Mode::ReportAndScore, Mode::ScoreOnly] {
            let err = check_output_mode(mode, &json).unwrap_err();
            assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
        }

        let text = RunConfig::default();
        for mode in [Mode::ReportAndScore, Mode::ReportOnly, Mode::ScoreOnly] {
            assert!(check_output_mode(mode, &text).is_ok());
        }
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            &["sme", "report", "--json"][..],
            &["sme", "score"][..],
            &["sme", "--help"][..],
            &["sme", "-V"][..],
        ] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }
}
