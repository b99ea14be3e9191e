//! Interactive console scorer.
//!
//! Reads one applicant at a time, re-prompting until every field parses and
//! lies in range, then prints the assessment from a fitted model. The prompter
//! is generic over its input and output so sessions can be scripted in tests.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::domain::{Feature, FinancialRecord};
use crate::error::AppError;
use crate::models::Classifier;
use crate::report::{format_assessment, rule};
use crate::scoring::{ScoreScale, TierPolicy, assess};

const INVALID_NUMBER: &str = "Please enter a valid number";
const CONTINUE_PROMPT: &str =
    "\nDo you want to predict credit score for a new SME customer? (y/n): ";
const FAREWELL: &str = "Thank you for using the SME Trade Finance Credit Risk Assessment System!";

/// Line-oriented console I/O for the scorer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output sink (scripted sessions inspect it).
    pub fn into_output(self) -> W {
        self.output
    }

    /// Write `text` followed by a newline.
    pub fn say(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.output, "{text}")
            .map_err(|e| AppError::usage(format!("Failed to write output: {e}")))
    }

    /// Show `prompt` and read one trimmed line.
    ///
    /// End of input is an error: there is nobody left to answer.
    fn ask(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.output, "{prompt}")
            .and_then(|()| self.output.flush())
            .map_err(|e| AppError::usage(format!("Failed to write prompt: {e}")))?;

        let mut line = String::new();
        let bytes = self
            .input
            .read_line(&mut line)
            .map_err(|e| AppError::usage(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::usage("No input received; ending the session."));
        }
        Ok(line.trim().to_string())
    }

    /// Read one field, re-prompting until it parses and passes validation.
    pub fn prompt_feature(&mut self, feature: Feature) -> Result<f64, AppError> {
        loop {
            let answer = self.ask(feature.prompt())?;
            let Some(value) = parse_value(feature, &answer) else {
                self.say(INVALID_NUMBER)?;
                continue;
            };
            match feature.validate(value) {
                Ok(()) => return Ok(value),
                Err(message) => self.say(message)?,
            }
        }
    }

    /// Collect a full applicant record, field by field in column order.
    pub fn read_record(&mut self) -> Result<FinancialRecord, AppError> {
        let mut values = [0.0; Feature::COUNT];
        for feature in Feature::ALL {
            values[feature.index()] = self.prompt_feature(feature)?;
        }
        FinancialRecord::from_values(values).map_err(|e| AppError::usage(e.to_string()))
    }

    /// Ask whether to score another applicant. Only `y` or `n` are accepted.
    pub fn ask_continue(&mut self) -> Result<bool, AppError> {
        loop {
            let answer = self.ask(CONTINUE_PROMPT)?.to_lowercase();
            match answer.as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => self.say("Please enter 'y' for yes or 'n' for no")?,
            }
        }
    }
}

/// Parse raw input for `feature`. Integer fields refuse fractional input.
fn parse_value(feature: Feature, raw: &str) -> Option<f64> {
    if feature.is_integer() {
        let v = raw.parse::<i64>().ok()?;
        if v > i64::from(u32::MAX) {
            return None;
        }
        Some(v as f64)
    } else {
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Prompt for one applicant and print the assessment.
pub fn score_applicant<M, R, W>(
    model: &M,
    scale: &ScoreScale,
    policy: &TierPolicy,
    prompter: &mut Prompter<R, W>,
) -> Result<(), AppError>
where
    M: Classifier + ?Sized,
    R: BufRead,
    W: Write,
{
    prompter.say(&format!("\n{}", rule()))?;
    prompter.say("SME TRADE FINANCE CREDIT SCORE PREDICTION")?;
    prompter.say(&rule())?;
    prompter.say("\nPlease enter the following SME financial information:")?;

    let record = prompter.read_record()?;
    let probability = model.predict_record(&record)?;
    let assessment = assess(&record, probability, scale, policy);
    debug!(
        "Assessed applicant: p={:.4} score={:.1} tier={:?}",
        assessment.probability, assessment.score, assessment.tier
    );

    prompter.say(format_assessment(&assessment, scale).trim_end())
}

/// Run the ask/score loop until the operator answers `n`.
///
/// Returns how many applicants were scored.
pub fn run_session<M, R, W>(
    model: &M,
    scale: &ScoreScale,
    policy: &TierPolicy,
    prompter: &mut Prompter<R, W>,
) -> Result<usize, AppError>
where
    M: Classifier + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut scored = 0;
    while prompter.ask_continue()? {
        score_applicant(model, scale, policy, prompter)?;
        scored += 1;
    }
    prompter.say(FAREWELL)?;
    Ok(scored)
}
