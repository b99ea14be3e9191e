//! Terminal formatting for the batch report and single-applicant assessments.

use crate::math::ColumnSummary;
use crate::report::RunSummary;
use crate::scoring::{Assessment, ScoreScale};

/// Width of the `=` rules around assessment blocks.
pub const RULE_WIDTH: usize = 60;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Format the full batch report (dataset, model performance, scores, importances).
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== sme - SME Trade Finance Credit Risk ===\n");
    out.push_str(&format!(
        "Generated: {}\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!(
        "Dataset shape: ({}, {})\n",
        summary.sample_count,
        summary.features.len() + 1
    ));
    out.push_str(&format!("Default rate: {}\n", fmt_pct(summary.default_rate, 2)));
    out.push_str(&format!("Features: [{}]\n", summary.features.join(", ")));

    out.push_str("\nDataset statistics:\n");
    out.push_str(&format_statistics(&summary.statistics));

    out.push_str("\nModel Performance:\n");
    match summary.roc_auc {
        Some(auc) => out.push_str(&format!("ROC-AUC: {auc:.3}\n")),
        None => out.push_str("ROC-AUC: n/a (test split holds a single class)\n"),
    }
    out.push_str(&format!(
        "Split: train={} | test={}\n",
        summary.n_train, summary.n_test
    ));

    out.push_str(&format!(
        "\nSample Credit Risk Scores ({:.0}-{:.0}, higher = better credit):\n",
        summary.score_scale.min, summary.score_scale.max
    ));
    for s in &summary.sample_scores {
        out.push_str(&format!(
            "Customer {}: {:.1} ({})\n",
            s.customer,
            s.score,
            s.tier.display_name()
        ));
    }

    let counts = summary.tier_counts;
    out.push_str(&format!(
        "\nRisk tiers on the test set (LOW > {:.0}, MEDIUM > {:.0}):\n",
        summary.tier_policy.low_floor, summary.tier_policy.medium_floor
    ));
    out.push_str(&format!("  Low Risk:    {}\n", counts.low));
    out.push_str(&format!("  Medium Risk: {}\n", counts.medium));
    out.push_str(&format!("  High Risk:   {}\n", counts.high));

    out.push_str(&format!(
        "\nTop {} Most Important Features:\n",
        summary.top_features.len()
    ));
    for f in &summary.top_features {
        out.push_str(&format!("{}: {:.3}\n", f.feature.name(), f.importance));
    }

    out
}

/// One row per column: count, mean, std, min, quartiles, max.
pub fn format_statistics(stats: &[ColumnSummary]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<24} {:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
            "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<24} {:-<6} {:-<14} {:-<14} {:-<14} {:-<14} {:-<14} {:-<14} {:-<14}\n",
            "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for s in stats {
        out.push_str(
            format!(
                "{:<24} {:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
                truncate(&s.name, 24),
                s.count,
                fmt_num(s.mean),
                fmt_num(s.std),
                fmt_num(s.min),
                fmt_num(s.q25),
                fmt_num(s.median),
                fmt_num(s.q75),
                fmt_num(s.max),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format one applicant's assessment block.
pub fn format_assessment(assessment: &Assessment, scale: &ScoreScale) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&rule());
    out.push_str("\nSME CREDIT ASSESSMENT RESULTS\n");
    out.push_str(&rule());
    out.push('\n');
    out.push_str(&format!(
        "Credit Score: {:.1}/{:.0}\n",
        assessment.score, scale.max
    ));
    out.push_str(&format!("Risk Level: {}\n", assessment.tier.headline()));
    out.push_str(&format!(
        "Default Probability: {}\n",
        fmt_pct(assessment.probability, 1)
    ));
    out.push_str(&format!(
        "Recommendation: {}\n",
        assessment.recommendation.display_name()
    ));

    out.push_str("\nKey Financial Health Indicators:\n");
    for (signal, text) in assessment.indicators.lines() {
        out.push_str(&format!("{} {text}\n", signal.marker()));
    }
    out.push_str(&rule());
    out.push('\n');

    out
}

fn fmt_pct(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "NaN".to_string();
    }
    if v.abs() >= 100_000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.4}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FinancialRecord;
    use crate::scoring::{TierPolicy, assess};

    #[test]
    fn assessment_block_lists_decision_and_indicators() {
        let record = FinancialRecord::try_new(1.2, 3.0, -0.05, 0.5, 4, 2e6).unwrap();
        let a = assess(&record, 0.423, &ScoreScale::default(), &TierPolicy::default());
        let text = format_assessment(&a, &ScoreScale::default());

        assert!(text.contains("Credit Score: 57.7/100"), "{text}");
        assert!(text.contains("Risk Level: MEDIUM RISK"));
        assert!(text.contains("Default Probability: 42.3%"));
        assert!(text.contains("Recommendation: REVIEW - Consider with conditions"));
        assert!(text.contains("⚠ Adequate liquidity"));
        assert!(text.contains("⚠ Moderate debt levels"));
        assert!(text.contains("✗ Operating losses"));
    }

    #[test]
    fn statistics_table_has_header_and_rows() {
        let stats = vec![
            crate::math::describe_column("trade_volume", &[100_000.0, 50_000_000.0]).unwrap(),
            crate::math::describe_column("default", &[0.0, 1.0]).unwrap(),
        ];
        let table = format_statistics(&stats);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("column"));
        assert!(lines[2].starts_with("trade_volume"));
        assert!(lines[2].contains("50000000"));
        assert!(lines[3].contains("0.5000"));
    }

    #[test]
    fn numbers_switch_to_integer_format_when_large() {
        assert_eq!(fmt_num(0.12345), "0.1235");
        assert_eq!(fmt_num(25_050_000.4), "25050000");
        assert_eq!(fmt_num(f64::NAN), "NaN");
        assert_eq!(fmt_pct(0.352, 2), "35.20%");
    }
}
