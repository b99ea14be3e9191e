//! ASCII histogram of credit scores for terminal output.
//!
//! Fixed-size grid, deterministic output (helpful for golden tests).
//!
//! Plot elements:
//! - score counts: `#` bars, one column per bin
//! - axis: `-`, with `+` where the tier floors fall

use crate::scoring::{ScoreScale, TierPolicy};

/// Render a histogram of `scores` across the score scale.
pub fn render_score_histogram(
    scores: &[f64],
    scale: &ScoreScale,
    policy: &TierPolicy,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(3);

    let mut counts = vec![0usize; width];
    let mut n = 0usize;
    for &s in scores.iter().filter(|s| s.is_finite()) {
        counts[map_x(s, scale.min, scale.max, width)] += 1;
        n += 1;
    }

    let tallest = counts.iter().copied().max().unwrap_or(0);
    if tallest == 0 {
        return "Scores: nothing to plot\n".to_string();
    }

    // Bar height in rows, rounded up so every non-empty bin shows.
    let bars: Vec<usize> = counts
        .iter()
        .map(|&c| (c * height).div_ceil(tallest))
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        "Scores: [{:.0}, {:.0}] | n={n} | tallest bin={tallest} | + = tier floors ({:.0}, {:.0})\n",
        scale.min, scale.max, policy.medium_floor, policy.low_floor
    ));

    for row in 0..height {
        let level = height - row;
        let line: String = bars
            .iter()
            .map(|&b| if b >= level { '#' } else { ' ' })
            .collect();
        out.push_str(&line);
        out.push('\n');
    }

    let mut axis = vec!['-'; width];
    for floor in [policy.medium_floor, policy.low_floor] {
        if floor >= scale.min && floor <= scale.max {
            axis[map_x(floor, scale.min, scale.max, width)] = '+';
        }
    }
    out.push_str(&axis.into_iter().collect::<String>());
    out.push('\n');

    out
}

fn map_x(v: f64, v_min: f64, v_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((v - v_min) / (v_max - v_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}
