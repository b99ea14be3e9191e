//! Binary classifier metrics.

/// Area under the ROC curve for scores `y_score` against 0/1 labels.
///
/// Computed from the Mann–Whitney rank statistic with tied scores sharing the
/// average rank. Returns `None` when either class is absent or lengths differ.
pub fn roc_auc(y_true: &[u8], y_score: &[f64]) -> Option<f64> {
    if y_true.len() != y_score.len() || y_true.is_empty() {
        return None;
    }
    if y_score.iter().any(|s| !s.is_finite()) {
        return None;
    }

    let n_pos = y_true.iter().filter(|&&y| y == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| y_score[a].total_cmp(&y_score[b]));

    // Sum of (1-based, tie-averaged) ranks of the positive class.
    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && y_score[order[j + 1]] == y_score[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            if y_true[idx] == 1 {
                rank_sum_pos += avg_rank;
            }
        }
        i = j + 1;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    let u = rank_sum_pos - n_pos * (n_pos + 1.0) / 2.0;
    Some(u / (n_pos * n_neg))
}

/// Mean binary cross-entropy, with probabilities clipped away from 0 and 1.
pub fn log_loss(y_true: &[u8], y_prob: &[f64]) -> Option<f64> {
    if y_true.len() != y_prob.len() || y_true.is_empty() {
        return None;
    }
    const EPS: f64 = 1e-15;
    let total: f64 = y_true
        .iter()
        .zip(y_prob)
        .map(|(&y, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            if y == 1 { -p.ln() } else { -(1.0 - p).ln() }
        })
        .sum();
    Some(total / y_true.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_and_reversed_rankings() {
        let y = [0, 0, 1, 1];
        assert_eq!(roc_auc(&y, &[0.1, 0.2, 0.8, 0.9]), Some(1.0));
        assert_eq!(roc_auc(&y, &[0.9, 0.8, 0.2, 0.1]), Some(0.0));
    }

    #[test]
    fn ties_count_half() {
        let y = [0, 1, 0, 1];
        assert_eq!(roc_auc(&y, &[0.5; 4]), Some(0.5));

        // One positive above both negatives, one tied with a negative:
        // pairs = 4, wins = 3.5 (tie counts half).
        let auc = roc_auc(&[0, 0, 1, 1], &[0.1, 0.5, 0.5, 0.9]).unwrap();
        assert!((auc - 0.875).abs() < 1e-12, "got {auc}");
    }

    #[test]
    fn single_class_has_no_auc() {
        assert_eq!(roc_auc(&[1, 1, 1], &[0.1, 0.2, 0.3]), None);
        assert_eq!(roc_auc(&[0, 1], &[0.1]), None);
    }

    #[test]
    fn log_loss_is_small_for_confident_correct_predictions() {
        let good = log_loss(&[0, 1], &[0.01, 0.99]).unwrap();
        let bad = log_loss(&[0, 1], &[0.99, 0.01]).unwrap();
        assert!(good < 0.02);
        assert!(bad > 4.0);
        assert!(log_loss(&[1], &[0.0]).unwrap().is_finite());
    }
}
