//! Seeded shuffle split into train and test sets.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::Dataset;
use crate::error::AppError;

/// Shuffle row indices with `seed`; the first `ceil(test_size * n)` rows become
/// the test set and the rest the training set.
pub fn train_test_split(
    dataset: &Dataset,
    test_size: f64,
    seed: u64,
) -> Result<(Dataset, Dataset), AppError> {
    if !(test_size.is_finite() && test_size > 0.0 && test_size < 1.0) {
        return Err(AppError::new(
            2,
            format!("Invalid test size {test_size}: must be in (0, 1)."),
        ));
    }

    let n = dataset.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(AppError::new(
            2,
            format!("Cannot split {n} records with test size {test_size}: one side would be empty."),
        ));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    Ok((dataset.select(train_idx), dataset.select(test_idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_dataset;

    #[test]
    fn split_sizes_match_test_fraction() {
        let data = generate_dataset(1000, 42).unwrap();
        let (train, test) = train_test_split(&data.dataset, 0.3, 42).unwrap();
        assert_eq!(train.len(), 700);
        assert_eq!(test.len(), 300);
    }

    #[test]
    fn split_partitions_the_records() {
        let data = generate_dataset(50, 1).unwrap();
        let (train, test) = train_test_split(&data.dataset, 0.3, 9).unwrap();

        let mut seen: Vec<_> = train
            .records()
            .iter()
            .chain(test.records())
            .map(|r| r.values().map(f64::to_bits))
            .collect();
        let mut all: Vec<_> = data
            .dataset
            .records()
            .iter()
            .map(|r| r.values().map(f64::to_bits))
            .collect();
        seen.sort();
        all.sort();
        assert_eq!(seen, all);
    }

    #[test]
    fn split_is_deterministic_per_seed() {
        let data = generate_dataset(200, 3).unwrap();
        let a = train_test_split(&data.dataset, 0.25, 5).unwrap();
        let b = train_test_split(&data.dataset, 0.25, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_splits_are_rejected() {
        let data = generate_dataset(1, 3).unwrap();
        assert!(train_test_split(&data.dataset, 0.3, 1).is_err());

        let data = generate_dataset(10, 3).unwrap();
        assert!(train_test_split(&data.dataset, 0.0, 1).is_err());
        assert!(train_test_split(&data.dataset, 1.0, 1).is_err());
    }
}
