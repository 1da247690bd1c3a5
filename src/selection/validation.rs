//! Train / held-out splits for scoring a grid point.
//!
//! Two strategies are supported:
//!
//! - **Partition**: shuffle once with [`PARTITION_SEED`], cut the permutation
//!   into consecutive folds of `validation_size` rows (the last fold may be
//!   shorter) and hold out each fold in turn. Scored with MSE.
//! - **Bootstrap**: round `i` shuffles with seed `i`, trains on the first
//!   `min(bootstrap_size, n / 3)` rows and holds out the rest. Scored with MAE.
//!
//! Splits depend only on the row count and the seeds, so every grid point is
//! scored on exactly the same rows.

use ndarray::Array1;

use crate::dataset::permutation;
use crate::error::{RegressionError, Result};
use crate::loss::{Loss, MAELoss, MSELoss};
use crate::selection::{MIN_TRAINING_ROWS, PARTITION_SEED};

/// Row indices of one validation round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub held_out: Vec<usize>,
}

/// Partition `0..n` into consecutive held-out folds of a shuffled order.
pub fn partition_splits(n: usize, validation_size: usize) -> Vec<Split> {
    if validation_size == 0 {
        return Vec::new();
    }
    let order = permutation(n, PARTITION_SEED);

    (0..n)
        .step_by(validation_size)
        .map(|start| {
            let end = (start + validation_size).min(n);
            let held_out = order[start..end].to_vec();
            let train = order[..start]
                .iter()
                .chain(&order[end..])
                .copied()
                .collect();
            Split { train, held_out }
        })
        .collect()
}

/// First `training_size` rows of a seeded permutation versus the remainder.
pub fn bootstrap_split(n: usize, training_size: usize, seed: u64) -> Split {
    let mut order = permutation(n, seed);
    let held_out = order.split_off(training_size.min(n));
    Split {
        train: order,
        held_out,
    }
}

/// How each grid point is validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationStrategy {
    Partition { validation_size: usize },
    Bootstrap { bootstrap_size: usize, runs: usize },
}

impl ValidationStrategy {
    /// Partition validation when `validation_size > 0`, bootstrap otherwise.
    pub fn from_knobs(validation_size: usize, bootstrap_size: usize, bootstrap_runs: usize) -> Self {
        if validation_size > 0 {
            ValidationStrategy::Partition { validation_size }
        } else {
            ValidationStrategy::Bootstrap {
                bootstrap_size,
                runs: bootstrap_runs,
            }
        }
    }

    /// Rows each bootstrap round trains on for a dataset of `n` rows.
    pub fn bootstrap_training_size(bootstrap_size: usize, n: usize) -> usize {
        bootstrap_size.min(n / 3)
    }

    /// Rejects configurations the dataset cannot support, before any fitting.
    pub fn check(&self, n: usize) -> Result<()> {
        match *self {
            ValidationStrategy::Partition { validation_size } => {
                let required = validation_size + MIN_TRAINING_ROWS;
                if n < required {
                    return Err(RegressionError::insufficient(
                        format!("partition validation with folds of {}", validation_size),
                        required,
                        n,
                    ));
                }
            }
            ValidationStrategy::Bootstrap {
                bootstrap_size,
                runs,
            } => {
                if runs == 0 {
                    return Err(RegressionError::InvalidParameter(
                        "Bootstrap validation needs at least one round".to_string(),
                    ));
                }
                let training = Self::bootstrap_training_size(bootstrap_size, n);
                if training < MIN_TRAINING_ROWS {
                    // n / 3 >= MIN_TRAINING_ROWS needs n >= 3 * MIN_TRAINING_ROWS
                    let required = if bootstrap_size < MIN_TRAINING_ROWS {
                        MIN_TRAINING_ROWS
                    } else {
                        3 * MIN_TRAINING_ROWS
                    };
                    let available = if bootstrap_size < MIN_TRAINING_ROWS {
                        bootstrap_size
                    } else {
                        n
                    };
                    return Err(RegressionError::insufficient(
                        format!("bootstrap validation with {} training rows", bootstrap_size),
                        required,
                        available,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Every validation round for a dataset of `n` rows.
    pub fn splits(&self, n: usize) -> Vec<Split> {
        match *self {
            ValidationStrategy::Partition { validation_size } => {
                partition_splits(n, validation_size)
            }
            ValidationStrategy::Bootstrap {
                bootstrap_size,
                runs,
            } => {
                let training = Self::bootstrap_training_size(bootstrap_size, n);
                (0..runs)
                    .map(|round| bootstrap_split(n, training, round as u64))
                    .collect()
            }
        }
    }

    /// Held-out error of one round.
    pub fn score(&self, prediction: &Array1<f64>, target: &Array1<f64>) -> Result<f64> {
        match self {
            ValidationStrategy::Partition { .. } => MSELoss.loss(prediction, target),
            ValidationStrategy::Bootstrap { .. } => MAELoss.loss(prediction, target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_partition_fold_sizes() {
        let splits = partition_splits(10, 3);
        let sizes: Vec<usize> = splits.iter().map(|s| s.held_out.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);
        for split in &splits {
            assert_eq!(split.train.len() + split.held_out.len(), 10);
        }
    }

    #[test]
    fn test_partition_uses_fixed_seed() {
        assert_eq!(partition_splits(12, 2), partition_splits(12, 2));
        let order = permutation(12, PARTITION_SEED);
        assert_eq!(partition_splits(12, 2)[0].held_out, order[0..2].to_vec());
    }

    #[test]
    fn test_leave_one_out() {
        let splits = partition_splits(5, 1);
        assert_eq!(splits.len(), 5);
        assert!(splits.iter().all(|s| s.held_out.len() == 1 && s.train.len() == 4));
    }

    #[test]
    fn test_bootstrap_split_sizes() {
        let split = bootstrap_split(30, 10, 4);
        assert_eq!(split.train.len(), 10);
        assert_eq!(split.held_out.len(), 20);
        assert_eq!(split.train, permutation(30, 4)[..10].to_vec());
    }

    #[test]
    fn test_bootstrap_rounds_use_round_index_as_seed() {
        let strategy = ValidationStrategy::from_knobs(0, 100, 3);
        let splits = strategy.splits(30);
        assert_eq!(splits.len(), 3);
        for (round, split) in splits.iter().enumerate() {
            // capped at n / 3
            assert_eq!(split, &bootstrap_split(30, 10, round as u64));
        }
    }

    #[test]
    fn test_from_knobs() {
        assert_eq!(
            ValidationStrategy::from_knobs(2, 50, 7),
            ValidationStrategy::Partition { validation_size: 2 }
        );
        assert_eq!(
            ValidationStrategy::from_knobs(0, 50, 7),
            ValidationStrategy::Bootstrap {
                bootstrap_size: 50,
                runs: 7
            }
        );
    }

    #[test]
    fn test_check_partition() {
        let strategy = ValidationStrategy::Partition { validation_size: 3 };
        assert!(strategy.check(5).is_ok());
        let err = strategy.check(4).unwrap_err();
        assert!(matches!(
            err,
            RegressionError::InsufficientData {
                required: 5,
                available: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_check_bootstrap() {
        let ok = ValidationStrategy::Bootstrap {
            bootstrap_size: 10,
            runs: 3,
        };
        assert!(ok.check(6).is_ok());
        assert!(matches!(
            ok.check(5),
            Err(RegressionError::InsufficientData { .. })
        ));

        let zero_size = ValidationStrategy::Bootstrap {
            bootstrap_size: 0,
            runs: 3,
        };
        assert!(matches!(
            zero_size.check(100),
            Err(RegressionError::InsufficientData { .. })
        ));

        let zero_runs = ValidationStrategy::Bootstrap {
            bootstrap_size: 10,
            runs: 0,
        };
        assert!(matches!(
            zero_runs.check(100),
            Err(RegressionError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_score_metric_per_strategy() {
        let pred = array![1.0, 4.0];
        let target = array![0.0, 0.0];
        let partition = ValidationStrategy::Partition { validation_size: 1 };
        let bootstrap = ValidationStrategy::Bootstrap {
            bootstrap_size: 2,
            runs: 1,
        };
        assert_eq!(partition.score(&pred, &target).unwrap(), 8.5);
        assert_eq!(bootstrap.score(&pred, &target).unwrap(), 2.5);
    }

    proptest! {
        #[test]
        fn prop_partition_folds_cover_every_row_once(n in 1usize..60, size in 1usize..12) {
            let splits = partition_splits(n, size);
            let mut held: Vec<usize> = splits.iter().flat_map(|s| s.held_out.clone()).collect();
            held.sort_unstable();
            prop_assert_eq!(held, (0..n).collect::<Vec<_>>());

            for split in &splits {
                let mut all: Vec<usize> = split.train.iter().chain(&split.held_out).copied().collect();
                all.sort_unstable();
                prop_assert_eq!(all, (0..n).collect::<Vec<_>>());
            }
        }

        #[test]
        fn prop_bootstrap_segments_are_disjoint(n in 0usize..80, size in 0usize..40, seed in 0u64..1000) {
            let split = bootstrap_split(n, size, seed);
            prop_assert!(split.train.iter().all(|i| !split.held_out.contains(i)));
            prop_assert_eq!(split.train.len() + split.held_out.len(), n);
        }
    }
}
