//! Hyperparameter selection for [`NormalizedRegressor`](crate::model::NormalizedRegressor).
//!
//! A [`ModelSelector`] searches a grid of `(penalty, degree)` pairs with either
//! partition or bootstrap validation, retrains the winner and calibrates a
//! Gaussian residual spread. [`build_model`] runs the whole pipeline from a
//! [`SelectionConfig`].
//!
//! # Example
//! ```rust
//! use ndarray::{Array1, Array2};
//! use polyridge::selection::{build_model, SelectionConfig};
//!
//! let x = Array2::from_shape_fn((20, 1), |(i, _)| i as f64);
//! let y = Array1::from_shape_fn(20, |i| 3.0 * i as f64 - 4.0 + if i % 2 == 0 { 0.1 } else { -0.1 });
//!
//! let config = SelectionConfig::default().degrees(vec![1, 2]);
//! let selector = build_model(x, y, &config).unwrap();
//!
//! assert!(selector.best_degree().is_some());
//! let (mean, std) = selector.predict_datum(&[10.0]).unwrap();
//! assert!((mean - 26.0).abs() < 0.5);
//! assert!(std > 0.0);
//! ```

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RegressionError, Result};
use crate::model::{Regressor, RidgeRegression};

pub mod config;
pub mod selector;
pub mod validation;

pub use config::SelectionConfig;
pub use selector::{ModelSelector, SelectorState};
pub use validation::{bootstrap_split, partition_splits, Split, ValidationStrategy};

/// Candidate penalties searched when none are given.
pub const DEFAULT_PENALTIES: [f64; 11] = [0.005, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0];

/// Candidate polynomial degrees searched when none are given.
pub const DEFAULT_DEGREES: [usize; 4] = [1, 2, 3, 4];

/// Seed of the single shuffle used by partition validation.
pub const PARTITION_SEED: u64 = 0;

/// Smallest training segment a validation round may fit on.
pub const MIN_TRAINING_ROWS: usize = 2;

/// One point of the hyperparameter grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialParams {
    pub penalty: f64,
    pub degree: usize,
}

impl TrialParams {
    pub fn new(penalty: f64, degree: usize) -> Self {
        Self { penalty, degree }
    }
}

/// Average validation error of one grid point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridScore {
    pub params: TrialParams,
    pub error: f64,
}

/// Result of a grid search.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionOutcome {
    pub best: TrialParams,
    pub best_error: f64,
    /// Every grid point in search order (penalty outer, degree inner).
    pub scores: Vec<GridScore>,
}

/// Grids must be non-empty, penalties finite and non-negative, degrees positive.
pub(crate) fn validate_grid(penalties: &[f64], degrees: &[usize]) -> Result<()> {
    if penalties.is_empty() {
        return Err(RegressionError::InvalidParameter(
            "Penalty grid is empty".to_string(),
        ));
    }
    if degrees.is_empty() {
        return Err(RegressionError::InvalidParameter(
            "Degree grid is empty".to_string(),
        ));
    }
    if let Some(p) = penalties.iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
        return Err(RegressionError::InvalidParameter(format!(
            "Penalties must be finite and non-negative, got {}",
            p
        )));
    }
    if degrees.contains(&0) {
        return Err(RegressionError::InvalidParameter(
            "Polynomial degrees must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Select, retrain and calibrate a ridge model in one call.
///
/// Retrains on the full dataset when `validation_size > 0` or
/// `full_training` is set; otherwise retrains on `bootstrap_size` rows
/// shuffled with seed `bootstrap_runs`, the first seed no validation round
/// used.
pub fn build_model(
    x: Array2<f64>,
    y: Array1<f64>,
    config: &SelectionConfig,
) -> Result<ModelSelector<RidgeRegression>> {
    build_model_with(RidgeRegression::new(), x, y, config)
}

/// [`build_model`] with a caller-supplied solver.
pub fn build_model_with<R: Regressor>(
    regressor: R,
    x: Array2<f64>,
    y: Array1<f64>,
    config: &SelectionConfig,
) -> Result<ModelSelector<R>> {
    config.validate()?;

    let mut selector = ModelSelector::with_regressor(regressor)
        .normalize_penalty(config.normalize_penalty)
        .verbosity(config.verbosity);
    selector.feed_data(x, y)?;

    if config.verbosity >= 1 {
        info!(rows = selector.dataset().map_or(0, |d| d.len()), "selecting model");
    }
    selector.select_model(
        &config.penalties,
        &config.degrees,
        config.validation_size,
        config.bootstrap_size,
        config.bootstrap_runs,
    )?;

    if config.validation_size > 0 || config.full_training {
        selector.retrain_model(0, 0)?;
    } else {
        selector.retrain_model(config.bootstrap_size, config.bootstrap_runs as u64)?;
    }
    selector.calc_residual_std()?;

    Ok(selector)
}
