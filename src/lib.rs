//! # polyridge
//!
//! Polynomial ridge regression with automatic hyperparameter selection and a
//! Gaussian predictive distribution.
//!
//! ## Core Design Principles
//!
//! - **Scale invariance**: targets are z-scored before fitting and predictions
//!   mapped back, so one penalty grid works for targets of any magnitude.
//! - **Fit/inference separation**: unfitted components hold hyperparameters;
//!   fitting returns a distinct fitted type that only predicts and persists.
//! - **Reproducibility**: every resampling round is driven by an explicit
//!   `u64` seed; two searches over the same data give identical results.
//! - **Pluggable solver**: the search talks to the least-squares solver only
//!   through [`model::Regressor`] and [`model::Predictor`].
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::{Array1, Array2};
//! use polyridge::selection::{build_model, SelectionConfig};
//!
//! // y = x² - 2x with a little deterministic noise
//! let x = Array2::from_shape_fn((30, 1), |(i, _)| i as f64 / 3.0);
//! let y = Array1::from_shape_fn(30, |i| {
//!     let v = i as f64 / 3.0;
//!     v * v - 2.0 * v + 0.05 * ((i % 5) as f64 - 2.0)
//! });
//!
//! let selector = build_model(x, y, &SelectionConfig::default()).unwrap();
//!
//! let (estimate, std) = selector.predict_datum(&[4.0]).unwrap();
//! let p = selector.tail_probability_datum(&[4.0], estimate + std).unwrap();
//! assert!((p - 0.8413).abs() < 1e-3);
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: validated in-memory `(X, y)` storage and seeded permutations
//! - `preprocessing`: polynomial expansion and target normalization
//! - `model`: the solver traits, closed-form ridge and the normalized regressor
//! - `loss`: validation metrics (MSE, MAE)
//! - `selection`: grid search, retraining and calibration
//! - `distribution`: Gaussian tail probability and log-density
//! - `predictor`: owned, serializable probabilistic predictor
//! - `serialization`: parameter persistence

/// Data storage and seeded resampling.
pub mod dataset;

/// Gaussian residual model.
pub mod distribution;

pub mod error;

mod linalg;

/// Validation metrics.
pub mod loss;

/// Regression models with separate fitted types.
pub mod model;

pub mod predictor;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Hyperparameter selection.
pub mod selection;

/// Model persistence utilities.
pub mod serialization;

pub use error::{RegressionError, Result};
pub use model::{NormalizedRegressor, Predictor, Regressor, RidgeRegression};
pub use predictor::GaussianPredictor;
pub use selection::{build_model, build_model_with, ModelSelector, SelectionConfig, TrialParams};
