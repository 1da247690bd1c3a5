//! Regression models.
//!
//! The selection engine talks to the penalized least-squares primitive only
//! through two traits:
//!
//! - [`Regressor`]: the unfitted solver, `fit(features, targets, penalty) -> Model`.
//! - [`Predictor`]: the fitted model, `predict(features) -> targets`, plus
//!   parameter extraction for persistence.
//!
//! [`RidgeRegression`] is the shipped implementation; [`NormalizedRegressor`]
//! composes polynomial expansion, target normalization and any `Regressor`.

use std::path::Path;

use ndarray::{Array1, Array2};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::serialization::{load_params, save_params};

pub mod normalized;
pub mod ridge;

pub use normalized::{NormalizedRegressor, NormalizedRegressorParams};
pub use ridge::{FittedRidge, RidgeParams, RidgeRegression};

/// Unfitted penalized least-squares solver.
pub trait Regressor {
    /// The fitted model returned by [`Regressor::fit`].
    type Model: Predictor;

    /// Fit `targets ≈ features · w + b` with regularization strength `penalty`.
    ///
    /// `penalty` is handed to the solver as-is; callers that think in terms of
    /// a penalty scale `p` pass `p²`.
    fn fit(&self, features: &Array2<f64>, targets: &Array1<f64>, penalty: f64)
        -> Result<Self::Model>;
}

/// Fitted model ready for inference.
pub trait Predictor {
    /// Plain-data representation of the learned parameters.
    type Params: Serialize + DeserializeOwned;

    /// Predict one target per row of `features`.
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>>;

    /// Number of feature columns the model was trained on.
    fn n_features_in(&self) -> usize;

    fn extract_params(&self) -> Self::Params;

    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_params(&self.extract_params(), path)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        let params: Self::Params = load_params(path)?;
        Self::from_params(params)
    }
}
