//! Closed-form ridge regression.
//!
//! Minimizes `||y - X w - b||² + alpha ||w||²`. The intercept `b` is not
//! penalized: features and targets are centered, the ridge problem on the
//! centered design `Xc` is solved through its SVD, and `b = ȳ - x̄ · w`
//! afterwards. A constant column (such as a polynomial bias term) centers to
//! zero and therefore always receives a zero weight.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{RegressionError, Result};
use crate::linalg::solve_ridge;
use crate::model::{Predictor, Regressor};

/// Ridge solver configuration (the unfitted model).
#[derive(Clone, Debug)]
pub struct RidgeRegression {
    fit_intercept: bool,
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl RidgeRegression {
    /// Ridge with an unpenalized intercept.
    pub fn new() -> Self {
        Self {
            fit_intercept: true,
        }
    }

    /// When `false` the data is not centered and the intercept stays 0.
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }
}

/// Learned weights and intercept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RidgeParams {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// Fitted ridge model: `y = X · w + b`.
#[derive(Clone, Debug)]
pub struct FittedRidge {
    weights: Array1<f64>,
    intercept: f64,
}

impl FittedRidge {
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for RidgeRegression {
    type Model = FittedRidge;

    fn fit(&self, features: &Array2<f64>, targets: &Array1<f64>, alpha: f64) -> Result<FittedRidge> {
        let (rows, cols) = features.dim();

        if rows != targets.len() {
            return Err(RegressionError::InvalidShape {
                expected: format!("{} targets", rows),
                got: format!("{} targets", targets.len()),
            });
        }
        if rows == 0 {
            return Err(RegressionError::EmptyData(
                "Cannot fit ridge regression on empty data".to_string(),
            ));
        }
        if !(alpha.is_finite() && alpha >= 0.0) {
            return Err(RegressionError::InvalidParameter(format!(
                "Ridge penalty must be finite and non-negative, got {}",
                alpha
            )));
        }

        let (x_mean, y_mean) = if self.fit_intercept {
            let x_mean = features
                .mean_axis(Axis(0))
                .unwrap_or_else(|| Array1::zeros(cols));
            let y_mean = targets.mean().unwrap_or(0.0);
            (x_mean, y_mean)
        } else {
            (Array1::zeros(cols), 0.0)
        };

        let xc = features - &x_mean;
        let yc = targets - y_mean;

        let weights = solve_ridge(&xc, &yc, alpha).ok_or_else(|| {
            RegressionError::NumericalError(format!(
                "Ridge system could not be solved ({} features, alpha = {})",
                cols, alpha
            ))
        })?;
        let intercept = y_mean - x_mean.dot(&weights);

        Ok(FittedRidge { weights, intercept })
    }
}

impl Predictor for FittedRidge {
    type Params = RidgeParams;

    fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        if features.ncols() != self.weights.len() {
            return Err(RegressionError::FeatureMismatch {
                expected_features: self.weights.len(),
                got_features: features.ncols(),
            });
        }
        Ok(features.dot(&self.weights) + self.intercept)
    }

    fn n_features_in(&self) -> usize {
        self.weights.len()
    }

    fn extract_params(&self) -> RidgeParams {
        RidgeParams {
            weights: self.weights.to_vec(),
            intercept: self.intercept,
        }
    }

    fn from_params(params: RidgeParams) -> Result<Self> {
        Ok(FittedRidge {
            weights: Array1::from(params.weights),
            intercept: params.intercept,
        })
    }
}
