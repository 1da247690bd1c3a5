//! Polynomial ridge fit on z-scored targets.
//!
//! [`NormalizedRegressor`] chains three fitted pieces, all created in one
//! call to [`NormalizedRegressor::fit`] and immutable afterwards:
//!
//! 1. a [`FittedTargetScaler`] holding the mean and population std of `y`,
//! 2. a [`FittedPolynomialFeatures`] expansion (bias column included),
//! 3. the fitted model of any [`Regressor`], trained on `(y - mean) / std`
//!    with strength `penalty²`.
//!
//! Predictions are mapped back to the original target scale.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{RegressionError, Result};
use crate::model::{Predictor, Regressor};
use crate::preprocessing::{
    FittedPolynomialFeatures, FittedTargetScaler, FittedTransformer, PolynomialFeatures,
    PolynomialFeaturesParams, TargetScaler, TargetScalerParams, Transformer,
};

/// Scale-invariant polynomial regression.
#[derive(Clone, Debug)]
pub struct NormalizedRegressor<M> {
    poly: FittedPolynomialFeatures,
    scaler: FittedTargetScaler,
    model: M,
    effective_penalty: f64,
}

/// Serializable parameters of a [`NormalizedRegressor`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NormalizedRegressorParams<P> {
    pub poly: PolynomialFeaturesParams,
    pub scaler: TargetScalerParams,
    pub model: P,
    pub effective_penalty: f64,
}

impl<M: Predictor> NormalizedRegressor<M> {
    /// Fit `regressor` on polynomial features of `x` against normalized `y`.
    ///
    /// When `normalize_penalty` is set, `penalty` is divided by the target
    /// std before being squared, so it is expressed in units of `y`.
    ///
    /// # Errors
    /// - [`RegressionError::InvalidShape`] if `x` and `y` disagree on row count.
    /// - [`RegressionError::DegenerateData`] if `y` is constant.
    /// - [`RegressionError::InvalidParameter`] for a negative or non-finite
    ///   penalty or a zero degree.
    pub fn fit<R>(
        regressor: &R,
        x: &Array2<f64>,
        y: &Array1<f64>,
        penalty: f64,
        degree: usize,
        normalize_penalty: bool,
    ) -> Result<Self>
    where
        R: Regressor<Model = M>,
    {
        if x.nrows() != y.len() {
            return Err(RegressionError::InvalidShape {
                expected: format!("{} targets", x.nrows()),
                got: format!("{} targets", y.len()),
            });
        }
        if !(penalty.is_finite() && penalty >= 0.0) {
            return Err(RegressionError::InvalidParameter(format!(
                "Penalty must be finite and non-negative, got {}",
                penalty
            )));
        }

        let scaler = TargetScaler::new().fit(y)?;
        let effective_penalty = if normalize_penalty {
            scaler.normalize_penalty(penalty)
        } else {
            penalty
        };

        let poly = PolynomialFeatures::new().with_degree(degree).fit(x)?;
        let expanded = poly.transform(x)?;
        let normalized = scaler.transform(y)?;

        let model = regressor.fit(&expanded, &normalized, effective_penalty * effective_penalty)?;

        Ok(Self {
            poly,
            scaler,
            model,
            effective_penalty,
        })
    }

    pub fn mean(&self) -> f64 {
        self.scaler.mean()
    }

    pub fn std(&self) -> f64 {
        self.scaler.std()
    }

    pub fn degree(&self) -> usize {
        self.poly.degree()
    }

    /// Penalty actually handed to the solver (before squaring).
    pub fn effective_penalty(&self) -> f64 {
        self.effective_penalty
    }

    pub fn scaler(&self) -> &FittedTargetScaler {
        &self.scaler
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: Predictor> Predictor for NormalizedRegressor<M> {
    type Params = NormalizedRegressorParams<M::Params>;

    fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        let expanded = self.poly.transform(features)?;
        let normalized = self.model.predict(&expanded)?;
        self.scaler.inverse_transform(&normalized)
    }

    fn n_features_in(&self) -> usize {
        FittedTransformer::n_features_in(&self.poly)
    }

    fn extract_params(&self) -> Self::Params {
        NormalizedRegressorParams {
            poly: self.poly.extract_params(),
            scaler: self.scaler.extract_params(),
            model: self.model.extract_params(),
            effective_penalty: self.effective_penalty,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        let poly = FittedPolynomialFeatures::from_params(params.poly)?;
        let model = M::from_params(params.model)?;
        if model.n_features_in() != poly.n_features_out() {
            return Err(RegressionError::FeatureMismatch {
                expected_features: poly.n_features_out(),
                got_features: model.n_features_in(),
            });
        }
        Ok(Self {
            poly,
            scaler: FittedTargetScaler::from_params(params.scaler)?,
            model,
            effective_penalty: params.effective_penalty,
        })
    }
}
