//! Query-only probabilistic predictor.
//!
//! A [`GaussianPredictor`] is what remains of a [`ModelSelector`] once the
//! search is over: the retrained regressor, the chosen grid point and the
//! residual spread. It owns its data and can be saved to disk.
//!
//! [`ModelSelector`]: crate::selection::ModelSelector

use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::distribution::GaussianResidual;
use crate::error::{RegressionError, Result};
use crate::model::{NormalizedRegressor, NormalizedRegressorParams, Predictor};
use crate::selection::TrialParams;
use crate::serialization::{load_params, save_params};

/// Point estimates plus a homoscedastic Gaussian spread.
#[derive(Clone, Debug)]
pub struct GaussianPredictor<M> {
    regressor: NormalizedRegressor<M>,
    params: TrialParams,
    residual_std: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GaussianPredictorParams<P> {
    pub regressor: NormalizedRegressorParams<P>,
    pub params: TrialParams,
    pub residual_std: f64,
}

impl<M: Predictor> GaussianPredictor<M> {
    /// # Errors
    /// [`RegressionError::InvalidParameter`] for a negative or non-finite spread.
    pub fn new(regressor: NormalizedRegressor<M>, params: TrialParams, residual_std: f64) -> Result<Self> {
        if !(residual_std.is_finite() && residual_std >= 0.0) {
            return Err(RegressionError::InvalidParameter(format!(
                "Residual std must be finite and non-negative, got {}",
                residual_std
            )));
        }
        Ok(Self {
            regressor,
            params,
            residual_std,
        })
    }

    pub fn regressor(&self) -> &NormalizedRegressor<M> {
        &self.regressor
    }

    pub fn into_regressor(self) -> NormalizedRegressor<M> {
        self.regressor
    }

    pub fn params(&self) -> TrialParams {
        self.params
    }

    pub fn penalty(&self) -> f64 {
        self.params.penalty
    }

    pub fn degree(&self) -> usize {
        self.params.degree
    }

    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    /// `(point_estimate, std_estimate)` per row; the std is constant.
    pub fn predict(&self, x: &Array2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
        let mean = self.regressor.predict(x)?;
        let std = Array1::from_elem(mean.len(), self.residual_std);
        Ok((mean, std))
    }

    pub fn predict_datum(&self, x: &[f64]) -> Result<(f64, f64)> {
        let (mean, std) = self.predict(&single_row(x)?)?;
        Ok((mean[0], std[0]))
    }

    /// `P(Y <= y)` under `N(prediction, residual_std²)`, per row.
    ///
    /// # Errors
    /// [`RegressionError::DegenerateData`] when the residual spread is zero.
    pub fn tail_probability(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Array1<f64>> {
        let residual = GaussianResidual::new(self.residual_std)?;
        residual.tail_probabilities(&self.regressor.predict(x)?, y)
    }

    pub fn tail_probability_datum(&self, x: &[f64], y: f64) -> Result<f64> {
        let residual = GaussianResidual::new(self.residual_std)?;
        let mean = self.regressor.predict(&single_row(x)?)?;
        Ok(residual.tail_probability(mean[0], y))
    }

    /// Natural log of the predictive density at `y`, per row.
    ///
    /// # Errors
    /// [`RegressionError::DegenerateData`] when the residual spread is zero.
    pub fn log_density(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Array1<f64>> {
        let residual = GaussianResidual::new(self.residual_std)?;
        residual.log_densities(&self.regressor.predict(x)?, y)
    }

    pub fn log_density_datum(&self, x: &[f64], y: f64) -> Result<f64> {
        let residual = GaussianResidual::new(self.residual_std)?;
        let mean = self.regressor.predict(&single_row(x)?)?;
        Ok(residual.log_density(mean[0], y))
    }

    pub fn extract_params(&self) -> GaussianPredictorParams<M::Params> {
        GaussianPredictorParams {
            regressor: self.regressor.extract_params(),
            params: self.params,
            residual_std: self.residual_std,
        }
    }

    pub fn from_params(params: GaussianPredictorParams<M::Params>) -> Result<Self> {
        let regressor = NormalizedRegressor::from_params(params.regressor)?;
        Self::new(regressor, params.params, params.residual_std)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_params(&self.extract_params(), path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let params: GaussianPredictorParams<M::Params> = load_params(path)?;
        Self::from_params(params)
    }
}

/// One feature row as a `1 x d` matrix.
pub(crate) fn single_row(x: &[f64]) -> Result<Array2<f64>> {
    Array2::from_shape_vec((1, x.len()), x.to_vec()).map_err(|e| RegressionError::InvalidShape {
        expected: "a single feature row".to_string(),
        got: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FittedRidge, RidgeRegression};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn predictor(residual_std: f64) -> GaussianPredictor<FittedRidge> {
        let x = Array2::from_shape_fn((6, 1), |(i, _)| i as f64);
        let y = x.column(0).mapv(|v| 0.5 * v - 1.0);
        let regressor =
            NormalizedRegressor::fit(&RidgeRegression::new(), &x, &y, 0.0, 1, false).unwrap();
        GaussianPredictor::new(regressor, TrialParams::new(0.0, 1), residual_std).unwrap()
    }

    #[test]
    fn test_predict_returns_constant_std() {
        let p = predictor(0.25);
        let (mean, std) = p.predict(&array![[0.0], [4.0]]).unwrap();
        assert_abs_diff_eq!(mean[0], -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mean[1], 1.0, epsilon = 1e-9);
        assert_eq!(std, array![0.25, 0.25]);
    }

    #[test]
    fn test_datum_queries_match_batch_queries() {
        let p = predictor(0.5);
        let batch = p.tail_probability(&array![[2.0]], &array![0.3]).unwrap();
        assert_eq!(p.tail_probability_datum(&[2.0], 0.3).unwrap(), batch[0]);

        let batch = p.log_density(&array![[2.0]], &array![0.3]).unwrap();
        assert_eq!(p.log_density_datum(&[2.0], 0.3).unwrap(), batch[0]);
    }

    #[test]
    fn test_tail_probability_at_prediction_is_half() {
        let p = predictor(1.0);
        let (mean, _) = p.predict_datum(&[3.0]).unwrap();
        assert_abs_diff_eq!(p.tail_probability_datum(&[3.0], mean).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_spread_is_degenerate_for_probabilistic_queries() {
        let p = predictor(0.0);
        assert!(p.predict_datum(&[1.0]).is_ok());
        assert!(matches!(
            p.tail_probability_datum(&[1.0], 0.0),
            Err(RegressionError::DegenerateData(_))
        ));
        assert!(matches!(
            p.log_density(&array![[1.0]], &array![0.0]),
            Err(RegressionError::DegenerateData(_))
        ));
    }

    #[test]
    fn test_rejects_negative_spread() {
        let regressor = predictor(1.0).regressor().clone();
        let err = GaussianPredictor::new(regressor, TrialParams::new(0.0, 1), -1.0).unwrap_err();
        assert!(matches!(err, RegressionError::InvalidParameter(_)));
    }

    #[test]
    fn test_save_load_roundtrip() -> Result<()> {
        let p = predictor(0.3);
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("predictor.bin");
        p.save_to_file(&path)?;

        let loaded = GaussianPredictor::<FittedRidge>::load_from_file(&path)?;
        let x = array![[0.5], [9.0]];
        assert_eq!(loaded.predict(&x)?, p.predict(&x)?);
        assert_eq!(loaded.params(), p.params());
        assert_eq!(loaded.residual_std(), 0.3);
        Ok(())
    }
}
