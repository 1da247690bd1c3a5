//! Z-score normalization of regression targets.
//!
//! The standard score of a target `y` is
//! ```text
//! z = (y - u) / s
//! ```
//! where `u` is the mean and `s` the population standard deviation of the
//! training targets. Unlike a feature scaler, a target scaler cannot fall
//! back to `s = 1` for constant data: a constant target vector is rejected
//! with [`RegressionError::DegenerateData`].
//!
//! The fitted scaler also converts penalties between the raw and the
//! normalized target scale, so a ridge penalty can be expressed in the units
//! of `y` regardless of its magnitude.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{RegressionError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// TargetScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct TargetScaler;

impl TargetScaler {
    pub fn new() -> Self {
        Self
    }
}

/// Serializable parameters for a fitted TargetScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetScalerParams {
    pub mean: f64,
    pub std: f64,
}

/// Fitted TargetScaler holding the training mean and standard deviation.
#[derive(Clone, Debug)]
pub struct FittedTargetScaler {
    mean: f64,
    std: f64,
}

impl FittedTargetScaler {
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }

    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }

    pub fn denormalize(&self, normalized: f64) -> f64 {
        normalized * self.std + self.mean
    }

    /// Expresses a raw-scale penalty on the normalized target scale.
    pub fn normalize_penalty(&self, penalty: f64) -> f64 {
        penalty / self.std
    }

    pub fn denormalize_penalty(&self, normalized_penalty: f64) -> f64 {
        normalized_penalty * self.std
    }
}

impl Transformer for TargetScaler {
    type Input = Array1<f64>;
    type Output = Array1<f64>;
    type Params = TargetScalerParams;
    type Fitted = FittedTargetScaler;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        let mean = data.mean().ok_or_else(|| {
            RegressionError::EmptyData("Cannot fit TargetScaler on empty targets".to_string())
        })?;
        // population std (ddof=0)
        let std = data.std(0.0);

        if !std.is_finite() {
            return Err(RegressionError::NumericalError(
                "Target standard deviation is not finite".to_string(),
            ));
        }
        if std == 0.0 {
            return Err(RegressionError::DegenerateData(format!(
                "targets have zero variance (all {} values equal {})",
                data.len(),
                mean
            )));
        }

        Ok(FittedTargetScaler { mean, std })
    }
}

impl FittedTransformer for FittedTargetScaler {
    type Input = Array1<f64>;
    type Output = Array1<f64>;
    type Params = TargetScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        Ok(data.mapv(|v| self.normalize(v)))
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input> {
        Ok(data.mapv(|v| self.denormalize(v)))
    }

    fn extract_params(&self) -> Self::Params {
        TargetScalerParams {
            mean: self.mean,
            std: self.std,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        if !(params.std.is_finite() && params.std > 0.0) || !params.mean.is_finite() {
            return Err(RegressionError::InvalidParameter(format!(
                "TargetScaler needs a finite mean and a positive std, got mean={} std={}",
                params.mean, params.std
            )));
        }
        Ok(FittedTargetScaler {
            mean: params.mean,
            std: params.std,
        })
    }

    fn n_features_in(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_fit_population_statistics() {
        let fitted = TargetScaler::new().fit(&array![1.0, 3.0, 5.0, 7.0]).unwrap();
        assert_relative_eq!(fitted.mean(), 4.0);
        // sqrt(((9 + 1 + 1 + 9) / 4)) = sqrt(5)
        assert_relative_eq!(fitted.std(), 5.0_f64.sqrt());
    }

    #[test]
    fn test_transform_has_zero_mean_unit_std() {
        let y = array![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let z = TargetScaler::new().fit_transform(&y).unwrap();
        assert_abs_diff_eq!(z.mean().unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(z.std(0.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_targets_are_degenerate() {
        let err = TargetScaler::new().fit(&array![5.0, 5.0, 5.0]).unwrap_err();
        assert!(matches!(err, RegressionError::DegenerateData(_)));
    }

    #[test]
    fn test_single_target_is_degenerate() {
        let err = TargetScaler::new().fit(&array![1.5]).unwrap_err();
        assert!(matches!(err, RegressionError::DegenerateData(_)));
    }

    #[test]
    fn test_empty_targets() {
        let err = TargetScaler::new().fit(&Array1::zeros(0)).unwrap_err();
        assert!(matches!(err, RegressionError::EmptyData(_)));
    }

    #[test]
    fn test_penalty_scaling() {
        let fitted = TargetScaler::new().fit(&array![0.0, 4.0]).unwrap();
        // std = 2
        assert_relative_eq!(fitted.normalize_penalty(1.0), 0.5);
        assert_relative_eq!(fitted.denormalize_penalty(0.5), 1.0);
    }

    #[test]
    fn test_inverse_transform_roundtrip() {
        let y = array![-3.0, 0.5, 12.0, 7.25];
        let fitted = TargetScaler::new().fit(&y).unwrap();
        let back = fitted
            .inverse_transform(&fitted.transform(&y).unwrap())
            .unwrap();
        for (a, b) in y.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_from_params_rejects_zero_std() {
        let err = FittedTargetScaler::from_params(TargetScalerParams { mean: 1.0, std: 0.0 })
            .unwrap_err();
        assert!(matches!(err, RegressionError::InvalidParameter(_)));
    }

    proptest! {
        #[test]
        fn prop_normalize_roundtrip(
            mean in -1e6f64..1e6,
            std in 1e-3f64..1e6,
            v in -1e6f64..1e6,
        ) {
            let fitted = FittedTargetScaler::from_params(TargetScalerParams { mean, std }).unwrap();
            let back = fitted.denormalize(fitted.normalize(v));
            prop_assert!((back - v).abs() <= 1e-9 * v.abs().max(mean.abs()).max(1.0));
        }
    }
}
