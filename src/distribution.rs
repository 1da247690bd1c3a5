//! Gaussian residual model.
//!
//! Every prediction `m` is treated as the mean of `N(m, s²)` with a single,
//! homoscedastic spread `s` estimated from training residuals.

use std::f64::consts::{PI, SQRT_2};

use ndarray::{Array1, Zip};
use statrs::function::erf::erf;

use crate::error::{RegressionError, Result};

/// Normal distribution of residuals around a point estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianResidual {
    std: f64,
}

impl GaussianResidual {
    /// # Errors
    /// [`RegressionError::DegenerateData`] when `std` is zero and
    /// [`RegressionError::InvalidParameter`] when it is negative or not finite.
    pub fn new(std: f64) -> Result<Self> {
        if !std.is_finite() || std < 0.0 {
            return Err(RegressionError::InvalidParameter(format!(
                "Residual std must be finite and non-negative, got {}",
                std
            )));
        }
        if std == 0.0 {
            return Err(RegressionError::DegenerateData(
                "residual std is zero; the predictive distribution is a point mass".to_string(),
            ));
        }
        Ok(Self { std })
    }

    pub fn std(&self) -> f64 {
        self.std
    }

    fn span(&self, mean: f64, observed: f64) -> f64 {
        (observed - mean) / self.std
    }

    /// `P(Y <= observed)` for `Y ~ N(mean, std²)`.
    pub fn tail_probability(&self, mean: f64, observed: f64) -> f64 {
        let span = self.span(mean, observed);
        (1.0 - erf(-span / SQRT_2)) / 2.0
    }

    /// Natural log of the normal density at `observed`.
    pub fn log_density(&self, mean: f64, observed: f64) -> f64 {
        let span = self.span(mean, observed);
        -(self.std * (2.0 * PI).sqrt()).ln() - span * span / 2.0
    }

    pub fn tail_probabilities(&self, means: &Array1<f64>, observed: &Array1<f64>) -> Result<Array1<f64>> {
        check_lengths(means, observed)?;
        Ok(Zip::from(means)
            .and(observed)
            .map_collect(|&m, &y| self.tail_probability(m, y)))
    }

    pub fn log_densities(&self, means: &Array1<f64>, observed: &Array1<f64>) -> Result<Array1<f64>> {
        check_lengths(means, observed)?;
        Ok(Zip::from(means)
            .and(observed)
            .map_collect(|&m, &y| self.log_density(m, y)))
    }
}

fn check_lengths(means: &Array1<f64>, observed: &Array1<f64>) -> Result<()> {
    if means.len() != observed.len() {
        return Err(RegressionError::InvalidShape {
            expected: format!("{} observed targets", means.len()),
            got: format!("{} observed targets", observed.len()),
        });
    }
    Ok(())
}
