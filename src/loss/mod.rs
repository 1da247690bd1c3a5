use ndarray::Array1;

use crate::error::{RegressionError, Result};

/// A validation metric comparing held-out predictions with observed targets.
///
/// Lower is better; model selection keeps the grid point with the smallest
/// average loss.
pub trait Loss {
    /// Computes the scalar loss over all rows.
    ///
    /// # Errors
    /// Returns [`RegressionError::InvalidShape`] when the lengths differ and
    /// [`RegressionError::EmptyData`] when there is nothing to score.
    fn loss(&self, prediction: &Array1<f64>, target: &Array1<f64>) -> Result<f64>;
}

/// Mean Squared Error (MSE) loss: `L = (1/n) * Σ(pred_i - target_i)^2`
pub struct MSELoss;

impl Loss for MSELoss {
    fn loss(&self, pred: &Array1<f64>, target: &Array1<f64>) -> Result<f64> {
        check_lengths(pred, target)?;
        let diff = pred - target;
        Ok(diff.dot(&diff) / diff.len() as f64)
    }
}

/// Mean Absolute Error (MAE) loss: `L = (1/n) * Σ|pred_i - target_i|`
pub struct MAELoss;

impl Loss for MAELoss {
    fn loss(&self, pred: &Array1<f64>, target: &Array1<f64>) -> Result<f64> {
        check_lengths(pred, target)?;
        Ok((pred - target).mapv(f64::abs).sum() / pred.len() as f64)
    }
}

fn check_lengths(pred: &Array1<f64>, target: &Array1<f64>) -> Result<()> {
    if pred.len() != target.len() {
        return Err(RegressionError::InvalidShape {
            expected: format!("{} predictions", target.len()),
            got: format!("{} predictions", pred.len()),
        });
    }
    if pred.is_empty() {
        return Err(RegressionError::EmptyData(
            "Cannot compute a loss over zero rows".to_string(),
        ));
    }
    Ok(())
}
