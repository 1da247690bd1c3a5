//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: the configurable, unfitted state; learns from data.
//! - [`FittedTransformer`]: the learned state; ready for inference and persistence.

use std::path::Path;

use crate::error::Result;
use crate::serialization::{load_params, save_params, SerializableParams};

/// Trait for unfitted transformers with hyperparameters.
///
/// # Type Parameters
/// - `Input`: data the transformer learns from and transforms.
/// - `Output`: transformed data.
/// - `Params`: serializable representation of learned parameters.
/// - `Fitted`: the corresponding fitted transformer type.
///
/// # Example
/// ```ignore
/// use polyridge::preprocessing::{PolynomialFeatures, Transformer, FittedTransformer};
///
/// let poly = PolynomialFeatures::new().with_degree(3);
/// let fitted = poly.fit(&x)?;
/// let expanded = fitted.transform(&x)?;
/// ```
pub trait Transformer: Clone {
    type Input;
    type Output;
    type Params: SerializableParams;
    /// Type produced by [`Transformer::fit`].
    type Fitted: FittedTransformer<Params = Self::Params, Input = Self::Input, Output = Self::Output>;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`crate::RegressionError`] if the data is empty or cannot be
    /// fitted (e.g. zero variance for a scaler).
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted>;

    /// `fit` followed by `transform` on the same data.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
pub trait FittedTransformer: Clone {
    type Input;
    type Output;
    /// Plain-data form of the learned state.
    type Params: SerializableParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;

    /// Undo `transform`. Transformers without an inverse return an error.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input>;

    fn extract_params(&self) -> Self::Params;

    /// Rebuild from [`FittedTransformer::extract_params`] output, validating it.
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

    /// Column count seen during fit.
    fn n_features_in(&self) -> usize;
}
