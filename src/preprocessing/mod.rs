//! Data preprocessing transformers.
//!
//! Transformers follow a two-state pattern: an unfitted [`Transformer`] holds
//! hyperparameters and learns from data, returning a [`FittedTransformer`]
//! that can transform new data and be persisted.
//!
//! # Available Transformers
//!
//! - [`PolynomialFeatures`]: expands feature rows into polynomial terms
//!   (bias column included by default).
//! - [`TargetScaler`]: z-score normalization of the regression target.

pub mod polynomial;
pub mod target;
pub mod traits;

pub use polynomial::{FittedPolynomialFeatures, PolynomialFeatures, PolynomialFeaturesParams};
pub use target::{FittedTargetScaler, TargetScaler, TargetScalerParams};
pub use traits::{FittedTransformer, Transformer};
