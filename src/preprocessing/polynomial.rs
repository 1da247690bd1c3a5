//! Polynomial expansion of feature rows.
//!
//! Each output column is a monomial, stored as the list of input indices
//! whose values are multiplied together. Lists are non-decreasing, so every
//! monomial appears once: for two inputs `[a, b]` and degree 2 the columns are
//! `[1, a, b, a², ab, b²]`. The leading constant column is kept by default;
//! ridge regression centers it to zero, so it never affects the fit.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{RegressionError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Unfitted polynomial expansion.
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use polyridge::preprocessing::{FittedTransformer, PolynomialFeatures, Transformer};
///
/// let x = array![[2.0], [3.0]];
/// let cubic = PolynomialFeatures::new().with_degree(3).fit(&x).unwrap();
///
/// assert_eq!(cubic.transform(&x).unwrap().row(1).to_vec(), vec![1.0, 3.0, 9.0, 27.0]);
/// ```
#[derive(Clone, Debug)]
pub struct PolynomialFeatures {
    degree: usize,
    include_bias: bool,
}

impl Default for PolynomialFeatures {
    fn default() -> Self {
        Self::new()
    }
}

impl PolynomialFeatures {
    /// Degree 2 with a constant column.
    pub fn new() -> Self {
        Self {
            degree: 2,
            include_bias: true,
        }
    }

    /// Highest total power of any output monomial.
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    pub fn with_include_bias(mut self, include_bias: bool) -> Self {
        self.include_bias = include_bias;
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolynomialFeaturesParams {
    pub degree: usize,
    pub include_bias: bool,
    pub n_features_in: usize,
    /// One index list per output column: `[]` is the constant,
    /// `[0, 0]` squares the first input, `[0, 1]` multiplies the first two.
    pub output_combinations: Vec<Vec<usize>>,
}

/// Expansion bound to a fixed number of input columns.
#[derive(Clone, Debug)]
pub struct FittedPolynomialFeatures {
    degree: usize,
    include_bias: bool,
    n_features_in: usize,
    output_combinations: Vec<Vec<usize>>,
}

impl FittedPolynomialFeatures {
    pub fn n_features_out(&self) -> usize {
        self.output_combinations.len()
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn output_combinations(&self) -> &[Vec<usize>] {
        &self.output_combinations
    }
}

impl Transformer for PolynomialFeatures {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = PolynomialFeaturesParams;
    type Fitted = FittedPolynomialFeatures;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        let (rows, cols) = data.dim();

        if rows == 0 {
            return Err(RegressionError::EmptyData(
                "Cannot fit PolynomialFeatures on empty data".to_string(),
            ));
        }
        if cols == 0 {
            return Err(RegressionError::InvalidParameter(
                "Cannot fit PolynomialFeatures on data with no features".to_string(),
            ));
        }
        if self.degree == 0 {
            return Err(RegressionError::InvalidParameter(
                "Polynomial degree must be at least 1".to_string(),
            ));
        }

        Ok(FittedPolynomialFeatures {
            degree: self.degree,
            include_bias: self.include_bias,
            n_features_in: cols,
            output_combinations: monomials(cols, self.degree, self.include_bias),
        })
    }
}

impl FittedTransformer for FittedPolynomialFeatures {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = PolynomialFeaturesParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let (rows, cols) = data.dim();

        if cols != self.n_features_in {
            return Err(RegressionError::FeatureMismatch {
                expected_features: self.n_features_in,
                got_features: cols,
            });
        }

        let mut result = Array2::zeros((rows, self.n_features_out()));
        for (row, mut out) in data.outer_iter().zip(result.outer_iter_mut()) {
            for (slot, indices) in out.iter_mut().zip(&self.output_combinations) {
                *slot = indices.iter().map(|&idx| row[idx]).product();
            }
        }
        Ok(result)
    }

    fn inverse_transform(&self, _data: &Self::Output) -> Result<Self::Input> {
        Err(RegressionError::InvalidParameter(
            "PolynomialFeatures does not support inverse_transform".to_string(),
        ))
    }

    fn extract_params(&self) -> Self::Params {
        PolynomialFeaturesParams {
            degree: self.degree,
            include_bias: self.include_bias,
            n_features_in: self.n_features_in,
            output_combinations: self.output_combinations.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        if params
            .output_combinations
            .iter()
            .flatten()
            .any(|&idx| idx >= params.n_features_in)
        {
            return Err(RegressionError::InvalidParameter(format!(
                "Polynomial term references a feature outside 0..{}",
                params.n_features_in
            )));
        }
        Ok(FittedPolynomialFeatures {
            degree: params.degree,
            include_bias: params.include_bias,
            n_features_in: params.n_features_in,
            output_combinations: params.output_combinations,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }
}

/// Monomials ordered by total degree, then lexicographically.
fn monomials(n_inputs: usize, degree: usize, include_bias: bool) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if include_bias {
        out.push(Vec::new());
    }
    for power in 1..=degree {
        push_monomials(n_inputs, power, 0, &mut Vec::new(), &mut out);
    }
    out
}

fn push_monomials(
    n_inputs: usize,
    remaining: usize,
    first: usize,
    prefix: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if remaining == 0 {
        out.push(prefix.clone());
        return;
    }
    for idx in first..n_inputs {
        prefix.push(idx);
        push_monomials(n_inputs, remaining - 1, idx, prefix, out);
        prefix.pop();
    }
}
