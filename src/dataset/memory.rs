use ndarray::{Array1, Array2, Axis};

use crate::error::{RegressionError, Result};

/// Owned, validated `(x, y)` pair kept in memory.
///
/// Rows keep their insertion order; resampling works on index lists so the
/// original order is what seeded permutations are applied to.
#[derive(Clone, Debug)]
pub struct InMemoryDataset {
    x: Array2<f64>,
    y: Array1<f64>,
}

impl InMemoryDataset {
    /// Builds a dataset from row vectors.
    pub fn new(x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self> {
        if x.is_empty() {
            return Err(RegressionError::EmptyData(
                "Dataset needs at least one row".to_string(),
            ));
        }
        let n_features = x[0].len();
        if let Some(row) = x.iter().find(|row| row.len() != n_features) {
            return Err(RegressionError::FeatureMismatch {
                expected_features: n_features,
                got_features: row.len(),
            });
        }
        let rows = x.len();
        let data: Vec<f64> = x.into_iter().flatten().collect();
        let x = Array2::from_shape_vec((rows, n_features), data).map_err(|e| {
            RegressionError::InvalidShape {
                expected: format!("({}, {})", rows, n_features),
                got: e.to_string(),
            }
        })?;
        Self::from_arrays(x, Array1::from(y))
    }

    /// Builds a dataset from an `(n_samples, n_features)` matrix and a target vector.
    pub fn from_arrays(x: Array2<f64>, y: Array1<f64>) -> Result<Self> {
        let (rows, cols) = x.dim();
        if rows != y.len() {
            return Err(RegressionError::InvalidShape {
                expected: format!("{} targets", rows),
                got: format!("{} targets", y.len()),
            });
        }
        if rows == 0 {
            return Err(RegressionError::EmptyData(
                "Dataset needs at least one row".to_string(),
            ));
        }
        if cols == 0 {
            return Err(RegressionError::InvalidShape {
                expected: "at least one feature column".to_string(),
                got: "0 columns".to_string(),
            });
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(RegressionError::NumericalError(
                "Dataset contains NaN or infinite values".to_string(),
            ));
        }
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn targets(&self) -> &Array1<f64> {
        &self.y
    }

    /// Copies the rows at `indices`, in that order, into a new dataset.
    ///
    /// # Panics
    /// If any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> InMemoryDataset {
        InMemoryDataset {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_from_rows() {
        let ds = InMemoryDataset::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]], vec![5.0, 6.0])
            .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.features()[[1, 0]], 3.0);
        assert_eq!(ds.targets()[1], 6.0);
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = InMemoryDataset::new(vec![vec![1.0], vec![2.0]], vec![1.0]).unwrap_err();
        assert!(matches!(err, RegressionError::InvalidShape { .. }));
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let err =
            InMemoryDataset::new(vec![vec![1.0, 2.0], vec![3.0]], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            RegressionError::FeatureMismatch {
                expected_features: 2,
                got_features: 1
            }
        ));
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = InMemoryDataset::new(vec![], vec![]).unwrap_err();
        assert!(matches!(err, RegressionError::EmptyData(_)));
    }

    #[test]
    fn test_from_arrays_rejects_nan() {
        let err = InMemoryDataset::from_arrays(array![[1.0], [f64::NAN]], array![1.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, RegressionError::NumericalError(_)));
    }

    #[test]
    fn test_from_arrays_rejects_zero_columns() {
        let x = Array2::<f64>::zeros((3, 0));
        let err = InMemoryDataset::from_arrays(x, array![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, RegressionError::InvalidShape { .. }));
    }

    #[test]
    fn test_select_reorders_rows_and_targets_together() {
        let ds = InMemoryDataset::from_arrays(array![[0.0], [1.0], [2.0]], array![10.0, 11.0, 12.0])
            .unwrap();
        let picked = ds.select(&[2, 0]);
        assert_eq!(picked.features(), &array![[2.0], [0.0]]);
        assert_eq!(picked.targets(), &array![12.0, 10.0]);
    }
}
