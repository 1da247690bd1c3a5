//! Knobs for [`build_model`](crate::selection::build_model).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RegressionError, Result};
use crate::selection::{validate_grid, DEFAULT_DEGREES, DEFAULT_PENALTIES};

/// Grid and validation settings for a model search.
///
/// Defaults:
/// - `penalties`: [`DEFAULT_PENALTIES`]
/// - `degrees`: [`DEFAULT_DEGREES`]
/// - `validation_size`: 1 (leave-one-out partition validation)
/// - `bootstrap_size`: 0
/// - `bootstrap_runs`: 10
/// - `full_training`: false
/// - `normalize_penalty`: false
/// - `verbosity`: 0
///
/// Missing fields fall back to these defaults when loading JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub penalties: Vec<f64>,
    pub degrees: Vec<usize>,
    /// Fold size for partition validation; `0` switches to bootstrap validation.
    pub validation_size: usize,
    /// Training rows per bootstrap round (capped at a third of the data).
    pub bootstrap_size: usize,
    pub bootstrap_runs: usize,
    /// Retrain on all rows even after bootstrap validation.
    pub full_training: bool,
    /// Express penalties in units of the target instead of z-scores.
    pub normalize_penalty: bool,
    /// 0 silent, 1 summary, 3 per grid point, 4 per validation round.
    pub verbosity: u8,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            penalties: DEFAULT_PENALTIES.to_vec(),
            degrees: DEFAULT_DEGREES.to_vec(),
            validation_size: 1,
            bootstrap_size: 0,
            bootstrap_runs: 10,
            full_training: false,
            normalize_penalty: false,
            verbosity: 0,
        }
    }
}

impl SelectionConfig {
    pub fn penalties(mut self, penalties: Vec<f64>) -> Self {
        self.penalties = penalties;
        self
    }

    pub fn degrees(mut self, degrees: Vec<usize>) -> Self {
        self.degrees = degrees;
        self
    }

    pub fn validation_size(mut self, size: usize) -> Self {
        self.validation_size = size;
        self
    }

    pub fn bootstrap_size(mut self, size: usize) -> Self {
        self.bootstrap_size = size;
        self
    }

    pub fn bootstrap_runs(mut self, runs: usize) -> Self {
        self.bootstrap_runs = runs;
        self
    }

    pub fn full_training(mut self, full_training: bool) -> Self {
        self.full_training = full_training;
        self
    }

    pub fn normalize_penalty(mut self, normalize_penalty: bool) -> Self {
        self.normalize_penalty = normalize_penalty;
        self
    }

    pub fn verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Checks everything that does not depend on the dataset size.
    pub fn validate(&self) -> Result<()> {
        validate_grid(&self.penalties, &self.degrees)?;
        if self.validation_size == 0 && self.bootstrap_runs == 0 {
            return Err(RegressionError::InvalidParameter(
                "Bootstrap validation needs at least one round".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SelectionConfig::default();
        assert_eq!(config.penalties, DEFAULT_PENALTIES.to_vec());
        assert_eq!(config.degrees, vec![1, 2, 3, 4]);
        assert_eq!(config.validation_size, 1);
        assert_eq!(config.bootstrap_size, 0);
        assert_eq!(config.bootstrap_runs, 10);
        assert!(!config.full_training);
        assert!(!config.normalize_penalty);
        assert_eq!(config.verbosity, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SelectionConfig::default()
            .penalties(vec![0.1])
            .degrees(vec![2])
            .validation_size(0)
            .bootstrap_size(30)
            .bootstrap_runs(5)
            .full_training(true)
            .normalize_penalty(true)
            .verbosity(3);

        assert_eq!(config.penalties, vec![0.1]);
        assert_eq!(config.degrees, vec![2]);
        assert_eq!(config.validation_size, 0);
        assert_eq!(config.bootstrap_size, 30);
        assert_eq!(config.bootstrap_runs, 5);
        assert!(config.full_training);
        assert!(config.normalize_penalty);
        assert_eq!(config.verbosity, 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SelectionConfig::from_json_str(r#"{ "degrees": [1, 3], "verbosity": 1 }"#)
            .unwrap();
        assert_eq!(config.degrees, vec![1, 3]);
        assert_eq!(config.verbosity, 1);
        assert_eq!(config.penalties, DEFAULT_PENALTIES.to_vec());
        assert_eq!(config.bootstrap_runs, 10);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SelectionConfig::default()
            .validation_size(0)
            .bootstrap_size(12);
        let json = config.to_json_string().unwrap();
        assert_eq!(SelectionConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_json_file() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("selection.json");
        fs::write(&path, r#"{ "penalties": [0.5, 1.0] }"#)?;

        let config = SelectionConfig::from_json_file(&path)?;
        assert_eq!(config.penalties, vec![0.5, 1.0]);
        Ok(())
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let err = SelectionConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, RegressionError::Serialization(_)));
    }

    #[test]
    fn test_validate_rejects_bad_grids_and_runs() {
        assert!(SelectionConfig::default().degrees(vec![]).validate().is_err());
        assert!(SelectionConfig::default().penalties(vec![-1.0]).validate().is_err());
        assert!(SelectionConfig::default()
            .validation_size(0)
            .bootstrap_runs(0)
            .validate()
            .is_err());
        // Rounds are irrelevant for partition validation.
        assert!(SelectionConfig::default().bootstrap_runs(0).validate().is_ok());
    }
}
