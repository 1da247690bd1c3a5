//! Error types for fitting, model selection and probabilistic queries.

use thiserror::Error;

/// Error type shared by every fallible operation in the crate.
#[derive(Debug, Error)]
pub enum RegressionError {
    /// Targets (or residuals) have zero spread, so normalization is undefined.
    #[error("Degenerate data: {0}")]
    DegenerateData(String),

    /// The dataset is too small for the requested fold or bootstrap size.
    #[error("Insufficient data: {context} needs at least {required} rows, got {available}")]
    InsufficientData {
        context: String,
        required: usize,
        available: usize,
    },

    /// An operation was invoked before the state it depends on exists.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// Shape mismatch between expected and actual dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape { expected: String, got: String },

    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Feature dimension mismatch between training and inference.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },

    /// Invalid hyperparameter or configuration value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Non-finite input or a solver failure.
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegressionError {
    pub(crate) fn insufficient(context: impl Into<String>, required: usize, available: usize) -> Self {
        RegressionError::InsufficientData {
            context: context.into(),
            required,
            available,
        }
    }
}

impl From<bincode::Error> for RegressionError {
    fn from(err: bincode::Error) -> Self {
        RegressionError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for RegressionError {
    fn from(err: serde_json::Error) -> Self {
        RegressionError::Serialization(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RegressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_degenerate_data() {
        let err = RegressionError::DegenerateData("constant targets".to_string());
        assert_eq!(err.to_string(), "Degenerate data: constant targets");
    }

    #[test]
    fn test_error_display_insufficient_data() {
        let err = RegressionError::insufficient("partition validation", 3, 2);
        assert_eq!(
            err.to_string(),
            "Insufficient data: partition validation needs at least 3 rows, got 2"
        );
    }

    #[test]
    fn test_error_display_precondition() {
        let err = RegressionError::PreconditionViolation("predict before retrain".to_string());
        assert!(err.to_string().contains("Precondition violated"));
    }

    #[test]
    fn test_error_display_feature_mismatch() {
        let err = RegressionError::FeatureMismatch {
            expected_features: 5,
            got_features: 3,
        };
        assert!(err.to_string().contains("expected 5 features, got 3"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: RegressionError = io_err.into();
        assert!(matches!(err, RegressionError::Io(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: std::result::Result<String, bincode::Error> =
            bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: RegressionError = e.into();
            assert!(matches!(err, RegressionError::Serialization(_)));
        }
    }

    #[test]
    fn test_error_is_std_error() {
        let err = RegressionError::InvalidParameter("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
