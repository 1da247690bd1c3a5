//! Serialization of fitted model parameters.
//!
//! Fitted components expose a plain-data parameter struct (`Vec<f64>`, scalars,
//! nested param structs). Anything that derives `serde` gets a byte encoding
//! through [`SerializableParams`], which is what `save_to_file` /
//! `load_from_file` build on.

use std::error::Error;
use std::path::Path;

use crate::error::{RegressionError, Result};

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain numerical data, not solver handles.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + Into<RegressionError> + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> std::result::Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> std::result::Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

/// Writes serialized params to `path`.
pub fn save_params<P, T>(params: &T, path: P) -> Result<()>
where
    P: AsRef<Path>,
    T: SerializableParams,
{
    let bytes = params.to_bytes().map_err(Into::<RegressionError>::into)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Reads params previously written by [`save_params`].
pub fn load_params<P, T>(path: P) -> Result<T>
where
    P: AsRef<Path>,
    T: SerializableParams,
{
    let bytes = std::fs::read(path)?;
    T::from_bytes(&bytes).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Coeffs {
        weights: Vec<f64>,
        bias: f64,
    }

    #[test]
    fn test_params_file_roundtrip() -> Result<()> {
        let params = Coeffs {
            weights: vec![0.5, -1.25],
            bias: 3.0,
        };
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("coeffs.bin");

        save_params(&params, &path)?;
        let loaded: Coeffs = load_params(&path)?;

        assert_eq!(loaded, params);
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result: Result<Coeffs> = load_params(tmp.path().join("absent.bin"));
        assert!(matches!(result, Err(RegressionError::Io(_))));
    }

    #[test]
    fn test_load_garbage_is_serialization_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("garbage.bin");
        std::fs::write(&path, [0xffu8; 3]).unwrap();
        let result: Result<Coeffs> = load_params(&path);
        assert!(matches!(result, Err(RegressionError::Serialization(_))));
    }
}
