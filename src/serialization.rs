//! Serialization of fitted estimator parameters.
//!
//! Fitted encoders, discretizers and linear models expose a plain-data
//! parameter struct; this module turns those structs into bytes and back,
//! independent of the backend the estimator was fitted on.

use std::error::Error;
use std::path::Path;

/// Parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain data (e.g. `Vec<f64>`, scalars),
/// never backend tensors.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;

    /// Write the serialized parameters to `path`.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let bytes = self.to_bytes().map_err(std::io::Error::other)?;
        std::fs::write(path, bytes)
    }
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct Params {
        edges: Vec<f64>,
        n: usize,
    }

    #[test]
    fn test_bytes_roundtrip() {
        let p = Params {
            edges: vec![0.0, 0.5, 1.0],
            n: 2,
        };
        let bytes = p.to_bytes().unwrap();
        assert_eq!(Params::from_bytes(&bytes).unwrap(), p);
    }

    #[test]
    fn test_truncated_bytes_fail() {
        let p = Params {
            edges: vec![1.0; 4],
            n: 4,
        };
        let bytes = p.to_bytes().unwrap();
        assert!(Params::from_bytes(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.bin");
        let p = Params {
            edges: vec![2.0],
            n: 1,
        };
        p.write_to(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(Params::from_bytes(&bytes).unwrap(), p);
    }
}
