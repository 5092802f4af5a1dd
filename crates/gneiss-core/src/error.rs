//! Error types for Gneiss Core.

use crate::batch::BatchError;
use thiserror::Error;

/// Core error type for Gneiss operations.
#[derive(Error, Debug)]
pub enum GneissError {
    /// Batch-level errors
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Gneiss operations.
pub type Result<T> = std::result::Result<T, GneissError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gneiss_error_batch_conversion() {
        let err: GneissError = BatchError::NoValidInputs.into();
        match err {
            GneissError::Batch(BatchError::NoValidInputs) => {}
            _ => panic!("Expected Batch error variant"),
        }
    }

    #[test]
    fn test_gneiss_error_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GneissError = io_err.into();
        match err {
            GneissError::Io(_) => {}
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_gneiss_error_display() {
        let err: GneissError = BatchError::InvalidConfig("empty suffix".to_string()).into();
        let msg = format!("{}", err);
        assert!(msg.contains("Batch error"));
        assert!(msg.contains("empty suffix"));
    }
}
