//! Error types for batch processing.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a batch call before any work is dispatched.
///
/// Per-item failures are never surfaced through this type; they are
/// captured as [`JobError`] records inside the batch report.
#[derive(Debug, Error)]
pub enum BatchError {
    /// None of the requested items passed input validation.
    #[error("no valid inputs: none of the requested items resolve to readable files")]
    NoValidInputs,

    /// Invalid batch configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O errors raised while preparing the run (e.g. output directory creation).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// The stage at which a work item failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobErrorKind {
    /// The source did not exist or was not a regular file at validation time.
    NotFound,
    /// The artifact could not be loaded.
    Load,
    /// The caller-supplied transform rejected the artifact.
    Transform,
    /// The derived artifact could not be saved.
    Save,
    /// The item was never started because the batch stopped after an
    /// earlier failure.
    Cancelled,
    /// Detail was dropped because the per-run detail cap was reached.
    Overflow,
}

impl JobErrorKind {
    /// Short lowercase label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Load => "load",
            Self::Transform => "transform",
            Self::Save => "save",
            Self::Cancelled => "cancelled",
            Self::Overflow => "overflow",
        }
    }
}

/// A single per-item failure record.
#[derive(Debug, Clone, Serialize)]
pub struct JobError {
    /// Source identifier of the failed item.
    pub source: PathBuf,
    /// Stage at which the failure occurred.
    pub kind: JobErrorKind,
    /// Underlying error message.
    pub message: String,
}

impl JobError {
    /// Create a new failure record.
    pub fn new(source: impl Into<PathBuf>, kind: JobErrorKind, message: impl Into<String>) -> Self {
        Self { source: source.into(), kind, message: message.into() }
    }

    /// Record for an item dropped at validation time.
    pub fn not_found(source: impl Into<PathBuf>) -> Self {
        Self::new(source, JobErrorKind::NotFound, "source does not exist or is not a regular file")
    }

    /// Record for an item that was never dispatched because the batch
    /// stopped after an earlier failure.
    pub fn cancelled(source: impl Into<PathBuf>) -> Self {
        Self::new(source, JobErrorKind::Cancelled, "batch stopped after an earlier failure")
    }
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed ({}): {}", self.source.display(), self.kind.as_str(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_display() {
        let err = BatchError::NoValidInputs;
        assert!(format!("{}", err).contains("no valid inputs"));

        let err = BatchError::InvalidConfig("bad suffix".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("invalid configuration"));
        assert!(msg.contains("bad suffix"));
    }

    #[test]
    fn test_batch_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BatchError = io_err.into();
        match err {
            BatchError::Io(_) => {}
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_job_error_display() {
        let err = JobError::new("photos/a.png", JobErrorKind::Transform, "bad pixel data");
        let msg = format!("{}", err);
        assert!(msg.contains("photos/a.png"));
        assert!(msg.contains("transform"));
        assert!(msg.contains("bad pixel data"));
    }

    #[test]
    fn test_job_error_not_found() {
        let err = JobError::not_found("missing.jpg");
        assert_eq!(err.kind, JobErrorKind::NotFound);
        assert_eq!(err.source, PathBuf::from("missing.jpg"));
    }

    #[test]
    fn test_job_error_kind_labels() {
        assert_eq!(JobErrorKind::Load.as_str(), "load");
        assert_eq!(JobErrorKind::Cancelled.as_str(), "cancelled");
        assert_eq!(JobErrorKind::Overflow.as_str(), "overflow");
    }
}
