//! Bounded-concurrency batch processing.
//!
//! Given a collection of independent source items and a caller-supplied
//! transform, the engine validates inputs, derives deterministic output
//! paths, fans the work out across a resource-sized worker pool, and
//! returns one outcome per requested item plus an aggregate summary.

pub mod aggregate;
pub mod error;
pub mod output;
pub mod processor;
pub mod progress;
pub mod sizing;
pub mod store;
pub mod types;
pub mod validate;

pub use aggregate::{ErrorAggregator, ResultCollector};
pub use error::{BatchError, JobError, JobErrorKind};
pub use processor::BatchEngine;
pub use progress::ProgressTracker;
pub use sizing::{SizerConfig, compute_worker_count, worker_count_from_signals};
pub use store::{ArtifactStore, FsByteStore};
pub use types::{
    BatchOptions, BatchReport, BatchSummary, ItemResult, JobOutcome, ProgressCallback, WorkItem,
};
