//! Data types for batch processing.

use crate::batch::error::JobError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Options controlling a single batch run.
///
/// Every field has a serde default so partial configuration files work the
/// same way as the builder-style defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOptions {
    /// Directory where derived outputs are written (created if absent).
    /// When unset, each output lands next to its source.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Output format override (file extension, e.g. "webp").
    /// When unset, each output keeps its source's extension.
    #[serde(default)]
    pub output_format: Option<String>,
    /// Suffix appended to the output file stem.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
    /// Emit progress events as items complete.
    #[serde(default = "default_true")]
    pub show_progress: bool,
    /// Treat an already-existing output as satisfying its work item.
    #[serde(default)]
    pub skip_existing: bool,
    /// Stop submitting new work after the first observed failure.
    #[serde(default)]
    pub stop_on_error: bool,
    /// Explicit worker-pool size. Derived from host signals when unset.
    #[serde(default)]
    pub max_workers: Option<usize>,
    /// Number of failures retained with full detail before degrading to a
    /// running count.
    #[serde(default = "default_max_error_detail")]
    pub max_error_detail: usize,
}

fn default_output_suffix() -> String {
    "_processed".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_error_detail() -> usize {
    10
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            output_format: None,
            output_suffix: default_output_suffix(),
            show_progress: true,
            skip_existing: false,
            stop_on_error: false,
            max_workers: None,
            max_error_detail: default_max_error_detail(),
        }
    }
}

/// One unit of dispatchable work: a validated source plus its resolved
/// output path. Immutable once created; consumed by exactly one worker.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Validated source path.
    pub source: PathBuf,
    /// Resolved output path.
    pub output: PathBuf,
}

/// Outcome of one dispatched work item, produced exactly once by the
/// worker that processed it.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    /// Load, transform, and save all succeeded.
    Success {
        /// Source path of the processed item.
        source: PathBuf,
        /// Path the derived artifact was written to.
        output: PathBuf,
    },
    /// The item failed at some stage; nothing propagates past the worker.
    Failure(JobError),
}

/// Final disposition of one requested item in the batch report.
#[derive(Debug, Clone)]
pub enum ItemResult {
    /// A derived output was written at this path.
    Written(PathBuf),
    /// The output already existed and the item was skipped pre-dispatch.
    Skipped(PathBuf),
    /// The item failed; see the attached record.
    Failed(JobError),
}

impl ItemResult {
    /// Output path for written or skipped items.
    pub fn output_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Written(path) | Self::Skipped(path) => Some(path),
            Self::Failed(_) => None,
        }
    }

    /// Failure record, if the item failed.
    pub fn error(&self) -> Option<&JobError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Aggregate counters describing one run's outcome distribution.
///
/// Computed once, after all outcomes are known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Number of items originally requested.
    pub total_input: usize,
    /// Items that passed input validation.
    pub valid_input: usize,
    /// Items actually attempted (dispatched and completed).
    pub processed: usize,
    /// Items skipped because their output already existed.
    pub skipped: usize,
    /// Items that failed during processing.
    pub errors: usize,
    /// Items that produced an output.
    pub succeeded: usize,
    /// `succeeded / max(1, valid_input)`, in the range 0.0 to 1.0.
    pub success_rate: f64,
}

/// Complete result of one batch invocation: one entry per originally
/// requested item, plus the aggregate summary.
#[derive(Debug)]
pub struct BatchReport {
    /// Per-item outcomes keyed by the requested source path.
    pub outcomes: HashMap<PathBuf, ItemResult>,
    /// Aggregate counters for the run.
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Total number of per-item entries.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the report carries no per-item entries.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Whether every requested item produced or already had an output.
    pub fn is_complete_success(&self) -> bool {
        self.summary.errors == 0 && self.summary.valid_input == self.summary.total_input
    }
}

/// Progress callback invoked once per completed or skipped item with
/// `(completed, total)` counts. Observational only.
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;
