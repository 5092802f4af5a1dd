//! Batch engine: bounded fan-out dispatch with per-item error isolation.
//!
//! Workers are tokio tasks gated by a semaphore sized from host resource
//! signals. Each worker runs load -> transform -> save and returns exactly
//! one [`JobOutcome`] over a channel; nothing else crosses the worker
//! boundary. All aggregation state is owned by the single collection loop
//! on the calling task, so no locks guard the counters.

use crate::batch::aggregate::ResultCollector;
use crate::batch::error::{BatchError, JobError, JobErrorKind};
use crate::batch::progress::ProgressTracker;
use crate::batch::sizing::{self, SizerConfig};
use crate::batch::store::ArtifactStore;
use crate::batch::types::{BatchOptions, BatchReport, JobOutcome, ProgressCallback, WorkItem};
use crate::batch::{output, validate};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info};

/// Applies a caller-supplied transform to a collection of independent
/// work items in parallel and reports one outcome per item.
///
/// The engine holds no per-run state; one instance can serve any number
/// of sequential or concurrent batch calls.
pub struct BatchEngine<S> {
    store: Arc<S>,
    sizer: SizerConfig,
}

impl<S> BatchEngine<S>
where
    S: ArtifactStore + 'static,
{
    /// Create an engine over the given artifact store.
    pub fn new(store: S) -> Self {
        Self::with_sizer(store, SizerConfig::default())
    }

    /// Create an engine with explicit pool-sizing tunables.
    pub fn with_sizer(store: S, sizer: SizerConfig) -> Self {
        Self { store: Arc::new(store), sizer }
    }

    /// Run one batch: validate inputs, pre-filter existing outputs, fan
    /// the rest out across the bounded pool, and collect every outcome.
    ///
    /// # Arguments
    /// * `items` - Requested source paths
    /// * `transform` - Caller-supplied artifact transform
    /// * `options` - Per-run configuration
    ///
    /// # Returns
    /// A [`BatchReport`] with exactly one entry per requested item, or
    /// [`BatchError::NoValidInputs`] when nothing passes validation.
    pub async fn run<F>(
        &self,
        items: &[PathBuf],
        transform: F,
        options: &BatchOptions,
    ) -> crate::error::Result<BatchReport>
    where
        F: Fn(S::Artifact) -> Result<S::Artifact, String> + Send + Sync + 'static,
    {
        self.run_with_progress(items, transform, options, None).await
    }

    /// Like [`Self::run`], with an explicit progress callback invoked once
    /// per completed or skipped item with `(completed, total)` counts.
    pub async fn run_with_progress<F>(
        &self,
        items: &[PathBuf],
        transform: F,
        options: &BatchOptions,
        progress: Option<ProgressCallback>,
    ) -> crate::error::Result<BatchReport>
    where
        F: Fn(S::Artifact) -> Result<S::Artifact, String> + Send + Sync + 'static,
    {
        let total_input = items.len();
        let (valid, dropped) = validate::validate(items);
        if valid.is_empty() {
            return Err(BatchError::NoValidInputs.into());
        }
        output::ensure_output_dir(options).map_err(BatchError::Io)?;

        let mut collector = ResultCollector::new(total_input, valid.len(), options.max_error_detail);
        for source in dropped {
            collector.record_dropped(source);
        }

        // Pre-filter items whose output already satisfies them.
        let mut tracker = ProgressTracker::new(valid.len());
        let mut work = Vec::with_capacity(valid.len());
        for source in valid {
            let out = output::resolve(&source, options);
            if options.skip_existing && out.exists() {
                collector.record_skipped(source, out);
                tracker.on_skip();
                report_progress(progress.as_ref(), options.show_progress, &tracker);
            } else {
                work.push(WorkItem { source, output: out });
            }
        }

        if work.is_empty() {
            let report = collector.finish();
            info!(
                total_input = report.summary.total_input,
                skipped = report.summary.skipped,
                "All valid items already satisfied, nothing dispatched"
            );
            return Ok(report);
        }

        let pool_size = sizing::compute_worker_count(options.max_workers, &self.sizer);
        debug!(
            total_items = work.len(),
            concurrency = pool_size,
            stop_on_error = options.stop_on_error,
            "Starting batch dispatch"
        );

        let semaphore = Arc::new(Semaphore::new(pool_size));
        let cancelled = Arc::new(AtomicBool::new(false));
        let transform = Arc::new(transform);
        let (tx, mut rx) = mpsc::unbounded_channel::<JobOutcome>();

        for item in work {
            let semaphore = Arc::clone(&semaphore);
            let cancelled = Arc::clone(&cancelled);
            let store = Arc::clone(&self.store);
            let transform = Arc::clone(&transform);
            let format = options.output_format.clone();
            let stop_on_error = options.stop_on_error;
            let tx = tx.clone();

            tokio::spawn(async move {
                let outcome =
                    run_unit(&semaphore, &cancelled, stop_on_error, &*store, &*transform, item, format.as_deref())
                        .await;
                // Receiver only closes after the collection loop ends.
                let _ = tx.send(outcome);
            });
        }
        drop(tx);

        // Single collection loop: sole owner of all mutable run state.
        while let Some(outcome) = rx.recv().await {
            match outcome {
                JobOutcome::Success { source, output } => {
                    collector.record_success(source, output);
                    tracker.on_success();
                    report_progress(progress.as_ref(), options.show_progress, &tracker);
                }
                JobOutcome::Failure(failure) if failure.kind == JobErrorKind::Cancelled => {
                    // Never started, so not a completion event.
                    collector.record_cancelled(failure.source);
                }
                JobOutcome::Failure(failure) => {
                    if options.stop_on_error && collector.failure_count() == 0 {
                        info!(
                            source = %failure.source.display(),
                            "First failure observed, no further items will be started"
                        );
                    }
                    collector.record_failure(failure);
                    tracker.on_failure();
                    report_progress(progress.as_ref(), options.show_progress, &tracker);
                }
            }
        }

        let report = collector.finish();
        info!(
            total_input = report.summary.total_input,
            valid_input = report.summary.valid_input,
            processed = report.summary.processed,
            succeeded = report.summary.succeeded,
            errors = report.summary.errors,
            skipped = report.summary.skipped,
            duration_ms = tracker.elapsed().as_millis() as u64,
            "Batch processing completed"
        );
        Ok(report)
    }
}

/// Execute one unit of work behind the pool semaphore.
///
/// The cancellation flag is consulted before a slot is requested and again
/// after one is granted; once a unit begins processing it always runs to
/// completion. On failure with stop-on-error, the flag is raised before
/// the slot is released so no later unit can start.
async fn run_unit<S, F>(
    semaphore: &Arc<Semaphore>,
    cancelled: &AtomicBool,
    stop_on_error: bool,
    store: &S,
    transform: &F,
    item: WorkItem,
    format: Option<&str>,
) -> JobOutcome
where
    S: ArtifactStore,
    F: Fn(S::Artifact) -> Result<S::Artifact, String>,
{
    if cancelled.load(Ordering::SeqCst) {
        return JobOutcome::Failure(JobError::cancelled(item.source));
    }

    let permit = match Arc::clone(semaphore).acquire_owned().await {
        Ok(permit) => permit,
        // The semaphore is never closed while units hold it.
        Err(_) => return JobOutcome::Failure(JobError::cancelled(item.source)),
    };

    // A failure may have landed while this unit waited for a slot.
    if cancelled.load(Ordering::SeqCst) {
        return JobOutcome::Failure(JobError::cancelled(item.source));
    }

    let outcome = process_item(store, transform, item, format).await;
    if stop_on_error && matches!(outcome, JobOutcome::Failure(_)) {
        cancelled.store(true, Ordering::SeqCst);
    }
    drop(permit);
    outcome
}

/// Run load -> transform -> save for one item, converting any stage
/// failure into a `Failure` outcome. Nothing propagates.
async fn process_item<S, F>(store: &S, transform: &F, item: WorkItem, format: Option<&str>) -> JobOutcome
where
    S: ArtifactStore,
    F: Fn(S::Artifact) -> Result<S::Artifact, String>,
{
    let artifact = match store.load(&item.source).await {
        Ok(artifact) => artifact,
        Err(message) => {
            return JobOutcome::Failure(JobError::new(item.source, JobErrorKind::Load, message));
        }
    };

    let derived = match transform(artifact) {
        Ok(derived) => derived,
        Err(message) => {
            return JobOutcome::Failure(JobError::new(item.source, JobErrorKind::Transform, message));
        }
    };

    match store.save(derived, &item.output, format).await {
        Ok(()) => JobOutcome::Success { source: item.source, output: item.output },
        Err(message) => JobOutcome::Failure(JobError::new(item.source, JobErrorKind::Save, message)),
    }
}

fn report_progress(progress: Option<&ProgressCallback>, show_progress: bool, tracker: &ProgressTracker) {
    if let Some(callback) = progress {
        callback(tracker.completed, tracker.total);
    } else if show_progress {
        tracker.emit();
    }
}
