//! Failure aggregation and result collection.
//!
//! Both types are owned and mutated solely by the single collection loop.
//! Workers communicate exclusively by returning outcome values, so no
//! locking is needed around these counters.

use crate::batch::error::{JobError, JobErrorKind};
use crate::batch::types::{BatchReport, BatchSummary, ItemResult};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::error;

/// Tracks failures with a bounded-detail policy.
///
/// The first `max_detail` failures are retained with full detail; beyond
/// the cap only a running count is kept, bounding memory and log volume on
/// batches with systemic failure.
#[derive(Debug)]
pub struct ErrorAggregator {
    max_detail: usize,
    detailed: usize,
    overflow: usize,
}

impl ErrorAggregator {
    /// Create an aggregator retaining up to `max_detail` detailed records.
    pub fn new(max_detail: usize) -> Self {
        Self { max_detail, detailed: 0, overflow: 0 }
    }

    /// Record one failure, returning the record to retain: the failure
    /// itself while under the detail cap, a degraded counter record after.
    pub fn record(&mut self, failure: JobError) -> JobError {
        error!(
            source = %failure.source.display(),
            stage = failure.kind.as_str(),
            message = %failure.message,
            "Work item failed"
        );

        if self.detailed < self.max_detail {
            self.detailed += 1;
            failure
        } else {
            self.overflow += 1;
            JobError::new(
                failure.source,
                JobErrorKind::Overflow,
                format!("see earlier detail, {} additional failures", self.overflow),
            )
        }
    }

    /// Number of failures recorded with full detail.
    pub fn detailed(&self) -> usize {
        self.detailed
    }

    /// Number of failures beyond the detail cap.
    pub fn overflow(&self) -> usize {
        self.overflow
    }

    /// Total failures observed.
    pub fn total(&self) -> usize {
        self.detailed + self.overflow
    }
}

/// Merges per-item outcomes into the final report.
///
/// Validation-dropped items are recorded as `NotFound` failures so the
/// report keeps exactly one entry per originally requested item; they are
/// not counted in the `errors` counter.
#[derive(Debug)]
pub struct ResultCollector {
    outcomes: HashMap<PathBuf, ItemResult>,
    aggregator: ErrorAggregator,
    total_input: usize,
    valid_input: usize,
    processed: usize,
    skipped: usize,
    succeeded: usize,
}

impl ResultCollector {
    /// Create a collector for one invocation.
    pub fn new(total_input: usize, valid_input: usize, max_error_detail: usize) -> Self {
        Self {
            outcomes: HashMap::with_capacity(total_input),
            aggregator: ErrorAggregator::new(max_error_detail),
            total_input,
            valid_input,
            processed: 0,
            skipped: 0,
            succeeded: 0,
        }
    }

    /// Record an item dropped at validation time.
    pub fn record_dropped(&mut self, source: PathBuf) {
        let failure = JobError::not_found(&source);
        self.outcomes.insert(source, ItemResult::Failed(failure));
    }

    /// Record an item skipped pre-dispatch because its output exists.
    pub fn record_skipped(&mut self, source: PathBuf, output: PathBuf) {
        self.skipped += 1;
        self.outcomes.insert(source, ItemResult::Skipped(output));
    }

    /// Record a successful worker outcome.
    pub fn record_success(&mut self, source: PathBuf, output: PathBuf) {
        self.processed += 1;
        self.succeeded += 1;
        self.outcomes.insert(source, ItemResult::Written(output));
    }

    /// Record a failed worker outcome through the bounded-detail policy.
    pub fn record_failure(&mut self, failure: JobError) {
        self.processed += 1;
        let source = failure.source.clone();
        let retained = self.aggregator.record(failure);
        self.outcomes.insert(source, ItemResult::Failed(retained));
    }

    /// Record an item that was never started because the batch stopped
    /// after an earlier failure. Counts neither as processed nor failed.
    pub fn record_cancelled(&mut self, source: PathBuf) {
        let failure = JobError::cancelled(&source);
        self.outcomes.insert(source, ItemResult::Failed(failure));
    }

    /// Failures observed so far (detailed and overflowed).
    pub fn failure_count(&self) -> usize {
        self.aggregator.total()
    }

    /// Finalize the run into a report. All outcomes must be accounted for
    /// before this is called.
    pub fn finish(self) -> BatchReport {
        let errors = self.aggregator.total();
        let summary = BatchSummary {
            total_input: self.total_input,
            valid_input: self.valid_input,
            processed: self.processed,
            skipped: self.skipped,
            errors,
            succeeded: self.succeeded,
            success_rate: self.succeeded as f64 / self.valid_input.max(1) as f64,
        };
        BatchReport { outcomes: self.outcomes, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(name: &str) -> JobError {
        JobError::new(name, JobErrorKind::Transform, "boom")
    }

    #[test]
    fn test_aggregator_keeps_first_k_in_detail() {
        let mut agg = ErrorAggregator::new(2);

        let first = agg.record(failure("a.png"));
        let second = agg.record(failure("b.png"));
        assert_eq!(first.kind, JobErrorKind::Transform);
        assert_eq!(second.kind, JobErrorKind::Transform);

        let third = agg.record(failure("c.png"));
        let fourth = agg.record(failure("d.png"));
        let fifth = agg.record(failure("e.png"));
        assert_eq!(third.kind, JobErrorKind::Overflow);
        assert_eq!(fourth.kind, JobErrorKind::Overflow);
        assert_eq!(fifth.kind, JobErrorKind::Overflow);
        assert!(fifth.message.contains("3 additional failures"));

        assert_eq!(agg.detailed(), 2);
        assert_eq!(agg.overflow(), 3);
        assert_eq!(agg.total(), 5);
    }

    #[test]
    fn test_aggregator_zero_cap_degrades_everything() {
        let mut agg = ErrorAggregator::new(0);
        let record = agg.record(failure("a.png"));
        assert_eq!(record.kind, JobErrorKind::Overflow);
        assert_eq!(agg.overflow(), 1);
    }

    #[test]
    fn test_collector_counters_and_summary() {
        let mut collector = ResultCollector::new(6, 5, 10);
        collector.record_dropped(PathBuf::from("missing.png"));
        collector.record_skipped(PathBuf::from("done.png"), PathBuf::from("out/done_processed.png"));
        collector.record_success(PathBuf::from("a.png"), PathBuf::from("out/a_processed.png"));
        collector.record_success(PathBuf::from("b.png"), PathBuf::from("out/b_processed.png"));
        collector.record_failure(failure("c.png"));

        let report = collector.finish();
        assert_eq!(report.len(), 5);
        let summary = &report.summary;
        assert_eq!(summary.total_input, 6);
        assert_eq!(summary.valid_input, 5);
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.errors, 1);
        // Conservation: succeeded + errors == processed.
        assert_eq!(summary.succeeded + summary.errors, summary.processed);
        assert!((summary.success_rate - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_collector_dropped_items_are_not_errors() {
        let mut collector = ResultCollector::new(2, 1, 10);
        collector.record_dropped(PathBuf::from("missing.png"));
        collector.record_success(PathBuf::from("a.png"), PathBuf::from("a_processed.png"));

        let report = collector.finish();
        assert_eq!(report.summary.errors, 0);
        assert_eq!(report.summary.succeeded, 1);
        let entry = report.outcomes.get(&PathBuf::from("missing.png")).unwrap();
        assert_eq!(entry.error().unwrap().kind, JobErrorKind::NotFound);
        assert!((report.summary.success_rate - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_collector_cancelled_items_keep_map_complete() {
        let mut collector = ResultCollector::new(3, 3, 10);
        collector.record_failure(failure("a.png"));
        collector.record_cancelled(PathBuf::from("b.png"));
        collector.record_cancelled(PathBuf::from("c.png"));

        let report = collector.finish();
        assert_eq!(report.len(), 3);
        assert_eq!(report.summary.processed, 1);
        assert_eq!(report.summary.errors, 1);
    }

    #[test]
    fn test_collector_empty_valid_set_rate() {
        let collector = ResultCollector::new(0, 0, 10);
        let report = collector.finish();
        assert!((report.summary.success_rate - 0.0).abs() < f64::EPSILON);
    }
}
