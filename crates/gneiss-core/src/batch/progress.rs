//! Progress tracking for batch execution.
//!
//! Purely observational: the tracker is updated from the collection loop
//! as outcomes arrive and never influences control flow.

use std::time::{Duration, Instant};
use tracing::debug;

/// Tracks completion counts for one batch run.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    /// Total number of valid items (dispatched plus skipped).
    pub total: usize,
    /// Completed items, including pre-dispatch skips.
    pub completed: usize,
    /// Items that produced an output.
    pub succeeded: usize,
    /// Items that failed during processing.
    pub failed: usize,
    /// Items skipped because their output already existed.
    pub skipped: usize,
    /// Start time of the run.
    pub start_time: Instant,
}

impl ProgressTracker {
    /// Create a tracker for `total` valid items.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            start_time: Instant::now(),
        }
    }

    /// Record a successful completion.
    pub fn on_success(&mut self) {
        self.completed += 1;
        self.succeeded += 1;
    }

    /// Record a failed completion.
    pub fn on_failure(&mut self) {
        self.completed += 1;
        self.failed += 1;
    }

    /// Record a pre-dispatch skip.
    pub fn on_skip(&mut self) {
        self.completed += 1;
        self.skipped += 1;
    }

    /// Completion percentage, 0.0 to 100.0.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }

    /// Time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Emit the current counts as a debug event.
    pub fn emit(&self) {
        debug!(
            completed = self.completed,
            total = self.total,
            succeeded = self.succeeded,
            failed = self.failed,
            skipped = self.skipped,
            percent = format!("{:.1}", self.percentage()),
            "Batch progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_starts_empty() {
        let tracker = ProgressTracker::new(10);
        assert_eq!(tracker.total, 10);
        assert_eq!(tracker.completed, 0);
        assert!((tracker.percentage() - 0.0).abs() < 0.1);
    }

    #[test]
    fn test_tracker_counts_outcomes() {
        let mut tracker = ProgressTracker::new(4);
        tracker.on_success();
        tracker.on_success();
        tracker.on_failure();
        tracker.on_skip();

        assert_eq!(tracker.completed, 4);
        assert_eq!(tracker.succeeded, 2);
        assert_eq!(tracker.failed, 1);
        assert_eq!(tracker.skipped, 1);
        assert!((tracker.percentage() - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_tracker_zero_total() {
        let tracker = ProgressTracker::new(0);
        assert!((tracker.percentage() - 0.0).abs() < 0.1);
    }
}
