//! Worker-pool sizing from host resource signals.
//!
//! The pool size is advisory: it is computed once per batch call and never
//! re-evaluated mid-run. An explicit caller override always wins.

use serde::Deserialize;
use sysinfo::System;
use tracing::{debug, warn};

/// Tunables for derived pool sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct SizerConfig {
    /// Memory budget reserved per worker, in megabytes.
    #[serde(default = "default_per_worker_memory_mb")]
    pub per_worker_memory_mb: u64,
}

fn default_per_worker_memory_mb() -> u64 {
    2048
}

impl Default for SizerConfig {
    fn default() -> Self {
        Self { per_worker_memory_mb: default_per_worker_memory_mb() }
    }
}

/// Host resource signals sampled once at call time.
#[derive(Debug, Clone)]
pub struct ResourceSignals {
    /// Logical CPU count.
    pub cpu_count: usize,
    /// Available memory in megabytes.
    pub available_memory_mb: u64,
    /// Instantaneous CPU load, 0.0 to 100.0.
    pub cpu_load_percent: f32,
}

/// Compute the worker-pool size for one batch run.
///
/// # Arguments
/// * `explicit` - Caller-supplied pool size, used verbatim when present
///   (clamped to at least 1)
/// * `config` - Sizing tunables
///
/// # Returns
/// A pool size of at least 1. Failure to read host metrics falls back to
/// `max(1, cpu_count - 1)`.
pub fn compute_worker_count(explicit: Option<usize>, config: &SizerConfig) -> usize {
    if let Some(count) = explicit {
        return count.max(1);
    }

    let cpu_count = detect_cpu_count();
    match sample_signals(cpu_count) {
        Some(signals) => {
            let count = worker_count_from_signals(&signals, config);
            debug!(
                cpu_count = signals.cpu_count,
                available_memory_mb = signals.available_memory_mb,
                cpu_load_percent = signals.cpu_load_percent,
                workers = count,
                "Derived worker-pool size from host signals"
            );
            count
        }
        None => {
            let fallback = cpu_count.saturating_sub(1).max(1);
            warn!(workers = fallback, "Host metrics unavailable, using CPU-count fallback");
            fallback
        }
    }
}

/// Pure sizing policy, separated from sampling for testability.
///
/// `target = min(cpu_count, available_memory / per_worker_budget)`, then
/// capped by load: below 80% load one core is left free; above 80% the
/// remaining headroom is halved. Never returns less than 1.
pub fn worker_count_from_signals(signals: &ResourceSignals, config: &SizerConfig) -> usize {
    let memory_bound = (signals.available_memory_mb / config.per_worker_memory_mb.max(1)) as usize;
    let target = signals.cpu_count.min(memory_bound);

    // One core stays free for the host at any load level.
    let headroom = target.min(signals.cpu_count.saturating_sub(1));
    let capped = if signals.cpu_load_percent > 80.0 {
        // Heavy load: halve the remaining headroom.
        headroom / 2
    } else {
        headroom
    };

    capped.max(1)
}

fn detect_cpu_count() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Sample memory and CPU load via sysinfo.
///
/// CPU usage needs two refreshes separated by the minimum update interval
/// to produce a meaningful value; the short blocking wait is negligible
/// against the batch that follows.
fn sample_signals(cpu_count: usize) -> Option<ResourceSignals> {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.refresh_cpu_usage();

    let total_memory_mb = sys.total_memory() / (1024 * 1024);
    if total_memory_mb == 0 {
        return None;
    }
    let available_memory_mb = sys.available_memory() / (1024 * 1024);

    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    let cpu_load_percent = sys.global_cpu_usage();

    Some(ResourceSignals { cpu_count, available_memory_mb, cpu_load_percent })
}
