//! Report views over a finished dump model.
//!
//! Each view is a pure projection: it borrows the model, never mutates it,
//! and can be computed independently of the others. Text rendering lives in
//! [`render`].

pub mod render;

pub use render::{render_report, ReportOptions, DEFAULT_STACK_PREVIEW};

use ahash::AHashMap as HashMap;

use crate::dump::model::{ThreadDump, ThreadInfo, ThreadStatus};

/// Default number of CPU consumers shown by the CPU view.
pub const DEFAULT_TOP_CPU: usize = 10;

/// Per-state thread counts plus the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSummary {
    /// `(state name, count)` for every reported state, sorted by state name
    /// for stable output. Threads with no state line count toward the total
    /// only.
    pub counts: Vec<(String, usize)>,
    pub total: usize,
}

/// Counts threads per reported state.
pub fn state_summary(dump: &ThreadDump) -> StateSummary {
    let mut by_state: HashMap<&str, usize> = HashMap::new();
    for thread in &dump.threads {
        if thread.status.is_reported() {
            *by_state.entry(thread.status.as_str()).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<(String, usize)> = by_state
        .into_iter()
        .map(|(state, count)| (state.to_string(), count))
        .collect();
    counts.sort_by(|a, b| a.0.cmp(&b.0));

    StateSummary {
        counts,
        total: dump.threads.len(),
    }
}

/// Threads with reported CPU time, sorted descending, truncated to `k`.
/// Ties keep document order (stable sort).
pub fn top_cpu_consumers(dump: &ThreadDump, k: usize) -> Vec<&ThreadInfo> {
    let mut consumers: Vec<&ThreadInfo> = dump
        .threads
        .iter()
        .filter(|t| t.cpu_time_ms.is_some())
        .collect();
    consumers.sort_by(|a, b| {
        b.cpu_time_ms
            .partial_cmp(&a.cpu_time_ms)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    consumers.truncate(k);
    consumers
}

/// RUNNABLE threads, deepest stack first. Ties keep document order.
pub fn runnable_threads(dump: &ThreadDump) -> Vec<&ThreadInfo> {
    let mut threads: Vec<&ThreadInfo> = dump
        .threads
        .iter()
        .filter(|t| t.status == ThreadStatus::Runnable)
        .collect();
    threads.sort_by(|a, b| b.stack_trace.len().cmp(&a.stack_trace.len()));
    threads
}

/// BLOCKED threads in document order.
pub fn blocked_threads(dump: &ThreadDump) -> Vec<&ThreadInfo> {
    dump.threads
        .iter()
        .filter(|t| t.status == ThreadStatus::Blocked)
        .collect()
}

/// WAITING and TIMED_WAITING threads in document order.
pub fn waiting_threads(dump: &ThreadDump) -> Vec<&ThreadInfo> {
    dump.threads
        .iter()
        .filter(|t| {
            matches!(
                t.status,
                ThreadStatus::Waiting | ThreadStatus::TimedWaiting
            )
        })
        .collect()
}
