//! Data model for parsed thread dumps.
//!
//! This module defines the structures built by the dump parser: per-thread
//! snapshot records, deadlock cycles with their wait-for graphs, and the
//! top-level `ThreadDump` container.

use std::fmt;

/// Thread state as reported on a `java.lang.Thread.State:` line.
///
/// Unrecognized uppercase tokens are preserved verbatim in `Other` so a
/// dump from a newer JVM still produces a usable state summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadStatus {
    Runnable,
    Blocked,
    Waiting,
    TimedWaiting,
    New,
    Terminated,
    Other(String),
    /// No state line was present for this thread (not the same as a state
    /// we failed to recognize).
    Unreported,
}

impl ThreadStatus {
    /// Maps a state token (e.g. `TIMED_WAITING`) to its variant.
    pub fn from_token(token: &str) -> ThreadStatus {
        match token {
            "RUNNABLE" => ThreadStatus::Runnable,
            "BLOCKED" => ThreadStatus::Blocked,
            "WAITING" => ThreadStatus::Waiting,
            "TIMED_WAITING" => ThreadStatus::TimedWaiting,
            "NEW" => ThreadStatus::New,
            "TERMINATED" => ThreadStatus::Terminated,
            other => ThreadStatus::Other(other.to_string()),
        }
    }

    /// The state token as it appeared in the dump, or `""` for `Unreported`.
    pub fn as_str(&self) -> &str {
        match self {
            ThreadStatus::Runnable => "RUNNABLE",
            ThreadStatus::Blocked => "BLOCKED",
            ThreadStatus::Waiting => "WAITING",
            ThreadStatus::TimedWaiting => "TIMED_WAITING",
            ThreadStatus::New => "NEW",
            ThreadStatus::Terminated => "TERMINATED",
            ThreadStatus::Other(token) => token,
            ThreadStatus::Unreported => "",
        }
    }

    /// True when the dump carried a state line for this thread.
    pub fn is_reported(&self) -> bool {
        !matches!(self, ThreadStatus::Unreported)
    }
}

impl fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ThreadStatus {
    fn default() -> Self {
        ThreadStatus::Unreported
    }
}

/// A lock reference: the monitor address and the type text in parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRef {
    /// Hex address, e.g. `0x00000000e0c9d498`. Opaque; never arithmetic.
    pub id: String,
    /// The parenthetical type text, e.g. `java.lang.Object`.
    pub class_name: String,
}

impl fmt::Display for LockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.class_name)
    }
}

/// One thread's snapshot state.
#[derive(Debug, Clone, Default)]
pub struct ThreadInfo {
    /// Thread name; the only stable key across dump sections.
    pub name: String,
    /// JVM thread id token (hex string).
    pub tid: String,
    /// Native thread id token (hex string).
    pub nid: String,
    pub status: ThreadStatus,
    /// CPU time in milliseconds from the header's `cpu=` fragment.
    /// `None` means the dump did not report it, not zero.
    pub cpu_time_ms: Option<f64>,
    /// Elapsed wall-clock seconds from the header's `elapsed=` fragment.
    pub elapsed_seconds: Option<f64>,
    /// Stack frames in source order, current execution point first.
    pub stack_trace: Vec<String>,
    /// The lock this thread is blocked acquiring, if any.
    pub waiting_on: Option<LockRef>,
    /// Monitor locks held by this thread, in source order.
    pub locked_synchronizers: Vec<LockRef>,
    /// Ownable synchronizers held by this thread, in source order.
    pub locked_ownables: Vec<LockRef>,
}

/// One participant's edge in a deadlock wait-for graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitEntry {
    pub thread: String,
    /// Lock id this thread is reported as waiting for.
    pub waiting_for: Option<String>,
    /// Lock id this thread holds, filled in by the correlator.
    pub holding: Option<String>,
}

impl WaitEntry {
    pub fn new(thread: impl Into<String>) -> WaitEntry {
        WaitEntry {
            thread: thread.into(),
            waiting_for: None,
            holding: None,
        }
    }
}

/// One reported cycle of mutually blocked threads.
#[derive(Debug, Clone, Default)]
pub struct Deadlock {
    /// Thread names in the order they first appeared in the section.
    /// Report order, not cycle order.
    pub participants: Vec<String>,
    /// Wait-for graph, same order as `participants`.
    pub wait_graph: Vec<WaitEntry>,
    /// Verbatim section text, retained for audit/display.
    pub raw_description: String,
}

impl Deadlock {
    /// True when every participant has both its wait target and its held
    /// lock resolved.
    pub fn is_fully_correlated(&self) -> bool {
        self.wait_graph
            .iter()
            .all(|e| e.waiting_for.is_some() && e.holding.is_some())
    }
}

/// The complete parsed model of one thread dump.
#[derive(Debug, Clone, Default)]
pub struct ThreadDump {
    pub threads: Vec<ThreadInfo>,
    pub deadlocks: Vec<Deadlock>,
    /// Set when input ended inside a deadlock section. The in-progress
    /// deadlock is discarded, never finalized.
    pub truncated_deadlock: bool,
}

impl ThreadDump {
    /// True when no thread headers were recognized.
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Looks up a thread by its name (first match in document order).
    pub fn thread_by_name(&self, name: &str) -> Option<&ThreadInfo> {
        self.threads.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_token_known_states() {
        assert_eq!(ThreadStatus::from_token("RUNNABLE"), ThreadStatus::Runnable);
        assert_eq!(ThreadStatus::from_token("BLOCKED"), ThreadStatus::Blocked);
        assert_eq!(
            ThreadStatus::from_token("TIMED_WAITING"),
            ThreadStatus::TimedWaiting
        );
        assert_eq!(ThreadStatus::from_token("NEW"), ThreadStatus::New);
    }

    #[test]
    fn test_status_from_token_preserves_unknown() {
        let status = ThreadStatus::from_token("PARKED");
        assert_eq!(status, ThreadStatus::Other("PARKED".to_string()));
        assert_eq!(status.as_str(), "PARKED");
        assert!(status.is_reported());
    }

    #[test]
    fn test_unreported_is_empty_and_not_reported() {
        let status = ThreadStatus::default();
        assert_eq!(status.as_str(), "");
        assert!(!status.is_reported());
    }

    #[test]
    fn test_lock_ref_display() {
        let lock = LockRef {
            id: "0x00000000e0c9d498".to_string(),
            class_name: "java.lang.Object".to_string(),
        };
        assert_eq!(lock.to_string(), "0x00000000e0c9d498 (java.lang.Object)");
    }

    #[test]
    fn test_deadlock_correlation_completeness() {
        let mut deadlock = Deadlock::default();
        deadlock.wait_graph.push(WaitEntry {
            thread: "T1".to_string(),
            waiting_for: Some("0x01".to_string()),
            holding: Some("0x02".to_string()),
        });
        assert!(deadlock.is_fully_correlated());

        deadlock.wait_graph.push(WaitEntry::new("T2"));
        assert!(!deadlock.is_fully_correlated());
    }
}
