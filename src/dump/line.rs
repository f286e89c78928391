//! Line classification for the canonical thread-dump dialect.
//!
//! Stateless pattern matchers that map a single line of dump text to a
//! tagged record kind. Unrecognized lines (blank lines, banners, unrelated
//! report sections) classify to `None` and are skipped by the parser.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dump::model::{LockRef, ThreadStatus};

static THREAD_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^"([^"]+)"\s+#\d+.*\btid=(0x[0-9a-f]+)\s+nid=(0x[0-9a-f]+)\s+.*\[(0x[0-9a-f]+)\]"#)
        .expect("invalid thread header pattern")
});

/// CPU/elapsed fragment embedded in newer thread headers.
static CPU_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"cpu=([\d.]+)ms\s+elapsed=([\d.]+)s").expect("invalid cpu time pattern")
});

static THREAD_STATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+java\.lang\.Thread\.State: ([A-Z_]+)(?:\s+\((.*)\))?")
        .expect("invalid thread state pattern")
});

static STACK_FRAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+at (.+)").expect("invalid stack frame pattern"));

/// Monitor lock: `- locked <0x...> (a java.lang.Object)`.
static LOCKED_SYNC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+- locked <(0x[0-9a-f]+)> \(a ([^)]+)\)").expect("invalid locked pattern")
});

/// Ownable synchronizer: same shape without the `a ` quoting. Must only be
/// tried after `LOCKED_SYNC`, which it would otherwise shadow.
static LOCKED_OWNABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+- locked <(0x[0-9a-f]+)> \(([^)]+)\)")
        .expect("invalid locked ownable pattern")
});

static WAITING_TO_LOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+- waiting to lock <(0x[0-9a-f]+)> \(([^)]+)\)")
        .expect("invalid waiting to lock pattern")
});

static DEADLOCK_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Found (\d+) Java-level deadlock").expect("invalid deadlock start pattern")
});

/// Identity and timing fields extracted from a thread header line.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadHeader {
    pub name: String,
    pub tid: String,
    pub nid: String,
    pub cpu_time_ms: Option<f64>,
    pub elapsed_seconds: Option<f64>,
}

/// One recognized line of dump text.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    ThreadHeader(ThreadHeader),
    ThreadState {
        status: ThreadStatus,
        qualifier: Option<String>,
    },
    StackFrame(String),
    LockedSynchronizer(LockRef),
    LockedOwnable(LockRef),
    WaitingToLock(LockRef),
    DeadlockStart {
        /// Cycle count announced by the report. Parsed but unused downstream.
        cycles: u32,
    },
}

/// Classifies one line of dump text, or returns `None` for anything the
/// dialect does not define. Pure function; no side effects.
pub fn classify(line: &str) -> Option<Line> {
    if let Some(caps) = DEADLOCK_START.captures(line) {
        let cycles = caps[1].parse().unwrap_or(0);
        return Some(Line::DeadlockStart { cycles });
    }

    if let Some(caps) = THREAD_HEADER.captures(line) {
        let (cpu_time_ms, elapsed_seconds) = match CPU_TIME.captures(line) {
            Some(cpu) => (cpu[1].parse().ok(), cpu[2].parse().ok()),
            None => (None, None),
        };
        return Some(Line::ThreadHeader(ThreadHeader {
            name: caps[1].to_string(),
            tid: caps[2].to_string(),
            nid: caps[3].to_string(),
            cpu_time_ms,
            elapsed_seconds,
        }));
    }

    if let Some(caps) = THREAD_STATE.captures(line) {
        return Some(Line::ThreadState {
            status: ThreadStatus::from_token(&caps[1]),
            qualifier: caps.get(2).map(|m| m.as_str().to_string()),
        });
    }

    if let Some(caps) = WAITING_TO_LOCK.captures(line) {
        return Some(Line::WaitingToLock(lock_ref(&caps[1], &caps[2])));
    }

    // Synchronizer first: its `(a TYPE)` shape is a subset of the ownable
    // shape, and the two kinds must never shadow each other.
    if let Some(caps) = LOCKED_SYNC.captures(line) {
        return Some(Line::LockedSynchronizer(lock_ref(&caps[1], &caps[2])));
    }

    if let Some(caps) = LOCKED_OWNABLE.captures(line) {
        return Some(Line::LockedOwnable(lock_ref(&caps[1], &caps[2])));
    }

    if let Some(caps) = STACK_FRAME.captures(line) {
        return Some(Line::StackFrame(caps[1].to_string()));
    }

    None
}

/// Extracts the quoted thread name from a deadlock-section line such as
/// `"Worker-2":`. Returns `None` unless the line starts with a quote and
/// carries a closing one.
pub fn quoted_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(&rest[..end])
}

fn lock_ref(id: &str, class_name: &str) -> LockRef {
    LockRef {
        id: id.to_string(),
        class_name: class_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Thread header classification
    // -------------------------------------------------------------------------

    #[test]
    fn test_classify_thread_header_with_cpu_fragment() {
        let line = r#""main" #1 prio=5 os_prio=0 cpu=125.32ms elapsed=5.42s tid=0x00007f1234567000 nid=0x1a2b runnable  [0x00007f1234566000]"#;
        match classify(line) {
            Some(Line::ThreadHeader(header)) => {
                assert_eq!(header.name, "main");
                assert_eq!(header.tid, "0x00007f1234567000");
                assert_eq!(header.nid, "0x1a2b");
                assert_eq!(header.cpu_time_ms, Some(125.32));
                assert_eq!(header.elapsed_seconds, Some(5.42));
            }
            other => panic!("expected thread header, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_thread_header_without_cpu_fragment() {
        let line = r#""GC task thread#0 (ParallelGC)" #2 os_prio=0 tid=0x00007f1234500000 nid=0x1a2c runnable  [0x0000000000000000]"#;
        match classify(line) {
            Some(Line::ThreadHeader(header)) => {
                assert_eq!(header.name, "GC task thread#0 (ParallelGC)");
                assert_eq!(header.cpu_time_ms, None);
                assert_eq!(header.elapsed_seconds, None);
            }
            other => panic!("expected thread header, got {:?}", other),
        }
    }

    // -------------------------------------------------------------------------
    // State, frame, lock lines
    // -------------------------------------------------------------------------

    #[test]
    fn test_classify_state_line_with_qualifier() {
        let line = "   java.lang.Thread.State: TIMED_WAITING (on object monitor)";
        match classify(line) {
            Some(Line::ThreadState { status, qualifier }) => {
                assert_eq!(status, ThreadStatus::TimedWaiting);
                assert_eq!(qualifier.as_deref(), Some("on object monitor"));
            }
            other => panic!("expected state line, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_state_line_without_qualifier() {
        let line = "   java.lang.Thread.State: RUNNABLE";
        match classify(line) {
            Some(Line::ThreadState { status, qualifier }) => {
                assert_eq!(status, ThreadStatus::Runnable);
                assert_eq!(qualifier, None);
            }
            other => panic!("expected state line, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_stack_frame() {
        let line = "\tat com.example.Worker.run(Worker.java:42)";
        assert_eq!(
            classify(line),
            Some(Line::StackFrame(
                "com.example.Worker.run(Worker.java:42)".to_string()
            ))
        );
    }

    #[test]
    fn test_locked_synchronizer_vs_ownable_disambiguation() {
        // `(a TYPE)` is a monitor lock.
        let sync = "\t- locked <0x00000000e0c9d498> (a java.lang.Object)";
        match classify(sync) {
            Some(Line::LockedSynchronizer(lock)) => {
                assert_eq!(lock.id, "0x00000000e0c9d498");
                assert_eq!(lock.class_name, "java.lang.Object");
            }
            other => panic!("expected locked synchronizer, got {:?}", other),
        }

        // Without the `a ` quoting it is an ownable synchronizer.
        let ownable =
            "\t- locked <0x00000000e0c9d499> (java.util.concurrent.locks.ReentrantLock$NonfairSync)";
        match classify(ownable) {
            Some(Line::LockedOwnable(lock)) => {
                assert_eq!(lock.id, "0x00000000e0c9d499");
                assert_eq!(
                    lock.class_name,
                    "java.util.concurrent.locks.ReentrantLock$NonfairSync"
                );
            }
            other => panic!("expected locked ownable, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_waiting_to_lock() {
        let line = "\t- waiting to lock <0x00000000e0c9d498> (a java.lang.Object)";
        match classify(line) {
            Some(Line::WaitingToLock(lock)) => {
                assert_eq!(lock.id, "0x00000000e0c9d498");
                assert_eq!(lock.class_name, "a java.lang.Object");
            }
            other => panic!("expected waiting to lock, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_deadlock_start_carries_count() {
        assert_eq!(
            classify("Found 2 Java-level deadlocks:"),
            Some(Line::DeadlockStart { cycles: 2 })
        );
    }

    #[test]
    fn test_unrecognized_lines_classify_to_none() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("Full thread dump OpenJDK 64-Bit Server VM:"), None);
        assert_eq!(classify("JNI global refs: 15, weak refs: 0"), None);
        assert_eq!(classify("   - parking to wait for  <0x01> (a X)"), None);
    }

    // -------------------------------------------------------------------------
    // Deadlock-section name extraction
    // -------------------------------------------------------------------------

    #[test]
    fn test_quoted_name() {
        assert_eq!(quoted_name("\"Worker-2\":"), Some("Worker-2"));
        assert_eq!(quoted_name("  waiting to lock monitor"), None);
        assert_eq!(quoted_name("\"unterminated"), None);
    }
}
