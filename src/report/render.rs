//! Text rendering for report views.
//!
//! Builds the full human-readable report as a String; the analyze command
//! prints it to stdout. Layout follows the classic analyzer report shape:
//! `=== Section ===` headers, 40-dash separators between thread blocks, and
//! 3-frame stack previews with a `... (N more lines)` ellipsis unless full
//! stacks are requested.

use crate::dump::model::{Deadlock, ThreadDump, ThreadInfo};
use crate::report::{
    blocked_threads, runnable_threads, state_summary, top_cpu_consumers, waiting_threads,
    DEFAULT_TOP_CPU,
};

const SEPARATOR: &str = "----------------------------------------";

/// Default number of stack frames shown when full stacks are off.
pub const DEFAULT_STACK_PREVIEW: usize = 3;

/// Rendering knobs. Flags alter only which views are rendered and their
/// verbosity; they never alter parsing.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Append a detail section covering every thread.
    pub verbose: bool,
    /// Restrict output to the RUNNABLE category view.
    pub runnable_only: bool,
    /// Disable stack truncation in all stack-trace displays.
    pub full_stack: bool,
    /// Number of entries in the CPU consumers view.
    pub top_cpu: usize,
    /// Frames shown per stack when truncation is on.
    pub stack_preview: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            verbose: false,
            runnable_only: false,
            full_stack: false,
            top_cpu: DEFAULT_TOP_CPU,
            stack_preview: DEFAULT_STACK_PREVIEW,
        }
    }
}

/// Renders the complete report for a finished model.
pub fn render_report(dump: &ThreadDump, opts: &ReportOptions) -> String {
    if dump.is_empty() {
        return "No threads found in the dump file.\n".to_string();
    }

    let mut out = String::new();

    if dump.truncated_deadlock {
        out.push_str(
            "Warning: dump ended inside a deadlock section; the trailing deadlock report was ignored.\n",
        );
    }

    render_state_summary(&mut out, dump);

    if opts.runnable_only {
        render_runnable(&mut out, dump, opts);
    } else {
        render_deadlocks(&mut out, dump, opts);
        render_cpu(&mut out, dump, opts);
        render_blocked(&mut out, dump, opts);
        render_waiting(&mut out, dump, opts);
        if opts.verbose {
            render_all_threads(&mut out, dump, opts);
        }
    }

    out
}

fn render_state_summary(out: &mut String, dump: &ThreadDump) {
    let summary = state_summary(dump);
    out.push_str("\n=== Thread State Summary ===\n");
    for (state, count) in &summary.counts {
        out.push_str(&format!("{}: {} thread(s)\n", state, count));
    }
    out.push_str(&format!("Total Threads: {}\n", summary.total));
}

fn render_deadlocks(out: &mut String, dump: &ThreadDump, opts: &ReportOptions) {
    if dump.deadlocks.is_empty() {
        return;
    }
    out.push_str("\n=== Deadlock Analysis ===\n");
    for (i, deadlock) in dump.deadlocks.iter().enumerate() {
        render_deadlock(out, dump, deadlock, i + 1, opts);
    }
}

fn render_deadlock(
    out: &mut String,
    dump: &ThreadDump,
    deadlock: &Deadlock,
    number: usize,
    opts: &ReportOptions,
) {
    out.push_str(&format!("\nDeadlock #{}:\n", number));
    out.push_str("Threads involved:\n");
    for entry in &deadlock.wait_graph {
        out.push_str(&format!("  {}:\n", entry.thread));
        if let Some(waiting_for) = &entry.waiting_for {
            out.push_str(&format!("    - Waiting for lock: <{}>\n", waiting_for));
        }
        if let Some(holding) = &entry.holding {
            out.push_str(&format!("    - Holding lock: <{}>\n", holding));
        }
        if let Some(thread) = dump.thread_by_name(&entry.thread) {
            if !thread.stack_trace.is_empty() {
                out.push_str("    Stack trace:\n");
                render_stack(out, &thread.stack_trace, "      ", opts);
            }
        }
    }
    out.push_str("\nFull deadlock description:\n");
    out.push_str(&deadlock.raw_description);
    out.push('\n');
    out.push_str(SEPARATOR);
    out.push('\n');
}

fn render_cpu(out: &mut String, dump: &ThreadDump, opts: &ReportOptions) {
    let consumers = top_cpu_consumers(dump, opts.top_cpu);
    if consumers.is_empty() {
        return;
    }
    out.push_str(&format!(
        "\n=== Top {} CPU Consuming Threads ===\n",
        opts.top_cpu
    ));
    for thread in consumers {
        out.push_str(&format!("\nThread: {}\n", thread.name));
        if let Some(cpu) = thread.cpu_time_ms {
            out.push_str(&format!("CPU Time: {:.2}ms\n", cpu));
        }
        out.push_str(&format!("State: {}\n", thread.status));
        if !thread.stack_trace.is_empty() {
            out.push_str("Stack trace:\n");
            render_stack(out, &thread.stack_trace, "  ", opts);
        }
    }
}

fn render_runnable(out: &mut String, dump: &ThreadDump, opts: &ReportOptions) {
    let threads = runnable_threads(dump);
    if threads.is_empty() {
        return;
    }
    out.push_str("\n=== RUNNABLE Threads ===\n");
    render_detail_list(out, &threads, opts);
}

fn render_blocked(out: &mut String, dump: &ThreadDump, opts: &ReportOptions) {
    let threads = blocked_threads(dump);
    if threads.is_empty() {
        return;
    }
    out.push_str("\n=== Blocked Threads ===\n");
    render_detail_list(out, &threads, opts);
}

fn render_waiting(out: &mut String, dump: &ThreadDump, opts: &ReportOptions) {
    let threads = waiting_threads(dump);
    if threads.is_empty() {
        return;
    }
    out.push_str("\n=== Waiting Threads ===\n");
    render_detail_list(out, &threads, opts);
}

fn render_all_threads(out: &mut String, dump: &ThreadDump, opts: &ReportOptions) {
    out.push_str("\n=== All Threads ===\n");
    let all: Vec<&ThreadInfo> = dump.threads.iter().collect();
    render_detail_list(out, &all, opts);
}

fn render_detail_list(out: &mut String, threads: &[&ThreadInfo], opts: &ReportOptions) {
    for thread in threads {
        render_thread_details(out, thread, opts);
        out.push_str(SEPARATOR);
        out.push('\n');
    }
}

fn render_thread_details(out: &mut String, thread: &ThreadInfo, opts: &ReportOptions) {
    out.push_str(&format!("\nThread: {}\n", thread.name));
    out.push_str(&format!("State: {}\n", thread.status));
    if let Some(cpu) = thread.cpu_time_ms {
        out.push_str(&format!("CPU Time: {:.2}ms\n", cpu));
    }
    if let Some(waiting_on) = &thread.waiting_on {
        out.push_str(&format!("Waiting on: {}\n", waiting_on));
    }
    if !thread.locked_synchronizers.is_empty() {
        out.push_str("Locked synchronizers:\n");
        for lock in &thread.locked_synchronizers {
            out.push_str(&format!("  {}\n", lock));
        }
    }
    if !thread.locked_ownables.is_empty() {
        out.push_str("Locked ownables:\n");
        for lock in &thread.locked_ownables {
            out.push_str(&format!("  {}\n", lock));
        }
    }
    if !thread.stack_trace.is_empty() {
        out.push_str("Stack trace:\n");
        render_stack(out, &thread.stack_trace, "  ", opts);
    }
}

fn render_stack(out: &mut String, trace: &[String], indent: &str, opts: &ReportOptions) {
    let shown = if opts.full_stack {
        trace.len()
    } else {
        opts.stack_preview.min(trace.len())
    };
    for frame in &trace[..shown] {
        out.push_str(indent);
        out.push_str(frame);
        out.push('\n');
    }
    if shown < trace.len() {
        out.push_str(&format!(
            "{}... ({} more lines)\n",
            indent,
            trace.len() - shown
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::model::{Deadlock, LockRef, ThreadInfo, ThreadStatus, WaitEntry};

    fn thread(name: &str, status: ThreadStatus) -> ThreadInfo {
        ThreadInfo {
            name: name.to_string(),
            status,
            ..ThreadInfo::default()
        }
    }

    #[test]
    fn test_empty_model_renders_no_threads_message() {
        let dump = ThreadDump::default();
        assert_eq!(
            render_report(&dump, &ReportOptions::default()),
            "No threads found in the dump file.\n"
        );
    }

    #[test]
    fn test_state_summary_section_layout() {
        let dump = ThreadDump {
            threads: vec![
                thread("a", ThreadStatus::Runnable),
                thread("b", ThreadStatus::Blocked),
            ],
            ..ThreadDump::default()
        };
        let report = render_report(&dump, &ReportOptions::default());
        assert!(report.contains("\n=== Thread State Summary ===\n"));
        assert!(report.contains("BLOCKED: 1 thread(s)\n"));
        assert!(report.contains("RUNNABLE: 1 thread(s)\n"));
        assert!(report.contains("Total Threads: 2\n"));
    }

    #[test]
    fn test_stack_truncation_and_ellipsis() {
        let mut t = thread("deep", ThreadStatus::Runnable);
        t.stack_trace = (0..5).map(|i| format!("frame{}", i)).collect();
        let dump = ThreadDump {
            threads: vec![t],
            ..ThreadDump::default()
        };

        let opts = ReportOptions {
            runnable_only: true,
            ..ReportOptions::default()
        };
        let report = render_report(&dump, &opts);
        assert!(report.contains("  frame0\n  frame1\n  frame2\n  ... (2 more lines)\n"));
        assert!(!report.contains("frame3"));

        let full = ReportOptions {
            runnable_only: true,
            full_stack: true,
            ..ReportOptions::default()
        };
        let report = render_report(&dump, &full);
        assert!(report.contains("frame4"));
        assert!(!report.contains("more lines"));
    }

    #[test]
    fn test_runnable_only_suppresses_other_sections() {
        let mut blocked = thread("b", ThreadStatus::Blocked);
        blocked.waiting_on = Some(LockRef {
            id: "0x01".to_string(),
            class_name: "java.lang.Object".to_string(),
        });
        let dump = ThreadDump {
            threads: vec![thread("r", ThreadStatus::Runnable), blocked],
            ..ThreadDump::default()
        };

        let opts = ReportOptions {
            runnable_only: true,
            ..ReportOptions::default()
        };
        let report = render_report(&dump, &opts);
        assert!(report.contains("=== RUNNABLE Threads ==="));
        assert!(!report.contains("=== Blocked Threads ==="));
        assert!(!report.contains("=== Waiting Threads ==="));
    }

    #[test]
    fn test_deadlock_narrative_renders_edges_and_raw_text() {
        let dump = ThreadDump {
            threads: vec![{
                let mut t = thread("T1", ThreadStatus::Blocked);
                t.stack_trace = vec!["com.example.A.run(A.java:1)".to_string()];
                t
            }],
            deadlocks: vec![Deadlock {
                participants: vec!["T1".to_string(), "T2".to_string()],
                wait_graph: vec![
                    WaitEntry {
                        thread: "T1".to_string(),
                        waiting_for: Some("0x01".to_string()),
                        holding: Some("0x02".to_string()),
                    },
                    WaitEntry {
                        thread: "T2".to_string(),
                        waiting_for: Some("0x02".to_string()),
                        holding: None,
                    },
                ],
                raw_description: "Found 1 Java-level deadlock:\nsection text".to_string(),
            }],
            truncated_deadlock: false,
        };

        let report = render_report(&dump, &ReportOptions::default());
        assert!(report.contains("\nDeadlock #1:\n"));
        assert!(report.contains("  T1:\n"));
        assert!(report.contains("    - Waiting for lock: <0x01>\n"));
        assert!(report.contains("    - Holding lock: <0x02>\n"));
        assert!(report.contains("      com.example.A.run(A.java:1)\n"));
        // The partially observed edge renders without a holding line.
        assert!(report.contains("  T2:\n    - Waiting for lock: <0x02>\n\n"));
        assert!(report.contains("\nFull deadlock description:\nFound 1 Java-level deadlock:\nsection text\n"));
    }

    #[test]
    fn test_truncated_deadlock_warning_is_visible() {
        let dump = ThreadDump {
            threads: vec![thread("a", ThreadStatus::Runnable)],
            deadlocks: Vec::new(),
            truncated_deadlock: true,
        };
        let report = render_report(&dump, &ReportOptions::default());
        assert!(report.starts_with("Warning: dump ended inside a deadlock section"));
    }

    #[test]
    fn test_verbose_appends_all_threads_section() {
        let dump = ThreadDump {
            threads: vec![thread("only", ThreadStatus::New)],
            ..ThreadDump::default()
        };
        let quiet = render_report(&dump, &ReportOptions::default());
        assert!(!quiet.contains("=== All Threads ==="));

        let verbose = ReportOptions {
            verbose: true,
            ..ReportOptions::default()
        };
        let report = render_report(&dump, &verbose);
        assert!(report.contains("=== All Threads ===\n\nThread: only\nState: NEW\n"));
    }
}
