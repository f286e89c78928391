//! Herakles Thread Dump Analyzer Library
//!
//! Parses jstack-style JVM thread dumps into a structured model and
//! produces categorized summaries: per-state counts, top CPU consumers,
//! blocking-category views, and deadlock narratives with cross-referenced
//! lock ownership.
//!
//! Processing is strictly one-directional and single-pass: the parser is
//! the only writer of the model, the correlator applies the final fill-in,
//! and every report view is a read-only projection.
//!
//! # Usage
//!
//! ```rust
//! use herakles_threaddump_analyzer::dump::{correlate_deadlocks, parse_str};
//! use herakles_threaddump_analyzer::report::state_summary;
//!
//! let text = "\"main\" #1 prio=5 os_prio=0 tid=0x00007f0000000001 nid=0x1a2b runnable  [0x00007f0000000002]\n\
//!             \x20  java.lang.Thread.State: RUNNABLE\n";
//!
//! let mut dump = parse_str(text);
//! correlate_deadlocks(&mut dump);
//!
//! let summary = state_summary(&dump);
//! assert_eq!(summary.total, 1);
//! assert_eq!(summary.counts, vec![("RUNNABLE".to_string(), 1)]);
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dump;
pub mod report;

// Re-export main types for convenience
pub use dump::{Deadlock, DumpError, ThreadDump, ThreadInfo, ThreadStatus};
pub use report::{render_report, ReportOptions};
