//! Single-pass thread dump parser.
//!
//! Consumes lines in order and incrementally builds the `ThreadDump` model.
//! The parse mode is an explicit state-machine variant: the deadlock section
//! takes precedence while active, and the current thread block is addressed
//! by index instead of an ambient cursor.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::dump::line::{classify, quoted_name, Line, ThreadHeader};
use crate::dump::model::{Deadlock, ThreadDump, ThreadInfo, WaitEntry};

/// Fatal input error. Content-level anomalies never produce one of these;
/// only a missing or unreadable file does.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("could not read thread dump file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A deadlock section being accumulated, finalized only by the blank line
/// that terminates it.
#[derive(Debug)]
struct PendingDeadlock {
    raw_lines: Vec<String>,
    participants: Vec<String>,
    wait_graph: Vec<WaitEntry>,
}

impl PendingDeadlock {
    fn new(start_line: &str) -> PendingDeadlock {
        PendingDeadlock {
            raw_lines: vec![start_line.to_string()],
            participants: Vec::new(),
            wait_graph: Vec::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        self.raw_lines.push(line.to_string());

        if let Some(name) = quoted_name(line) {
            if !self.participants.iter().any(|p| p == name) {
                self.participants.push(name.to_string());
                self.wait_graph.push(WaitEntry::new(name));
            }
        }

        // The section always names a thread and then reports its wait target
        // on the following line, so the match attaches to the most recently
        // added participant.
        if let Some(Line::WaitingToLock(lock)) = classify(line) {
            if let Some(entry) = self.wait_graph.last_mut() {
                entry.waiting_for = Some(lock.id);
            }
        }
    }

    fn finalize(self) -> Deadlock {
        Deadlock {
            participants: self.participants,
            wait_graph: self.wait_graph,
            raw_description: self.raw_lines.join("\n"),
        }
    }
}

/// Parse mode. Thread blocks are entered from the top level only; the
/// deadlock section is entered and exited independently and wins while
/// active.
#[derive(Debug)]
enum Mode {
    TopLevel,
    InThreadBlock { current: usize },
    InDeadlockSection { pending: PendingDeadlock },
}

struct Parser {
    dump: ThreadDump,
    mode: Mode,
}

impl Parser {
    fn new() -> Parser {
        Parser {
            dump: ThreadDump::default(),
            mode: Mode::TopLevel,
        }
    }

    fn feed(&mut self, raw_line: &str) {
        let line = raw_line.trim_end();

        if matches!(self.mode, Mode::InDeadlockSection { .. }) {
            self.feed_deadlock_line(line);
            return;
        }

        match classify(line) {
            Some(Line::DeadlockStart { cycles }) => {
                debug!("deadlock report announces {} cycle(s)", cycles);
                self.mode = Mode::InDeadlockSection {
                    pending: PendingDeadlock::new(line),
                };
            }
            Some(Line::ThreadHeader(header)) => {
                self.dump.threads.push(thread_from_header(header));
                self.mode = Mode::InThreadBlock {
                    current: self.dump.threads.len() - 1,
                };
            }
            Some(attribute) => {
                if let Mode::InThreadBlock { current } = self.mode {
                    apply_attribute(&mut self.dump.threads[current], attribute);
                }
                // Attribute lines with no thread block are stray output
                // from sections we do not model; skip them.
            }
            None => {}
        }
    }

    /// Handles one line while the deadlock section is active. The blank
    /// line that terminates the section finalizes the pending deadlock and
    /// returns the parser to the top level.
    fn feed_deadlock_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            if let Mode::InDeadlockSection { pending } =
                std::mem::replace(&mut self.mode, Mode::TopLevel)
            {
                self.dump.deadlocks.push(pending.finalize());
            }
        } else if let Mode::InDeadlockSection { pending } = &mut self.mode {
            pending.push_line(line);
        }
    }

    fn finish(mut self) -> ThreadDump {
        if let Mode::InDeadlockSection { .. } = self.mode {
            warn!("dump ended inside a deadlock section; trailing deadlock report discarded");
            self.dump.truncated_deadlock = true;
        }
        self.dump
    }
}

fn thread_from_header(header: ThreadHeader) -> ThreadInfo {
    ThreadInfo {
        name: header.name,
        tid: header.tid,
        nid: header.nid,
        cpu_time_ms: header.cpu_time_ms,
        elapsed_seconds: header.elapsed_seconds,
        ..ThreadInfo::default()
    }
}

fn apply_attribute(thread: &mut ThreadInfo, attribute: Line) {
    match attribute {
        Line::ThreadState { status, .. } => thread.status = status,
        Line::StackFrame(frame) => thread.stack_trace.push(frame),
        Line::LockedSynchronizer(lock) => thread.locked_synchronizers.push(lock),
        Line::LockedOwnable(lock) => thread.locked_ownables.push(lock),
        Line::WaitingToLock(lock) => thread.waiting_on = Some(lock),
        Line::ThreadHeader(_) | Line::DeadlockStart { .. } => {
            unreachable!("handled before attribute dispatch")
        }
    }
}

/// Parses dump text into a model. Content-level anomalies (unmatched lines,
/// truncated sections) degrade gracefully; this function cannot fail.
pub fn parse_str(input: &str) -> ThreadDump {
    let mut parser = Parser::new();
    for line in input.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Reads and parses a dump file. A missing or unreadable file is the one
/// fatal error in the pipeline.
pub fn parse_file(path: &Path) -> Result<ThreadDump, DumpError> {
    let content = fs::read_to_string(path).map_err(|source| DumpError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_str(&content))
}
