//! Thread dump ingestion: line classification, single-pass parsing, and
//! deadlock correlation. Data flows one direction — text in, finished
//! `ThreadDump` out — and the model is read-only once `correlate_deadlocks`
//! has run.

pub mod correlate;
pub mod line;
pub mod model;
pub mod parser;

pub use correlate::correlate_deadlocks;
pub use model::{Deadlock, LockRef, ThreadDump, ThreadInfo, ThreadStatus, WaitEntry};
pub use parser::{parse_file, parse_str, DumpError};
