//! Deadlock cross-referencing.
//!
//! The deadlock section reports which lock each participant is waiting for;
//! the per-thread detail section reports which locks each thread holds.
//! The two use the same lock ids, so the holder side of every wait edge is
//! resolved here by lock id after parsing, as the final mutation before the
//! model is handed to the report layer.

use tracing::debug;

use crate::dump::model::{ThreadDump, ThreadInfo};

/// Fills in the `holding` side of every deadlock wait edge.
///
/// For each cycle, the contested lock ids are the wait targets of its
/// participants. A participant's held lock is the first of its locked
/// synchronizers that is contested within the same cycle; when none is, the
/// last held synchronizer is reported instead. Participants with no thread
/// record, or threads holding nothing, leave the edge partially observed —
/// that stays representable and displayable, never an error.
pub fn correlate_deadlocks(dump: &mut ThreadDump) {
    let ThreadDump {
        threads, deadlocks, ..
    } = dump;

    for deadlock in deadlocks.iter_mut() {
        let contested: Vec<String> = deadlock
            .wait_graph
            .iter()
            .filter_map(|e| e.waiting_for.clone())
            .collect();

        for entry in deadlock.wait_graph.iter_mut() {
            let Some(thread) = threads.iter().find(|t| t.name == entry.thread) else {
                debug!(
                    "deadlock participant {:?} has no thread record; edge left partial",
                    entry.thread
                );
                continue;
            };
            entry.holding = held_lock_id(thread, &contested);
        }
    }
}

fn held_lock_id(thread: &ThreadInfo, contested: &[String]) -> Option<String> {
    let held = &thread.locked_synchronizers;
    held.iter()
        .find(|lock| contested.iter().any(|c| *c == lock.id))
        .or_else(|| held.last())
        .map(|lock| lock.id.clone())
}
