//! Check command implementation.
//!
//! Validates that a dump file parses cleanly and prints model statistics,
//! including conditions the analyze report only warns about.

use std::path::Path;

use crate::config::Config;
use crate::dump::{correlate_deadlocks, parse_file};
use crate::report::state_summary;

/// Parses a dump file and reports what the model contains.
pub fn command_check(file: &Path, _config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Herakles Thread Dump Analyzer - Dump Check");
    println!("==============================================");

    let mut dump = parse_file(file)?;
    correlate_deadlocks(&mut dump);

    let mut all_ok = true;

    println!("\n📁 File: {}", file.display());

    if dump.is_empty() {
        println!("   ⚠️  No threads found in the dump file");
    } else {
        let summary = state_summary(&dump);
        println!("   ✅ Parsed {} thread(s)", summary.total);
        for (state, count) in &summary.counts {
            println!("      ├─ {}: {}", state, count);
        }
        let unreported = summary.total - summary.counts.iter().map(|(_, c)| c).sum::<usize>();
        if unreported > 0 {
            println!("      └─ (no state line): {}", unreported);
        }
    }

    if dump.deadlocks.is_empty() {
        println!("   ✅ No deadlocks reported");
    } else {
        println!("   ⚠️  {} deadlock cycle(s) reported", dump.deadlocks.len());
        for (i, deadlock) in dump.deadlocks.iter().enumerate() {
            if deadlock.is_fully_correlated() {
                println!(
                    "      ├─ Deadlock #{}: {} participant(s), fully correlated",
                    i + 1,
                    deadlock.participants.len()
                );
            } else {
                println!(
                    "      ├─ Deadlock #{}: {} participant(s), partially observed",
                    i + 1,
                    deadlock.participants.len()
                );
                all_ok = false;
            }
        }
    }

    if dump.truncated_deadlock {
        println!("   ❌ Dump ended inside a deadlock section (truncated input)");
        all_ok = false;
    }

    if all_ok {
        println!("\n✅ Dump parsed cleanly");
    } else {
        println!("\n⚠️  Dump parsed with warnings (see above)");
    }

    Ok(())
}
