//! Analyze command implementation.
//!
//! The default command: parse a dump file, correlate deadlocks, and print
//! the report selected by the CLI flags.

use std::path::Path;

use tracing::debug;

use crate::cli::Args;
use crate::config::{Config, DEFAULT_STACK_PREVIEW, DEFAULT_TOP_CPU};
use crate::dump::{correlate_deadlocks, parse_file};
use crate::report::{render_report, ReportOptions};

/// Parses and analyzes a thread dump file, printing the report to stdout.
pub fn command_analyze(
    file: &Path,
    config: &Config,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dump = parse_file(file)?;
    correlate_deadlocks(&mut dump);

    debug!(
        "parsed {} thread(s), {} deadlock(s) from {}",
        dump.threads.len(),
        dump.deadlocks.len(),
        file.display()
    );

    let opts = report_options(config, args);
    print!("{}", render_report(&dump, &opts));
    Ok(())
}

/// Merges CLI flags and config into rendering options. Flags alter only
/// which views are rendered and their verbosity, never parsing.
fn report_options(config: &Config, args: &Args) -> ReportOptions {
    ReportOptions {
        verbose: args.verbose,
        runnable_only: args.runnable,
        full_stack: args.full_stack,
        top_cpu: config.top_cpu.unwrap_or(DEFAULT_TOP_CPU),
        stack_preview: config.stack_preview_frames.unwrap_or(DEFAULT_STACK_PREVIEW),
    }
}
