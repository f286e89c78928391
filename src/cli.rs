//! CLI arguments and subcommands for herakles-threaddump-analyzer.
//!
//! This module defines the command-line interface structure using the clap
//! library, including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "herakles-threaddump-analyzer",
    about = "JVM thread dump analyzer for deadlock detection and CPU/thread-state triage",
    long_about = "JVM thread dump analyzer for deadlock detection and CPU/thread-state triage.\n\n\
                  Parses jstack-style thread dumps into a structured model, cross-references \
                  reported deadlock cycles against per-thread lock ownership, and prints \
                  state, CPU and blocking summaries.",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version = "0.1.0",
    propagate_version = true,
    after_help = "Project: https://github.com/cansp-dev/herakles-threaddump-analyzer — More info: https://www.herakles.now — Support: exporter@herakles.now"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the thread dump file to analyze
    pub file: Option<PathBuf>,

    /// Show detailed information for all threads
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Show only RUNNABLE threads
    #[arg(short = 'r', long)]
    pub runnable: bool,

    /// Show full stack traces instead of truncated ones
    #[arg(short = 'f', long)]
    pub full_stack: bool,

    /// Number of threads shown in the CPU consumers section
    #[arg(long)]
    pub top_cpu: Option<usize>,

    /// Log level (logs go to stderr; the report itself goes to stdout)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate that a dump file parses cleanly and print model statistics
    Check {
        /// Path to the thread dump file
        file: PathBuf,
    },

    /// Generate a synthetic thread dump file for testing
    GenerateTestdata {
        /// Output file path
        #[arg(short = 'o', long, default_value = "testdump.txt")]
        output: PathBuf,

        /// Number of worker threads to generate
        #[arg(long, default_value_t = 16)]
        threads: usize,

        /// Include a two-thread deadlock cycle
        #[arg(long)]
        with_deadlock: bool,
    },
}
