//! herakles-threaddump-analyzer - version 0.1.0
//!
//! JVM thread dump analyzer with tracing logging. This is the main entry
//! point that resolves configuration and dispatches subcommands.

use clap::Parser;
use tracing::{debug, Level};

use herakles_threaddump_analyzer::cli::{Args, Commands, LogLevel};
use herakles_threaddump_analyzer::commands::{
    command_analyze, command_check, command_generate_testdata,
};
use herakles_threaddump_analyzer::config::{
    resolve_config, show_config, validate_effective_config,
};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr: stdout carries the report itself.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    debug!("Logging initialized with level: {:?}", args.log_level);
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format.clone());
    }

    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    match &args.command {
        Some(Commands::Check { file }) => command_check(file, &config),

        Some(Commands::GenerateTestdata {
            output,
            threads,
            with_deadlock,
        }) => command_generate_testdata(output.clone(), *threads, *with_deadlock),

        None => {
            let Some(file) = &args.file else {
                return Err("a thread dump file path is required (see --help)".into());
            };
            command_analyze(file, &config, args)
        }
    }
}

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
