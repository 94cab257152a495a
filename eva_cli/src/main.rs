//! # eva
//!
//! Line-at-a-time evaluator for `+`, `*` and parenthesised integer expressions.

use clap::Parser;
use eva_cli::{open_input, run, write_summary, RunOptions, STDIN_SOURCE};
use eva_compiler::config::{LogLevel, RuntimeConfig};
use eva_compiler::{log_info, logging, pipeline};
use std::io;
use std::path::PathBuf;

/// Evaluates one arithmetic statement per input line.
///
/// Each line is terminated with `;` before evaluation. Results are printed to
/// stdout followed by a blank line; errors go to stderr and the next line is
/// read.
#[derive(Parser, Debug)]
#[command(name = "eva", version, about, long_about = None)]
struct Cli {
    /// Read statements from a file instead of standard input.
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Print the syntax tree of each statement to stderr before its result.
    #[arg(long)]
    show_tree: bool,

    /// Enable diagnostics on stderr at the given level (error, warn, info, debug).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Emit diagnostics as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Print a session summary to stderr when input ends.
    #[arg(long)]
    summary: bool,

    /// Load preferences from a TOML file; flags still take precedence.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Describe the pipeline, its build limits and the logging setup, then exit.
    #[arg(long)]
    info: bool,
}

impl Cli {
    fn runtime_config(&self) -> Result<RuntimeConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => RuntimeConfig::load_from_file(path)?,
            None => RuntimeConfig::default(),
        };

        if self.show_tree {
            config.session.show_tree = true;
        }
        if self.summary {
            config.session.print_summary = true;
        }
        if let Some(level) = self.log_level {
            config.logging.enable_console_logging = true;
            config.logging.min_log_level = level;
        }
        if self.json_logs {
            config.logging.enable_console_logging = true;
            config.logging.use_structured_logging = true;
        }

        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = cli.runtime_config()?;
    let json_summary = config.logging.use_structured_logging;

    logging::config::init_runtime_preferences(config.logging.clone())?;

    if cli.info {
        println!("{}", pipeline::get_pipeline_info().report());
        println!();
        println!("{}", logging::get_system_diagnostics());
        return Ok(());
    }

    logging::init_global_logging()?;
    pipeline::validate_pipeline()?;

    log_info!("eva starting", "pipeline" => pipeline::get_pipeline_info().summary());

    let source_name = cli
        .file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| STDIN_SOURCE.to_string());

    let input = open_input(cli.file.as_deref()).unwrap_or_else(|e| {
        eprintln!("Failed to open the input file '{}': {}", source_name, e);
        std::process::exit(1);
    });

    let options = RunOptions::new(config, source_name);
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let stats = match run(input, &mut out, &mut err, &options) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Session aborted reading '{}': {}", options.source_name, e);
            std::process::exit(1);
        }
    };

    if options.print_summary() {
        write_summary(&mut err, &stats, json_summary)?;
    }

    Ok(())
}
