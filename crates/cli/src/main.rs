//! Experiment controller CLI.
//!
//! This binary drives the controller model from the command line. It provides:
//! 1. **Script run:** Play a host command script and print every response with its cycle.
//! 2. **Config check:** Load and validate a JSON configuration without running anything.

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use expctl_core::config::Config;
use expctl_core::sim::{Simulator, parse_script};
use expctl_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "expctl",
    author,
    version,
    about = "Fixed-latency experiment command controller",
    long_about = "Simulate the experiment command controller against a register-file experiment.\n\nExamples:\n  expctl run scripts/step.txt\n  expctl run scripts/step.txt --config lab.json --stats summary commands\n  expctl check-config lab.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a host command script and print the responses.
    Run {
        /// Script path (one command per line).
        script: PathBuf,

        /// JSON configuration file; built-in defaults when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override `general.max_cycles`.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Statistics sections to print after the run (summary, commands, clocking).
        #[arg(long, num_args = 0.., value_parser = clap::builder::PossibleValuesParser::new(STATS_SECTIONS))]
        stats: Option<Vec<String>>,
    },

    /// Validate a JSON configuration file.
    CheckConfig {
        /// Configuration file path.
        path: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            script,
            config,
            max_cycles,
            stats,
        } => cmd_run(&script, config.as_deref(), max_cycles, stats.as_deref()),
        Commands::CheckConfig { path } => cmd_check_config(&path),
    }
}

/// Loads the configuration, parses the script, and runs it to completion.
///
/// Prints one line per response. Exits with code 1 on any configuration,
/// script, or simulation error.
fn cmd_run(
    script: &Path,
    config_path: Option<&Path>,
    max_cycles: Option<u64>,
    stats: Option<&[String]>,
) {
    let mut config = match config_path {
        Some(path) => {
            let config = Config::from_file(path).unwrap_or_else(|e| fatal(&e));
            info!(path = %path.display(), "configuration loaded");
            config
        }
        None => Config::default(),
    };
    if let Some(limit) = max_cycles {
        config.general.max_cycles = limit;
    }

    let text = fs::read_to_string(script).unwrap_or_else(|e| {
        fatal(&format!("could not read script '{}': {e}", script.display()))
    });
    let items = parse_script(&text).unwrap_or_else(|e| fatal(&e));
    info!(script = %script.display(), items = items.len(), "script parsed");

    let mut sim = Simulator::new(&config);
    let report = sim.run(&items).unwrap_or_else(|e| {
        sim.stats().print();
        fatal(&e)
    });

    for record in &report.responses {
        println!("[{:>8}] {:#018x}  {}", record.cycle, record.word, record.response);
    }
    println!(
        "\n[*] {} command(s), {} response(s), {} cycle(s)",
        report.sent,
        report.responses.len(),
        report.cycles
    );

    if let Some(sections) = stats {
        sim.stats().print_sections(sections);
    }
}

/// Validates a configuration file and prints its word layout.
fn cmd_check_config(path: &Path) {
    let config = Config::from_file(path).unwrap_or_else(|e| fatal(&e));
    let layout = &config.protocol.layout;
    println!("[*] {} is valid", path.display());
    println!("  word_width  {}", layout.word_width);
    for (name, range) in layout.fields() {
        println!("  {name:<10}  [{}:{}]", range.high, range.low);
    }
    println!("  step_policy {:?}", config.controller.step_policy);
}

fn fatal(err: &dyn std::fmt::Display) -> ! {
    eprintln!("\n[!] FATAL: {err}");
    process::exit(1);
}
