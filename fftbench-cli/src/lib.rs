#![warn(missing_docs)]
//! fftbench CLI Library
//!
//! Command-line shell around the sweep engine. Use [`run`] for the built-in
//! cases, or [`run_with_registry`] to benchmark your own implementations
//! with the same command-line experience.
//!
//! # Example
//!
//! ```ignore
//! use fftbench_cli::run_with_registry;
//! use fftbench_core::CaseRegistry;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut registry = CaseRegistry::new();
//!     registry.register_transform(MyFft::default())?;
//!     run_with_registry(registry)
//! }
//! ```

mod cases;
mod config;
mod executor;
mod interrupt;
mod metadata;

pub use cases::{NAIVE_DFT_MAX_SIZE, NaiveDft, Radix2, builtin_registry};
pub use config::*;
pub use executor::{Execution, execute};
pub use metadata::build_run_meta;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fftbench_core::{CaseRegistry, SweepPlan, WorkerOptions};
use fftbench_report::{
    OutputFormat, RunDocument, RunStatus, generate_csv_report, generate_json_report, render,
};
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// fftbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "fftbench")]
#[command(author, version, about = "fftbench - compare FFT implementations across input sizes")]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Only sweep cases whose name matches this regex
    #[arg(default_value = ".*")]
    pub filter: String,

    /// First size exponent (size = 2^exponent)
    #[arg(long)]
    pub from: Option<u32>,

    /// Last size exponent, inclusive
    #[arg(long)]
    pub to: Option<u32>,

    /// Transform calls timed per size
    #[arg(long, short = 'r')]
    pub repeat: Option<u32>,

    /// Leave a case out of the sweep (repeatable)
    #[arg(long = "disable", value_name = "CASE")]
    pub disable: Vec<String>,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pin the sweep worker to this CPU core
    #[arg(long)]
    pub pin_cpu: Option<usize>,

    /// Configuration file (default: discover fftbench.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered cases and whether they will run
    List,
    /// Run the sweep (default)
    Run,
    /// Print a default fftbench.toml
    Init,
}

/// Run the fftbench CLI over the built-in cases.
pub fn run() -> anyhow::Result<()> {
    run_with_registry(builtin_registry()?)
}

/// Run the fftbench CLI over `registry`, parsing arguments from the
/// process command line.
pub fn run_with_registry(registry: CaseRegistry) -> anyhow::Result<()> {
    run_with_cli(Cli::parse(), registry)
}

/// Run the fftbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli, registry: CaseRegistry) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    if let Some(Commands::Init) = cli.command {
        print!("{}", FftbenchConfig::default_toml());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let registry = select_cases(&cli, &config, registry)?;

    match cli.command {
        Some(Commands::List) => list_cases(&registry),
        _ => run_sweep(&cli, &config, registry),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "fftbench=debug" } else { "fftbench=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded; keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> anyhow::Result<FftbenchConfig> {
    match &cli.config {
        Some(path) => FftbenchConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => match FftbenchConfig::discover() {
            Some(loaded) => loaded.context("failed to load discovered fftbench.toml"),
            None => {
                debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                Ok(FftbenchConfig::default())
            }
        },
    }
}

/// Apply config/CLI disables and the name filter to `registry`.
fn select_cases(
    cli: &Cli,
    config: &FftbenchConfig,
    mut registry: CaseRegistry,
) -> anyhow::Result<CaseRegistry> {
    for name in config.sweep.disabled.iter().chain(&cli.disable) {
        registry.set_enabled(name, false)?;
    }

    let filter = Regex::new(&cli.filter)
        .with_context(|| format!("invalid case filter '{}'", cli.filter))?;
    registry.retain_matching(&filter);
    debug!(
        enabled = registry.enabled_count(),
        registered = registry.len(),
        filter = %cli.filter,
        "cases selected"
    );

    Ok(registry)
}

/// Layer the sweep plan: built-in defaults → fftbench.toml → CLI flags.
fn build_plan(cli: &Cli, config: &FftbenchConfig) -> anyhow::Result<SweepPlan> {
    let start = cli.from.unwrap_or(config.sweep.start_exponent);
    let end = cli.to.unwrap_or(config.sweep.end_exponent);
    let repeat = cli.repeat.unwrap_or(config.sweep.repeat);
    Ok(SweepPlan::new(start, end, repeat)?)
}

fn list_cases(registry: &CaseRegistry) -> anyhow::Result<()> {
    println!("fftbench cases:");
    for case in registry.iter() {
        let state = if case.is_enabled() { "enabled" } else { "disabled" };
        println!("├── {} [{}]", case.name(), state);
    }
    println!(
        "{} cases registered, {} enabled.",
        registry.len(),
        registry.enabled_count()
    );
    Ok(())
}

fn run_sweep(cli: &Cli, config: &FftbenchConfig, registry: CaseRegistry) -> anyhow::Result<()> {
    let plan = build_plan(cli, config)?;

    let format_name = cli.format.as_deref().unwrap_or(&config.output.format);
    let format: OutputFormat = format_name.parse()?;
    let output = cli.output.clone().or_else(|| config.output.path.clone());

    if registry.enabled_count() == 0 {
        println!("No cases selected.");
        return Ok(());
    }

    let options = WorkerOptions {
        pin_cpu: cli.pin_cpu.or(config.runner.pin_cpu),
    };

    interrupt::install();

    eprintln!(
        "Sweeping {} cases over n = 2^{}..2^{}, {} calls per size...",
        registry.enabled_count(),
        plan.start_exponent(),
        plan.end_exponent(),
        plan.repeat()
    );

    let execution = execute(registry, plan, options, !cli.no_progress);
    interrupt::restore();
    let execution = execution?;
    info!(status = ?execution.status, steps = execution.steps, "sweep finished");

    let text = match format {
        OutputFormat::Human => render(&execution.report),
        OutputFormat::Csv => generate_csv_report(&execution.report),
        OutputFormat::Json => {
            let document =
                RunDocument::new(build_run_meta(&plan), execution.status, execution.report.clone());
            generate_json_report(&document)?
        }
    };
    write_output(output.as_deref(), &text)?;

    match execution.status {
        RunStatus::Completed => Ok(()),
        RunStatus::Cancelled => {
            eprintln!(
                "Sweep cancelled after {}/{} steps; report is partial.",
                execution.steps, execution.total_steps
            );
            Ok(())
        }
        RunStatus::Faulted => match execution.fault {
            Some(fault) => Err(fault.into()),
            None => Err(anyhow::anyhow!("sweep faulted")),
        },
    }
}

fn write_output(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
