//! Cache simulator CLI.
//!
//! This binary drives the cache model over a memory access trace. It provides:
//! 1. **Sweep:** Replay one trace against a grid of cache shapes and write one report row per shape.
//! 2. **Run:** Replay one trace against a single shape and print its statistics.
//!
//! Logging goes to stderr through `tracing`; set `RUST_LOG` or pass `-v`/`-vv`.

use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use cachesim_core::cache::CacheSim;
use cachesim_core::config::{Associativity, CacheConfig, SweepConfig, WritePolicy};
use cachesim_core::sim::{ReportFormat, ReportRow, load_trace, run_sweep, write_report};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven set-associative cache simulator",
    long_about = "Replay a memory access trace against one or many cache shapes and report hit rates and memory traffic.\n\nTrace lines are `<read|write> <hex address>`.\n\nExamples:\n  cachesim sweep\n  cachesim sweep --trace app.trace --output app.result --format json\n  cachesim run --trace app.trace --size 8192 --block 32 --assoc 4 --policy wt"
)]
struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug, -vvv for per-access trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate every shape of a sweep grid (the built-in grid unless --config is given).
    Sweep {
        /// Trace file to replay.
        #[arg(short, long, default_value = "test.trace")]
        trace: PathBuf,

        /// Report destination.
        #[arg(short, long, default_value = "test.result")]
        output: PathBuf,

        /// JSON sweep grid; omitted fields use the built-in grid.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report encoding (text or json).
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,
    },

    /// Simulate a single cache shape and print its statistics.
    Run {
        /// Trace file to replay.
        #[arg(short, long)]
        trace: PathBuf,

        /// Total cache size in bytes.
        #[arg(short, long)]
        size: usize,

        /// Block size in bytes.
        #[arg(short, long)]
        block: usize,

        /// Associativity: a way count, `dm`, or `fa`.
        #[arg(short, long, default_value = "dm")]
        assoc: Associativity,

        /// Write policy: `wb` or `wt`.
        #[arg(short, long, default_value = "wb")]
        policy: WritePolicy,

        /// Output encoding (text or json).
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Sweep {
            trace,
            output,
            config,
            format,
        } => cmd_sweep(&trace, &output, config, format),
        Commands::Run {
            trace,
            size,
            block,
            assoc,
            policy,
            format,
        } => cmd_run(&trace, CacheConfig::new(size, block, assoc, policy), format),
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        eprintln!("[!] FATAL: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("    caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs the sweep grid over the trace and writes the report to `output`.
fn cmd_sweep(
    trace_path: &Path,
    output: &Path,
    config: Option<PathBuf>,
    format: ReportFormat,
) -> Result<(), Box<dyn Error>> {
    let sweep = match config {
        Some(path) => SweepConfig::from_json_file(path)?,
        None => SweepConfig::default(),
    };
    let trace = load_trace(trace_path)?;

    let rows = run_sweep(&sweep, &trace);

    let file = File::create(output)?;
    write_report(BufWriter::new(file), &rows, format)?;

    println!("Success");
    Ok(())
}

/// Runs one shape over the trace and prints its report row to stdout.
fn cmd_run(
    trace_path: &Path,
    config: CacheConfig,
    format: ReportFormat,
) -> Result<(), Box<dyn Error>> {
    let mut cache = CacheSim::new(&config)?;
    let trace = load_trace(trace_path)?;
    cache.replay(&trace);

    let row = ReportRow::from_cache(&cache);
    write_report(io::stdout().lock(), std::slice::from_ref(&row), format)?;
    if format == ReportFormat::Text {
        cache.stats().print();
    }
    Ok(())
}
