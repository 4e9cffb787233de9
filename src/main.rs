//! Espi-Watch main entry point
//!
//! This is the command-line interface for the incremental ESPI report poller.

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};
use espi_watch::checkpoint::read_checkpoint;
use espi_watch::config::{load_config, Config};
use espi_watch::output::{to_json, to_markdown};
use espi_watch::{Report, ReportWatcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Espi-Watch: reports published since the last check
///
/// Walks the per-day ESPI listing from the stored last-check timestamp up to
/// now, prints the new reports, and stores the new timestamp so the next run
/// only returns what was published in between.
#[derive(Parser, Debug)]
#[command(name = "espi-watch")]
#[command(version)]
#[command(about = "Incremental poller for ESPI disclosure reports", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Check from this timestamp instead of the stored one (e.g. 2015-09-14T00:00:00)
    #[arg(long, value_name = "TIMESTAMP")]
    since: Option<NaiveDateTime>,

    /// How to print new reports
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Keep running and check again every SECONDS
    #[arg(long, value_name = "SECONDS", conflicts_with = "show_checkpoint")]
    watch: Option<u64>,

    /// Print the stored last-check timestamp and exit
    #[arg(long)]
    show_checkpoint: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.show_checkpoint {
        show_checkpoint(Path::new(&config.checkpoint.path));
        return Ok(());
    }

    let mut watcher = ReportWatcher::from_config(&config)?;
    if let Some(since) = cli.since {
        tracing::info!("Checking from {} instead of the stored checkpoint", since);
        watcher.set_last_check(since);
    }

    match cli.watch {
        Some(seconds) => handle_watch(&mut watcher, seconds, cli.format).await,
        None => {
            let reports = watcher.reports_since_last_check().await;
            print_reports(&reports, cli.format)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("espi_watch=info,warn"),
            1 => EnvFilter::new("espi_watch=debug,info"),
            2 => EnvFilter::new("espi_watch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout carries only the reports
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --show-checkpoint mode
fn show_checkpoint(path: &Path) {
    println!("Checkpoint: {}", path.display());
    match read_checkpoint(path) {
        Ok(timestamp) => println!("Last check: {}", timestamp),
        Err(fault) => println!("No usable checkpoint ({})", fault),
    }
}

/// Handles the --watch mode: one check per interval until Ctrl-C
async fn handle_watch(
    watcher: &mut ReportWatcher,
    seconds: u64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let period = Duration::from_secs(seconds.max(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    tracing::info!("Checking for new reports every {:?}", period);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let reports = watcher.reports_since_last_check().await;
                if !reports.is_empty() {
                    print_reports(&reports, format)?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, last check at {}", watcher.last_check());
                return Ok(());
            }
        }
    }
}

fn print_reports(reports: &[Report], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(reports)?),
        OutputFormat::Markdown => print!("{}", to_markdown(reports)),
    }
    Ok(())
}
