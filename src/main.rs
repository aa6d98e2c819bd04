//! Pulseboard server and CLI
//!
//! Run with: cargo run -- serve
//!
//! # Configuration
//!
//! Looks for a TOML config in the usual places (`./pulseboard.toml`,
//! `~/.config/pulseboard/config.toml`, `/etc/pulseboard/config.toml`).
//! Environment variables override file settings:
//! - `PULSEBOARD_CSV_PATH`: CSV file to watch
//! - `PULSEBOARD_SERIES_NAME`: display name of the series
//! - `PULSEBOARD_API_HOST` / `PULSEBOARD_API_PORT`: bind address
//! - `PULSEBOARD_POLL_INTERVAL_MS`: CSV poll interval
//! - `PULSEBOARD_LOG_LEVEL` / `PULSEBOARD_LOG_FORMAT`: logging
//! - `RUST_LOG`: overrides everything else for log filtering

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulseboard::api::{serve, AppState};
use pulseboard::config::{generate_default_config, Config};
use pulseboard::ingest::{CsvSource, SourceWatcher, WatcherConfig};
use pulseboard::live::{HubConfig, LiveHub};
use pulseboard::report::{DailyReport, DayNavigator};
use pulseboard::series::{SeriesFrame, SeriesStore};

#[derive(Parser)]
#[command(name = "pulseboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live dashboard over an append-only CSV time series")]
struct Cli {
    /// Path to a TOML config file (default: probe standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// CSV file to read (overrides config)
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard server (default)
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the daily report for a date
    Report {
        /// Day to report on, YYYY-MM-DD (default: today, UTC)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Parse the CSV and report row statistics
    Check,

    /// Generate a default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(csv) = &cli.csv {
        config.series.csv_path = csv.display().to_string();
    }

    init_logging(&config);

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.api.host = host;
            }
            if let Some(port) = port {
                config.api.port = port;
            }
            run_server(config).await
        }
        Commands::Report { date } => run_report(&config, date.as_deref()),
        Commands::Check => run_check(&config),
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing config to {}", path.display()))?;
                    println!("Wrote default config to {}", path.display());
                }
                None => print!("{content}"),
            }
            Ok(())
        }
    }
}

/// Run the dashboard server until interrupted.
async fn run_server(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting Pulseboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Watching CSV: {}", config.series.csv_path);
    tracing::info!("Series: {} ({})", config.series.name, config.series.format);

    let hub = Arc::new(LiveHub::new(HubConfig {
        max_connections: config.api.max_ws_connections,
        ..HubConfig::default()
    }));
    let store = Arc::new(SeriesStore::new(
        config.series.profile(),
        Arc::clone(&hub),
    ));

    let source = CsvSource::new(&config.series.csv_path);
    let mut watcher = SourceWatcher::new(
        Box::new(source),
        Arc::clone(&store),
        WatcherConfig {
            poll_interval: Duration::from_millis(config.watcher.poll_interval_ms),
            max_backoff: Duration::from_secs(config.watcher.max_backoff_secs),
        },
    );

    // Initial load before serving; a missing file is not fatal, the
    // watcher keeps trying.
    match watcher.run_once().await {
        Ok(loaded) => tracing::info!(loaded, "Initial CSV load complete"),
        Err(e) => tracing::warn!(error = %e, "Initial CSV load failed, will retry"),
    }
    let watch_handle = watcher.spawn();

    let state = AppState::new(Arc::clone(&store), hub);
    serve(state, &config.api).await?;

    watch_handle.abort();
    tracing::info!("Pulseboard stopped");
    Ok(())
}

/// Print the daily report for a date to stdout.
fn run_report(config: &Config, date: Option<&str>) -> anyhow::Result<()> {
    let frame = load_frame(&config.series.csv_path)?;

    let date = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))?,
        None => Utc::now().date_naive(),
    };

    let samples = frame.day_slice(date);
    match DailyReport::compute(date, samples) {
        Some(report) => {
            println!("{}", report.render_text(&config.series.profile()));

            let navigator = DayNavigator::new(frame.available_days(), date);
            if let Some(prev) = navigator.peek_prev() {
                println!("previous day with data: {prev}");
            }
            if let Some(next) = navigator.peek_next() {
                println!("next day with data: {next}");
            }
        }
        None => println!("No data available for {date}."),
    }

    Ok(())
}

/// Parse the CSV and print row statistics.
fn run_check(config: &Config) -> anyhow::Result<()> {
    let path = &config.series.csv_path;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading CSV file {path}"))?;

    let (samples, stats) = CsvSource::parse_str(&content);
    let frame = SeriesFrame::from_samples(samples);

    println!("{path}:");
    println!("  rows read:    {}", stats.rows_read());
    println!("  rows parsed:  {}", stats.rows_parsed);
    println!("  rows dropped: {}", stats.rows_dropped);
    println!("  samples:      {} (after dedup)", frame.len());

    if let (Some(first), Some(last)) = (frame.earliest(), frame.latest()) {
        println!("  span:         {} .. {}", first.date(), last.date());
        println!("  days:         {}", frame.available_days().len());
    }

    Ok(())
}

/// Load the whole CSV into a frame for one-shot subcommands.
fn load_frame(path: &str) -> anyhow::Result<SeriesFrame> {
    let content = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("reading CSV file {path}"))?;
    let (samples, _stats) = CsvSource::parse_str(&content);
    Ok(SeriesFrame::from_samples(samples))
}

/// Initialize tracing from config, with RUST_LOG taking precedence.
fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "pulseboard={},tower_http=warn",
            config.logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
