//! # Pulseboard
//!
//! Live time-series dashboard over an append-only CSV. A collector writes
//! (timestamp, value) rows somewhere; Pulseboard watches the file, keeps a
//! sorted deduplicated series in memory, and serves a browser dashboard
//! with a live counter, a line chart, and navigable daily reports.
//!
//! ## Modules
//!
//! - [`series`]: the in-memory sample table and its shared store
//! - [`ingest`]: CSV source and the polling watcher
//! - [`report`]: daily open/close/variation reports and day navigation
//! - [`live`]: WebSocket push of ingested samples
//! - [`api`]: HTTP API and dashboard page, built with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pulseboard::config::Config;
//! use pulseboard::ingest::{CsvSource, SourceWatcher, WatcherConfig};
//! use pulseboard::live::LiveHub;
//! use pulseboard::series::SeriesStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!
//!     let hub = Arc::new(LiveHub::default());
//!     let store = Arc::new(SeriesStore::new(config.series.profile(), Arc::clone(&hub)));
//!
//!     let source = CsvSource::new(&config.series.csv_path);
//!     let watcher = SourceWatcher::new(Box::new(source), Arc::clone(&store), WatcherConfig::default());
//!     let watch_handle = watcher.spawn();
//!
//!     let state = pulseboard::api::AppState::new(store, hub);
//!     pulseboard::api::serve(state, &config.api).await?;
//!
//!     watch_handle.abort();
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod ingest;
pub mod live;
pub mod report;
pub mod series;
pub mod timeexpr;

// Re-export top-level types for convenience
pub use series::{Sample, SeriesFrame, SeriesProfile, SeriesStore, TimeRange, ValueFormat};

pub use report::{DailyReport, DayNavigator};

pub use ingest::{CsvSource, IngestError, LoadStats, SampleSource, SourceBatch, SourceWatcher, WatcherConfig};

pub use api::{build_router, serve, ApiError, AppState};

pub use live::{ClientMessage, HubConfig, LiveHub, ServerMessage, websocket_handler};

pub use config::{ApiSettings, Config, ConfigError, LoggingConfig, SeriesConfig, WatcherSettings};
