//! Ingestion layer
//!
//! Pulls samples into the series store from an external source. The only
//! source today is an append-only CSV file, behind a trait so the watcher
//! does not care where batches come from.

mod csv_source;
mod watcher;

pub use csv_source::CsvSource;
pub use watcher::{SourceWatcher, WatcherConfig};

use async_trait::async_trait;

use crate::series::Sample;

/// Common trait for sample sources
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Unique name for this source, used in logs
    fn name(&self) -> &str;

    /// Human-readable description of what is being read
    fn describe(&self) -> String;

    /// Fetch whatever is new since the previous poll.
    async fn poll(&mut self) -> Result<SourceBatch, IngestError>;
}

/// One poll's worth of samples
#[derive(Debug, Default)]
pub struct SourceBatch {
    /// Parsed samples, in file order
    pub samples: Vec<Sample>,
    /// Row accounting for this poll
    pub stats: LoadStats,
    /// True when the source was rewritten and previously ingested data
    /// must be discarded before merging
    pub reset: bool,
}

/// Row accounting for a load operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows that parsed into samples
    pub rows_parsed: usize,
    /// Rows silently dropped (unparsable timestamp or value)
    pub rows_dropped: usize,
}

impl LoadStats {
    /// Total rows seen
    pub fn rows_read(&self) -> usize {
        self.rows_parsed + self.rows_dropped
    }
}

/// Errors that can occur while reading a source
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
