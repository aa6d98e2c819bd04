//! Source watcher
//!
//! Background task that polls a sample source on an interval and merges
//! whatever arrived into the series store. Errors (a missing file, a
//! collector restart) are logged and retried with backoff, never fatal.

use std::sync::Arc;
use std::time::Duration;

use super::{IngestError, SampleSource, SourceBatch};
use crate::series::SeriesStore;

/// Watcher timing configuration
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// How often to poll the source
    pub poll_interval: Duration,
    /// Upper bound for the error backoff delay
    pub max_backoff: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
        }
    }
}

/// Polls a [`SampleSource`] and feeds the [`SeriesStore`].
pub struct SourceWatcher {
    source: Box<dyn SampleSource>,
    store: Arc<SeriesStore>,
    config: WatcherConfig,
    error_count: u32,
}

impl SourceWatcher {
    /// Create a watcher over the given source and store
    pub fn new(
        source: Box<dyn SampleSource>,
        store: Arc<SeriesStore>,
        config: WatcherConfig,
    ) -> Self {
        Self {
            source,
            store,
            config,
            error_count: 0,
        }
    }

    /// Poll once and merge the result; returns how many samples landed.
    pub async fn run_once(&mut self) -> Result<usize, IngestError> {
        let SourceBatch {
            samples,
            stats,
            reset,
        } = self.source.poll().await?;

        if reset {
            tracing::warn!(
                source = self.source.name(),
                "Source was rewritten, reloading series from scratch"
            );
        }

        if stats.rows_dropped > 0 {
            tracing::debug!(
                source = self.source.name(),
                dropped = stats.rows_dropped,
                "Dropped malformed rows"
            );
        }

        if samples.is_empty() && !reset {
            return Ok(0);
        }

        let merged = if reset {
            self.store.replace(samples).await
        } else {
            self.store.merge(samples).await
        };

        if merged > 0 {
            let total = self.store.len().await;
            tracing::debug!(
                source = self.source.name(),
                merged,
                total,
                "Merged samples"
            );
        }

        Ok(merged)
    }

    /// Delay before the next poll, accounting for consecutive errors.
    fn next_delay(&self) -> Duration {
        if self.error_count == 0 {
            return self.config.poll_interval;
        }
        let backoff = self
            .config
            .poll_interval
            .saturating_mul(self.error_count.min(32))
            .saturating_mul(2);
        backoff.min(self.config.max_backoff)
    }

    /// Run the watch loop until the task is aborted.
    pub fn spawn(mut self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                source = self.source.name(),
                description = %self.source.describe(),
                interval_ms = self.config.poll_interval.as_millis() as u64,
                "Watching source"
            );

            loop {
                match self.run_once().await {
                    Ok(_) => {
                        self.error_count = 0;
                    }
                    Err(e) => {
                        self.error_count += 1;
                        tracing::warn!(
                            source = self.source.name(),
                            error = %e,
                            consecutive_errors = self.error_count,
                            "Poll failed"
                        );
                    }
                }

                tokio::time::sleep(self.next_delay()).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::LoadStats;
    use crate::live::LiveHub;
    use crate::series::{Sample, SeriesProfile};
    use async_trait::async_trait;

    /// Source that replays scripted batches
    struct ScriptedSource {
        batches: Vec<Result<SourceBatch, IngestError>>,
    }

    #[async_trait]
    impl SampleSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        fn describe(&self) -> String {
            "scripted test source".to_string()
        }

        async fn poll(&mut self) -> Result<SourceBatch, IngestError> {
            if self.batches.is_empty() {
                return Ok(SourceBatch::default());
            }
            self.batches.remove(0)
        }
    }

    fn test_store() -> Arc<SeriesStore> {
        Arc::new(SeriesStore::new(
            SeriesProfile::default(),
            Arc::new(LiveHub::default()),
        ))
    }

    fn batch(samples: Vec<Sample>, reset: bool) -> Result<SourceBatch, IngestError> {
        let stats = LoadStats {
            rows_parsed: samples.len(),
            rows_dropped: 0,
        };
        Ok(SourceBatch {
            samples,
            stats,
            reset,
        })
    }

    #[tokio::test]
    async fn test_run_once_merges() {
        let source = ScriptedSource {
            batches: vec![
                batch(vec![Sample::at(1000, 1.0)], false),
                batch(vec![Sample::at(2000, 2.0)], false),
            ],
        };
        let store = test_store();
        let mut watcher =
            SourceWatcher::new(Box::new(source), Arc::clone(&store), WatcherConfig::default());

        assert_eq!(watcher.run_once().await.unwrap(), 1);
        assert_eq!(watcher.run_once().await.unwrap(), 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_run_once_reset_replaces() {
        let source = ScriptedSource {
            batches: vec![
                batch(vec![Sample::at(1000, 1.0), Sample::at(2000, 2.0)], false),
                batch(vec![Sample::at(3000, 3.0)], true),
            ],
        };
        let store = test_store();
        let mut watcher =
            SourceWatcher::new(Box::new(source), Arc::clone(&store), WatcherConfig::default());

        watcher.run_once().await.unwrap();
        watcher.run_once().await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.latest().await.unwrap().value, 3.0);
    }

    #[tokio::test]
    async fn test_backoff_grows_and_caps() {
        let source = ScriptedSource { batches: vec![] };
        let mut watcher = SourceWatcher::new(
            Box::new(source),
            test_store(),
            WatcherConfig {
                poll_interval: Duration::from_secs(1),
                max_backoff: Duration::from_secs(5),
            },
        );

        assert_eq!(watcher.next_delay(), Duration::from_secs(1));

        watcher.error_count = 1;
        assert_eq!(watcher.next_delay(), Duration::from_secs(2));

        watcher.error_count = 100;
        assert_eq!(watcher.next_delay(), Duration::from_secs(5));
    }
}
