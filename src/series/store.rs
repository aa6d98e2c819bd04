//! Series store
//!
//! Async façade over [`SeriesFrame`] shared between the CSV watcher (sole
//! writer) and the API handlers (readers). Merges that change the newest
//! sample are pushed to the live hub.

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::live::{LiveHub, ServerMessage};
use crate::series::frame::SeriesFrame;
use crate::series::types::{Sample, SeriesProfile, TimeRange};

/// Shared, thread-safe access to the in-memory series.
pub struct SeriesStore {
    frame: RwLock<SeriesFrame>,
    profile: SeriesProfile,
    hub: Arc<LiveHub>,
}

impl SeriesStore {
    /// Create an empty store
    pub fn new(profile: SeriesProfile, hub: Arc<LiveHub>) -> Self {
        Self {
            frame: RwLock::new(SeriesFrame::new()),
            profile,
            hub,
        }
    }

    /// The display profile of the tracked series
    pub fn profile(&self) -> &SeriesProfile {
        &self.profile
    }

    /// Merge a batch of samples; returns how many were new or replaced.
    ///
    /// When the merge changes the newest sample, a `sample` event goes out
    /// to every live dashboard.
    pub async fn merge(&self, batch: Vec<Sample>) -> usize {
        let (merged, latest_changed) = {
            let mut frame = self.frame.write().await;
            let before = frame.latest();
            let merged = frame.merge(batch);
            let after = frame.latest();
            (merged, after.filter(|a| before.as_ref() != Some(a)))
        };

        if let Some(latest) = latest_changed {
            self.hub.publish(ServerMessage::Sample {
                timestamp: latest.timestamp,
                value: latest.value,
                display: self.profile.display_value(latest.value),
            });
        }

        merged
    }

    /// Replace the entire series; used when the backing file was rewritten.
    pub async fn replace(&self, samples: Vec<Sample>) -> usize {
        let (merged, latest) = {
            let mut frame = self.frame.write().await;
            frame.clear();
            let merged = frame.merge(samples);
            (merged, frame.latest())
        };

        if let Some(latest) = latest {
            self.hub.publish(ServerMessage::Sample {
                timestamp: latest.timestamp,
                value: latest.value,
                display: self.profile.display_value(latest.value),
            });
        }

        merged
    }

    /// The newest sample, if any
    pub async fn latest(&self) -> Option<Sample> {
        self.frame.read().await.latest()
    }

    /// Sample closest in time to `target` (ms)
    pub async fn nearest(&self, target: i64) -> Option<Sample> {
        self.frame.read().await.nearest(target)
    }

    /// Samples within [start, end)
    pub async fn range(&self, range: TimeRange) -> Vec<Sample> {
        self.frame.read().await.range(range).to_vec()
    }

    /// Every sample held, oldest first
    pub async fn all(&self) -> Vec<Sample> {
        self.frame.read().await.samples().to_vec()
    }

    /// Samples on the given UTC day
    pub async fn day_slice(&self, date: NaiveDate) -> Vec<Sample> {
        self.frame.read().await.day_slice(date).to_vec()
    }

    /// Distinct UTC days with data, ascending
    pub async fn available_days(&self) -> Vec<NaiveDate> {
        self.frame.read().await.available_days()
    }

    /// Number of samples held
    pub async fn len(&self) -> usize {
        self.frame.read().await.len()
    }

    /// Whether the store holds no samples
    pub async fn is_empty(&self) -> bool {
        self.frame.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::types::ValueFormat;

    fn test_store() -> (Arc<LiveHub>, SeriesStore) {
        let hub = Arc::new(LiveHub::default());
        let profile = SeriesProfile::new("test", "units", ValueFormat::Plain);
        let store = SeriesStore::new(profile, Arc::clone(&hub));
        (hub, store)
    }

    #[tokio::test]
    async fn test_merge_publishes_latest() {
        let (hub, store) = test_store();
        let (_guard, mut rx) = hub.register().unwrap();

        store.merge(vec![Sample::at(1000, 1.0)]).await;

        match rx.recv().await.unwrap() {
            ServerMessage::Sample { timestamp, value, .. } => {
                assert_eq!(timestamp, 1000);
                assert_eq!(value, 1.0);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_merge_of_old_samples_does_not_publish() {
        let (hub, store) = test_store();
        store.merge(vec![Sample::at(5000, 5.0)]).await;

        let (_guard, mut rx) = hub.register().unwrap();
        store.merge(vec![Sample::at(1000, 1.0)]).await;

        // Backfill does not move the latest sample, so nothing is pushed.
        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::broadcast::error::TryRecvError::Empty)
        ));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_replace_resets_contents() {
        let (_hub, store) = test_store();
        store.merge(vec![Sample::at(1000, 1.0), Sample::at(2000, 2.0)]).await;

        store.replace(vec![Sample::at(3000, 3.0)]).await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.latest().await.unwrap().timestamp, 3000);
    }
}
