//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::live::LiveHub;
use crate::series::SeriesStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// The in-memory series being served
    pub store: Arc<SeriesStore>,
    /// Live update hub for WebSocket push
    pub hub: Arc<LiveHub>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState
    pub fn new(store: Arc<SeriesStore>, hub: Arc<LiveHub>) -> Self {
        Self {
            store,
            hub,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
