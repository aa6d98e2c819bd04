//! Live update hub
//!
//! Fans ingested samples out to every connected dashboard over a tokio
//! broadcast channel. There is a single stream of events, so connections
//! need no per-topic bookkeeping; the hub only tracks how many are open
//! and enforces a connection cap.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

use super::messages::ServerMessage;

/// Broadcasts live updates to connected dashboards.
pub struct LiveHub {
    tx: broadcast::Sender<ServerMessage>,
    connections: AtomicUsize,
    config: HubConfig,
}

/// Configuration for the live hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
    /// Capacity of the broadcast channel
    pub broadcast_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 256,
            broadcast_capacity: 1024,
        }
    }
}

/// Errors from the live hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections")]
    TooManyConnections,
}

/// Guard returned by [`LiveHub::register`]; decrements the connection
/// count when dropped.
pub struct ConnectionGuard {
    hub: Arc<LiveHub>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.hub.connections.fetch_sub(1, Ordering::Relaxed);
    }
}

impl LiveHub {
    /// Create a new hub
    pub fn new(config: HubConfig) -> Self {
        let (tx, _) = broadcast::channel(config.broadcast_capacity);
        Self {
            tx,
            connections: AtomicUsize::new(0),
            config,
        }
    }

    /// Register a connection and subscribe to the event stream.
    ///
    /// Fails when the connection cap is reached.
    pub fn register(
        self: &Arc<Self>,
    ) -> Result<(ConnectionGuard, broadcast::Receiver<ServerMessage>), HubError> {
        let prev = self.connections.fetch_add(1, Ordering::Relaxed);
        if prev >= self.config.max_connections {
            self.connections.fetch_sub(1, Ordering::Relaxed);
            return Err(HubError::TooManyConnections);
        }
        let guard = ConnectionGuard {
            hub: Arc::clone(self),
        };
        Ok((guard, self.tx.subscribe()))
    }

    /// Publish an event to all connected dashboards.
    ///
    /// A send error only means nobody is listening; that is normal.
    pub fn publish(&self, message: ServerMessage) {
        let _ = self.tx.send(message);
    }

    /// Number of open connections
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }
}

impl Default for LiveHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}
