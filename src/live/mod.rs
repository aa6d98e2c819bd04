//! Live update layer
//!
//! Pushes ingested samples to connected dashboards over WebSocket, replacing
//! the fixed-interval page polling a dashboard would otherwise do.

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionGuard, HubConfig, HubError, LiveHub};
pub use messages::{ClientMessage, ServerMessage};
