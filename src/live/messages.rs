//! Live update message types
//!
//! Messages exchanged over the dashboard WebSocket. The server pushes a
//! `sample` event whenever ingestion advances the series; clients only ever
//! send keepalive pings.

use serde::{Deserialize, Serialize};

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
    /// A new sample was ingested
    Sample {
        /// Timestamp in milliseconds
        timestamp: i64,
        /// Raw value
        value: f64,
        /// Value formatted per the series profile
        display: String,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}
