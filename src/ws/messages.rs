//! WebSocket message types: envelope and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

impl WsMessage {
    fn new(id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Response to the command with the given `id`.
    #[must_use]
    pub fn response(id: String, payload: serde_json::Value) -> Self {
        Self::new(id, WsMessageType::Response, payload)
    }

    /// Broadcast event with a fresh server-generated id.
    #[must_use]
    pub fn event(payload: serde_json::Value) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), WsMessageType::Event, payload)
    }

    /// Error reply carrying a numeric code and message.
    #[must_use]
    pub fn error(id: String, code: u32, message: impl Into<String>) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message.into() }),
        )
    }

    /// Error reply for a failed gateway operation.
    #[must_use]
    pub fn gateway_error(id: String, err: &GatewayError) -> Self {
        Self::error(id, err.error_code(), err.to_string())
    }
}

/// Commands that a client can send over WebSocket, carried in the payload
/// of a `command` envelope.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to events touching specific assets.
    Subscribe {
        /// Asset addresses (zero address for native). `"*"` subscribes to
        /// everything, including administrative events.
        assets: Vec<String>,
    },
    /// Unsubscribe from events for specific assets.
    Unsubscribe {
        /// Asset addresses; `"*"` drops the wildcard.
        assets: Vec<String>,
    },
    /// Look up one directional rate.
    GetRate {
        /// Input asset.
        asset_in: String,
        /// Output asset.
        asset_out: String,
    },
    /// Look up one pool balance.
    GetPool {
        /// Pooled asset.
        asset: String,
    },
}
