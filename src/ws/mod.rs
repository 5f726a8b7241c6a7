//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams ledger events filtered by asset
//! and answers read-only rate and pool lookups.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
