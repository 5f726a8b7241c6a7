//! Persistence layer: PostgreSQL event log and ledger snapshots.
//!
//! The [`LedgerStore`] trait describes durable storage of committed
//! events and periodic whole-ledger snapshots. [`PostgresPersistence`]
//! implements it with `sqlx::PgPool`; the [`recorder`] tasks feed it from
//! the event bus and the live ledger.

use std::future::Future;

use crate::domain::{LedgerEvent, LedgerState};
use crate::error::GatewayError;

pub mod models;
pub mod postgres;
pub mod recorder;

pub use postgres::PostgresPersistence;

/// Durable sink for events and snapshots.
pub trait LedgerStore: Send + Sync + 'static {
    /// Appends one committed event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] when the write fails.
    fn append_event(
        &self,
        event: &LedgerEvent,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Stores one snapshot of the whole ledger.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] when the write fails.
    fn store_snapshot(
        &self,
        state: &LedgerState,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Prunes snapshots older than `days`, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] when the delete fails.
    fn prune_snapshots(&self, days: u64) -> impl Future<Output = Result<u64, GatewayError>> + Send;
}

impl LedgerStore for PostgresPersistence {
    async fn append_event(&self, event: &LedgerEvent) -> Result<(), GatewayError> {
        self.save_event(event).await.map(|_| ())
    }

    async fn store_snapshot(&self, state: &LedgerState) -> Result<(), GatewayError> {
        self.save_snapshot(state).await.map(|_| ())
    }

    async fn prune_snapshots(&self, days: u64) -> Result<u64, GatewayError> {
        self.delete_old_snapshots(days).await
    }
}
