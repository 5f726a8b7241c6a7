//! Background tasks that persist the exchange.
//!
//! The event recorder appends every event from the bus to the store. The
//! snapshot task writes the whole ledger on a fixed interval and prunes
//! old snapshots. Storage failures are logged and never stop the
//! exchange.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::{LedgerStore, PostgresPersistence};
use crate::domain::{Ledger, LedgerEvent};
use crate::error::GatewayError;
use crate::service::ExchangeService;

/// Spawns a task that appends every received event to `store`.
///
/// The receiver should be created before any transition runs so no event
/// is missed. The task ends when the bus closes.
pub fn spawn_event_recorder<S: LedgerStore>(
    store: Arc<S>,
    mut rx: broadcast::Receiver<LedgerEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(e) = store.append_event(&event).await {
                        tracing::warn!(
                            error = %e,
                            event_type = event.event_type_str(),
                            "failed to persist event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "event recorder lagged, events not persisted");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::debug!("event recorder stopped");
    })
}

/// Writes one snapshot of the current ledger.
///
/// # Errors
///
/// Propagates the store's [`GatewayError::PersistenceError`].
pub async fn write_snapshot<S: LedgerStore>(
    store: &S,
    exchange: &ExchangeService,
) -> Result<(), GatewayError> {
    let state = exchange.snapshot().await;
    store.store_snapshot(&state).await?;
    tracing::debug!("ledger snapshot stored");
    Ok(())
}

/// Spawns a task that snapshots the ledger every `interval`.
///
/// After each snapshot, snapshots older than `cleanup_after_days` are
/// pruned (0 disables pruning).
pub fn spawn_snapshot_task<S: LedgerStore>(
    store: Arc<S>,
    exchange: Arc<ExchangeService>,
    interval: Duration,
    cleanup_after_days: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_secs(1)));
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = write_snapshot(store.as_ref(), &exchange).await {
                tracing::warn!(error = %e, "periodic snapshot failed");
                continue;
            }
            if cleanup_after_days > 0 {
                match store.prune_snapshots(cleanup_after_days).await {
                    Ok(0) => {}
                    Ok(removed) => tracing::info!(removed, "old snapshots pruned"),
                    Err(e) => tracing::warn!(error = %e, "snapshot pruning failed"),
                }
            }
        }
    })
}

/// Rebuilds the ledger from the newest stored snapshot.
///
/// Returns `Ok(None)` when no snapshot exists yet.
///
/// # Errors
///
/// Returns a [`GatewayError::PersistenceError`] when the snapshot cannot
/// be loaded, decoded, or validated.
pub async fn load_ledger(persistence: &PostgresPersistence) -> Result<Option<Ledger>, GatewayError> {
    let Some(row) = persistence.load_latest_snapshot().await? else {
        return Ok(None);
    };
    let state = row.state().map_err(|e| {
        GatewayError::PersistenceError(format!("snapshot {} is unreadable: {e}", row.id))
    })?;
    let ledger = Ledger::restore(state).map_err(|e| {
        GatewayError::PersistenceError(format!("snapshot {} is invalid: {e}", row.id))
    })?;
    tracing::info!(snapshot_id = row.id, snapshot_at = %row.snapshot_at, "ledger restored");
    Ok(Some(ledger))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Address, EventBus, LedgerState};
    use hydra_amm::domain::Amount;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct MemoryStore {
        events: Mutex<Vec<LedgerEvent>>,
        snapshots: Mutex<Vec<LedgerState>>,
    }

    impl LedgerStore for MemoryStore {
        async fn append_event(&self, event: &LedgerEvent) -> Result<(), GatewayError> {
            if let Ok(mut events) = self.events.lock() {
                events.push(event.clone());
            }
            Ok(())
        }

        async fn store_snapshot(&self, state: &LedgerState) -> Result<(), GatewayError> {
            if let Ok(mut snapshots) = self.snapshots.lock() {
                snapshots.push(state.clone());
            }
            Ok(())
        }

        async fn prune_snapshots(&self, _days: u64) -> Result<u64, GatewayError> {
            Ok(0)
        }
    }

    fn make_service() -> ExchangeService {
        let Ok(mut ledger) = Ledger::new(Address::from_bytes([1; 20]), Address::from_bytes([2; 20]))
        else {
            panic!("valid ledger");
        };
        assert!(
            ledger
                .credit_native(Address::from_bytes([1; 20]), Amount::new(1_000))
                .is_ok()
        );
        ExchangeService::new(ledger, EventBus::new(16))
    }

    #[tokio::test]
    async fn recorder_persists_committed_events() {
        let service = make_service();
        let store = Arc::new(MemoryStore::default());
        let handle = spawn_event_recorder(Arc::clone(&store), service.event_bus().subscribe());

        let transfer = service
            .native_transfer(Address::from_bytes([1; 20]), Address::from_bytes([3; 20]), Amount::new(5))
            .await;
        assert!(transfer.is_ok());
        // failed transitions emit nothing
        let failed = service
            .native_transfer(Address::from_bytes([3; 20]), Address::from_bytes([1; 20]), Amount::new(50))
            .await;
        assert!(failed.is_err());

        drop(service);
        assert!(handle.await.is_ok());

        let Ok(events) = store.events.lock() else {
            panic!("lock poisoned");
        };
        assert_eq!(events.len(), 1);
        assert_eq!(
            events.first().map(LedgerEvent::event_type_str),
            Some("native_transferred")
        );
    }

    #[tokio::test]
    async fn write_snapshot_stores_current_state() {
        let service = make_service();
        let store = MemoryStore::default();
        assert!(write_snapshot(&store, &service).await.is_ok());

        let expected = service.snapshot().await;
        let Ok(snapshots) = store.snapshots.lock() else {
            panic!("lock poisoned");
        };
        assert_eq!(snapshots.as_slice(), &[expected]);
    }
}
