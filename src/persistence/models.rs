//! Database models for events and snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::LedgerState;

/// A stored event row from the `events` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredEvent {
    /// Auto-increment row ID.
    pub id: i64,
    /// Event type discriminator (e.g. `"swap_executed"`).
    pub event_type: String,
    /// Assets the event touches, as `0x` strings.
    pub assets: Vec<String>,
    /// JSONB payload with the full tagged event.
    pub payload: serde_json::Value,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A ledger snapshot row from the `ledger_snapshots` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredSnapshot {
    /// Auto-increment row ID.
    pub id: i64,
    /// Full ledger state as JSONB.
    pub state_json: serde_json::Value,
    /// Snapshot timestamp.
    pub snapshot_at: DateTime<Utc>,
}

impl StoredSnapshot {
    /// Decodes the stored JSON into a [`LedgerState`].
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the payload does not match the
    /// current state layout.
    pub fn state(&self) -> Result<LedgerState, serde_json::Error> {
        LedgerState::deserialize(&self.state_json)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Address, Ledger};

    #[test]
    fn snapshot_row_decodes_state() {
        let Ok(ledger) = Ledger::new(Address::from_bytes([1; 20]), Address::from_bytes([2; 20]))
        else {
            panic!("valid ledger");
        };
        let state = ledger.snapshot();
        let Ok(state_json) = serde_json::to_value(&state) else {
            panic!("state serializes");
        };
        let row = StoredSnapshot {
            id: 1,
            state_json,
            snapshot_at: Utc::now(),
        };
        assert_eq!(row.state().ok(), Some(state));
    }

    #[test]
    fn garbage_snapshot_is_rejected() {
        let row = StoredSnapshot {
            id: 1,
            state_json: serde_json::json!({ "admin": 42 }),
            snapshot_at: Utc::now(),
        };
        assert!(row.state().is_err());
    }
}
