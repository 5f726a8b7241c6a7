//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{StoredEvent, StoredSnapshot};
use crate::config::ExchangeConfig;
use crate::domain::{AssetId, LedgerEvent, LedgerState};
use crate::error::GatewayError;

fn db_error(e: impl std::fmt::Display) -> GatewayError {
    GatewayError::PersistenceError(e.to_string())
}

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool from `config` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database is
    /// unreachable or a migration fails.
    pub async fn connect(config: &ExchangeConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(db_error)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(db_error)?;

        Ok(Self::new(pool))
    }

    /// Appends an event to the event log.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database or
    /// serialization failure.
    pub async fn save_event(&self, event: &LedgerEvent) -> Result<i64, GatewayError> {
        let payload = serde_json::to_value(event).map_err(db_error)?;
        let assets: Vec<String> = event.assets().iter().map(ToString::to_string).collect();

        sqlx::query_scalar::<_, i64>(
            "INSERT INTO events (event_type, assets, payload) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(event.event_type_str())
        .bind(assets)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    /// Saves a full ledger snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database or
    /// serialization failure.
    pub async fn save_snapshot(&self, state: &LedgerState) -> Result<i64, GatewayError> {
        let state_json = serde_json::to_value(state).map_err(db_error)?;

        sqlx::query_scalar::<_, i64>(
            "INSERT INTO ledger_snapshots (state_json) VALUES ($1) RETURNING id",
        )
        .bind(state_json)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    /// Loads the newest snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_latest_snapshot(&self) -> Result<Option<StoredSnapshot>, GatewayError> {
        sqlx::query_as::<_, StoredSnapshot>(
            "SELECT id, state_json, snapshot_at FROM ledger_snapshots \
             ORDER BY snapshot_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    /// Loads events after the given timestamp, optionally filtered by asset.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_events_after(
        &self,
        after: DateTime<Utc>,
        asset: Option<AssetId>,
    ) -> Result<Vec<StoredEvent>, GatewayError> {
        if let Some(asset) = asset {
            sqlx::query_as::<_, StoredEvent>(
                "SELECT id, event_type, assets, payload, created_at FROM events \
                 WHERE created_at > $1 AND $2 = ANY(assets) ORDER BY id ASC",
            )
            .bind(after)
            .bind(asset.to_string())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, StoredEvent>(
                "SELECT id, event_type, assets, payload, created_at FROM events \
                 WHERE created_at > $1 ORDER BY id ASC",
            )
            .bind(after)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(db_error)
    }

    /// Deletes snapshots older than the given number of days.
    ///
    /// The newest snapshot is always kept so a restart can still recover.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn delete_old_snapshots(&self, before_days: u64) -> Result<u64, GatewayError> {
        let Some(cutoff) = i64::try_from(before_days)
            .ok()
            .and_then(chrono::Duration::try_days)
            .and_then(|age| Utc::now().checked_sub_signed(age))
        else {
            return Ok(0);
        };

        let result = sqlx::query(
            "DELETE FROM ledger_snapshots WHERE snapshot_at < $1 \
             AND id <> (SELECT max(id) FROM ledger_snapshots)",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected())
    }
}
