//! Domain events reflecting committed ledger transitions.
//!
//! Every successful state change emits a [`LedgerEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers and
//! optionally persisted to the PostgreSQL event log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Address, AssetId};

/// Domain event emitted after every committed transition.
///
/// Amounts and rates are stored as `String` to preserve u128 precision
/// when serialized to JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A directional rate was registered, overwritten or cleared.
    RateSet {
        /// Input asset.
        asset_in: AssetId,
        /// Output asset.
        asset_out: AssetId,
        /// New scaled rate (`"0"` when cleared).
        rate: String,
        /// Rate before the update.
        previous_rate: String,
        /// Administrator that issued the update.
        admin: Address,
        /// Commit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Administration was handed to another account.
    AdminTransferred {
        /// Outgoing administrator.
        previous_admin: Address,
        /// Incoming administrator.
        new_admin: Address,
        /// Commit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Funds were deposited into a pool.
    Deposited {
        /// Deposited asset.
        asset: AssetId,
        /// Depositing account.
        depositor: Address,
        /// Deposited amount.
        amount: String,
        /// Pool balance after the deposit.
        pool_balance: String,
        /// Commit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A swap was executed against the pools.
    SwapExecuted {
        /// Unique identifier of this swap.
        swap_id: Uuid,
        /// Swapping account.
        caller: Address,
        /// Input asset.
        asset_in: AssetId,
        /// Output asset.
        asset_out: AssetId,
        /// Input amount.
        amount_in: String,
        /// Output amount.
        amount_out: String,
        /// Rate applied.
        rate: String,
        /// Input pool balance after the swap.
        pool_in_balance: String,
        /// Output pool balance after the swap.
        pool_out_balance: String,
        /// Commit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A token contract was deployed.
    TokenDeployed {
        /// Contract address.
        token: Address,
        /// Token name.
        name: String,
        /// Token symbol.
        symbol: String,
        /// Deployer, who received the initial supply.
        owner: Address,
        /// Initial supply.
        initial_supply: String,
        /// Commit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Token balance moved between accounts. Mints carry the zero
    /// address as `from`.
    TokenTransferred {
        /// Contract address.
        token: Address,
        /// Debited account.
        from: Address,
        /// Credited account.
        to: Address,
        /// Transferred amount.
        amount: String,
        /// Commit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A token allowance was set.
    TokenApproved {
        /// Contract address.
        token: Address,
        /// Balance owner.
        owner: Address,
        /// Approved spender.
        spender: Address,
        /// New allowance.
        amount: String,
        /// Commit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Native value moved between accounts.
    NativeTransferred {
        /// Debited account.
        from: Address,
        /// Credited account.
        to: Address,
        /// Transferred amount.
        amount: String,
        /// Commit timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Assets this event touches, used for subscription filtering.
    ///
    /// Administrative events touch no asset and only reach wildcard
    /// subscribers.
    #[must_use]
    pub fn assets(&self) -> Vec<AssetId> {
        match self {
            Self::RateSet {
                asset_in, asset_out, ..
            }
            | Self::SwapExecuted {
                asset_in, asset_out, ..
            } => vec![*asset_in, *asset_out],
            Self::Deposited { asset, .. } => vec![*asset],
            Self::TokenDeployed { token, .. }
            | Self::TokenTransferred { token, .. }
            | Self::TokenApproved { token, .. } => vec![AssetId::Token(*token)],
            Self::NativeTransferred { .. } => vec![AssetId::Native],
            Self::AdminTransferred { .. } => Vec::new(),
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::RateSet { .. } => "rate_set",
            Self::AdminTransferred { .. } => "admin_transferred",
            Self::Deposited { .. } => "deposited",
            Self::SwapExecuted { .. } => "swap_executed",
            Self::TokenDeployed { .. } => "token_deployed",
            Self::TokenTransferred { .. } => "token_transferred",
            Self::TokenApproved { .. } => "token_approved",
            Self::NativeTransferred { .. } => "native_transferred",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn token() -> Address {
        Address::from_bytes([0x11; 20])
    }

    #[test]
    fn swap_executed_serializes_with_tag() {
        let event = LedgerEvent::SwapExecuted {
            swap_id: Uuid::new_v4(),
            caller: Address::from_bytes([2; 20]),
            asset_in: AssetId::Token(token()),
            asset_out: AssetId::Native,
            amount_in: "10000000000000000000".to_string(),
            amount_out: "600".to_string(),
            rate: "60".to_string(),
            pool_in_balance: "1".to_string(),
            pool_out_balance: "2".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"swap_executed\""));
        assert!(json.contains("10000000000000000000"));
        assert_eq!(event.event_type_str(), "swap_executed");
    }

    #[test]
    fn assets_cover_both_swap_sides() {
        let event = LedgerEvent::RateSet {
            asset_in: AssetId::Token(token()),
            asset_out: AssetId::Native,
            rate: "60".to_string(),
            previous_rate: "0".to_string(),
            admin: Address::from_bytes([1; 20]),
            timestamp: Utc::now(),
        };
        assert_eq!(event.assets(), vec![AssetId::Token(token()), AssetId::Native]);
    }

    #[test]
    fn admin_transfer_touches_no_asset() {
        let event = LedgerEvent::AdminTransferred {
            previous_admin: Address::from_bytes([1; 20]),
            new_admin: Address::from_bytes([2; 20]),
            timestamp: Utc::now(),
        };
        assert!(event.assets().is_empty());
    }

    #[test]
    fn token_events_map_to_token_asset() {
        let event = LedgerEvent::TokenTransferred {
            token: token(),
            from: Address::ZERO,
            to: Address::from_bytes([2; 20]),
            amount: "5".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.assets(), vec![AssetId::Token(token())]);
    }
}
