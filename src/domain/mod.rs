//! Domain layer: the exchange ledger and its event system.
//!
//! This module contains the ledger state machine (addresses, asset ids,
//! fixed-point rates, the rate registry, pools and the swap engine), the
//! balance collaborators it moves value through (token ledgers and the
//! native bank), the persisted snapshot form, and the event bus used to
//! broadcast committed transitions.

pub mod address;
pub mod asset_id;
pub mod balance_ledger;
pub mod event_bus;
pub mod host;
pub mod ledger;
pub mod ledger_event;
pub mod native_bank;
pub mod pool_ledger;
pub mod rate;
pub mod rate_registry;
pub mod snapshot;
pub mod token;

pub use address::{Address, AddressParseError};
pub use asset_id::AssetId;
pub use balance_ledger::BalanceLedger;
pub use event_bus::EventBus;
pub use host::{CallContext, Host};
pub use ledger::Ledger;
pub use ledger_event::LedgerEvent;
pub use native_bank::NativeBank;
pub use pool_ledger::{DepositReceipt, PoolBalance, PoolLedger, SwapQuote, SwapReceipt};
pub use rate::{RATE_SCALE, Rate};
pub use rate_registry::{RateEntry, RateRegistry};
pub use snapshot::LedgerState;
pub use token::{FungibleToken, TokenSummary};
