//! # multiswap-gateway
//!
//! Fixed-rate multi-asset exchange ledger with REST and WebSocket access.
//!
//! An administrator publishes directional exchange rates between assets
//! (the native asset and fungible tokens deployed on the in-process
//! host). Participants deposit liquidity into per-asset custodial pools
//! and swap one asset for another at the published rate. Balance
//! arithmetic is checked `u128` math from `hydra-amm`.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── ExchangeService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── Ledger (domain/)
//!     │     ├── RateRegistry
//!     │     ├── PoolLedger
//!     │     └── Host (tokens + native bank)
//!     │
//!     └── PostgreSQL Persistence (event log + snapshots)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod router;
pub mod service;
pub mod ws;
