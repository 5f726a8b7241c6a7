//! Service layer: business logic orchestration.
//!
//! [`ExchangeService`] serializes ledger transitions, logs them, and emits
//! events through the [`super::domain::EventBus`].

pub mod exchange_service;

pub use exchange_service::{ExchangeService, ExecutedSwap};
