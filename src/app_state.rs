//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::ExchangeService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Exchange service for all business logic.
    pub exchange: Arc<ExchangeService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Builds state around a service, sharing its event bus.
    #[must_use]
    pub fn new(exchange: ExchangeService) -> Self {
        let event_bus = exchange.event_bus().clone();
        Self {
            exchange: Arc::new(exchange),
            event_bus,
        }
    }
}
