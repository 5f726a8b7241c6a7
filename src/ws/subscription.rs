//! Per-connection subscription manager.
//!
//! Tracks which assets a WebSocket client is subscribed to and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::{AssetId, LedgerEvent};

/// Manages the set of asset subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed assets. Ignored while `subscribe_all` is set.
    assets: HashSet<AssetId>,
    /// Whether the client subscribes to everything (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds assets to the subscription set; `wildcard` enables `"*"`.
    pub fn subscribe(&mut self, assets: &[AssetId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.assets.extend(assets.iter().copied());
    }

    /// Removes assets from the subscription set; `wildcard` clears `"*"`.
    pub fn unsubscribe(&mut self, assets: &[AssetId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for asset in assets {
            self.assets.remove(asset);
        }
    }

    /// Returns `true` if the event touches a subscribed asset. Events that
    /// touch no asset only pass the wildcard.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        self.subscribe_all || event.assets().iter().any(|a| self.assets.contains(a))
    }

    /// Returns the number of explicitly subscribed assets.
    #[must_use]
    pub fn count(&self) -> usize {
        self.assets.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
