//! Administrator-controlled directional rate table.

use std::collections::HashMap;

use serde::Serialize;

use super::{Address, AssetId, Rate};
use crate::error::LedgerError;

/// A registered rate for an ordered asset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateEntry {
    /// Input asset.
    pub asset_in: AssetId,
    /// Output asset.
    pub asset_out: AssetId,
    /// Scaled rate (`asset_out` per `asset_in`).
    pub rate: Rate,
}

/// Directional exchange rates plus the single administrator allowed to
/// change them.
///
/// Lookups of unregistered pairs return [`Rate::ZERO`]; registering
/// `A → B` says nothing about `B → A`.
#[derive(Debug, Clone)]
pub struct RateRegistry {
    admin: Address,
    rates: HashMap<(AssetId, AssetId), Rate>,
}

impl RateRegistry {
    /// Creates an empty registry administered by `admin`.
    #[must_use]
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            rates: HashMap::new(),
        }
    }

    /// Current administrator.
    #[must_use]
    pub const fn admin(&self) -> Address {
        self.admin
    }

    /// Registers or overwrites the rate for `asset_in → asset_out` and
    /// returns the previous value. A zero rate removes the entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unauthorized`] unless `caller` is the
    /// administrator, and [`LedgerError::IdenticalAssets`] if both sides
    /// are the same asset.
    pub fn set_rate(
        &mut self,
        caller: Address,
        asset_in: AssetId,
        asset_out: AssetId,
        rate: Rate,
    ) -> Result<Rate, LedgerError> {
        self.ensure_admin(caller)?;
        if asset_in == asset_out {
            return Err(LedgerError::IdenticalAssets);
        }
        let previous = if rate.is_zero() {
            self.rates.remove(&(asset_in, asset_out))
        } else {
            self.rates.insert((asset_in, asset_out), rate)
        };
        Ok(previous.unwrap_or(Rate::ZERO))
    }

    /// Rate for `asset_in → asset_out`, or [`Rate::ZERO`] if unset.
    #[must_use]
    pub fn get_rate(&self, asset_in: AssetId, asset_out: AssetId) -> Rate {
        self.rates
            .get(&(asset_in, asset_out))
            .copied()
            .unwrap_or(Rate::ZERO)
    }

    /// Hands administration to `new_admin` and returns the previous admin.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unauthorized`] unless `caller` is the
    /// administrator, and [`LedgerError::ZeroAddress`] for a zero
    /// `new_admin`.
    pub fn transfer_admin(
        &mut self,
        caller: Address,
        new_admin: Address,
    ) -> Result<Address, LedgerError> {
        self.ensure_admin(caller)?;
        if new_admin.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        Ok(std::mem::replace(&mut self.admin, new_admin))
    }

    /// All registered rates ordered by `(asset_in, asset_out)`.
    #[must_use]
    pub fn entries(&self) -> Vec<RateEntry> {
        let mut entries: Vec<RateEntry> = self
            .rates
            .iter()
            .map(|(&(asset_in, asset_out), &rate)| RateEntry {
                asset_in,
                asset_out,
                rate,
            })
            .collect();
        entries.sort_by_key(|e| (e.asset_in, e.asset_out));
        entries
    }

    fn ensure_admin(&self, caller: Address) -> Result<(), LedgerError> {
        if caller != self.admin {
            return Err(LedgerError::Unauthorized { caller });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn infi() -> AssetId {
        AssetId::Token(addr(0x11))
    }

    fn curve() -> AssetId {
        AssetId::Token(addr(0x22))
    }

    #[test]
    fn admin_sets_rate_and_lookup_reflects_it() {
        let mut registry = RateRegistry::new(addr(1));
        let previous = assert_ok!(registry.set_rate(addr(1), infi(), curve(), Rate::new(20)));
        assert_eq!(previous, Rate::ZERO);
        assert_eq!(registry.get_rate(infi(), curve()), Rate::new(20));
    }

    #[test]
    fn token_to_native_rate() {
        let mut registry = RateRegistry::new(addr(1));
        assert_ok!(registry.set_rate(addr(1), infi(), AssetId::Native, Rate::new(20)));
        assert_eq!(registry.get_rate(infi(), AssetId::Native), Rate::new(20));
    }

    #[test]
    fn rates_are_directional() {
        let mut registry = RateRegistry::new(addr(1));
        assert_ok!(registry.set_rate(addr(1), infi(), curve(), Rate::new(50)));
        assert_eq!(registry.get_rate(curve(), infi()), Rate::ZERO);
    }

    #[test]
    fn non_admin_is_rejected_and_rate_kept() {
        let mut registry = RateRegistry::new(addr(1));
        assert_ok!(registry.set_rate(addr(1), infi(), curve(), Rate::new(50)));

        let err = assert_err!(registry.set_rate(addr(2), infi(), curve(), Rate::new(99)));
        assert!(matches!(err, LedgerError::Unauthorized { caller } if caller == addr(2)));
        assert_eq!(registry.get_rate(infi(), curve()), Rate::new(50));
    }

    #[test]
    fn overwrite_returns_previous() {
        let mut registry = RateRegistry::new(addr(1));
        assert_ok!(registry.set_rate(addr(1), infi(), curve(), Rate::new(50)));
        let previous = assert_ok!(registry.set_rate(addr(1), infi(), curve(), Rate::new(60)));
        assert_eq!(previous, Rate::new(50));
    }

    #[test]
    fn zero_rate_removes_entry() {
        let mut registry = RateRegistry::new(addr(1));
        assert_ok!(registry.set_rate(addr(1), infi(), curve(), Rate::new(50)));
        assert_ok!(registry.set_rate(addr(1), infi(), curve(), Rate::ZERO));
        assert_eq!(registry.get_rate(infi(), curve()), Rate::ZERO);
        assert!(registry.entries().is_empty());
    }

    #[test]
    fn identical_assets_rejected() {
        let mut registry = RateRegistry::new(addr(1));
        let err = assert_err!(registry.set_rate(addr(1), infi(), infi(), Rate::new(1)));
        assert!(matches!(err, LedgerError::IdenticalAssets));
    }

    #[test]
    fn admin_transfer() {
        let mut registry = RateRegistry::new(addr(1));
        let err = assert_err!(registry.transfer_admin(addr(2), addr(2)));
        assert!(matches!(err, LedgerError::Unauthorized { .. }));

        let err = assert_err!(registry.transfer_admin(addr(1), Address::ZERO));
        assert!(matches!(err, LedgerError::ZeroAddress));

        let previous = assert_ok!(registry.transfer_admin(addr(1), addr(2)));
        assert_eq!(previous, addr(1));
        assert_eq!(registry.admin(), addr(2));
        assert!(registry.set_rate(addr(1), infi(), curve(), Rate::new(1)).is_err());
    }

    #[test]
    fn entries_are_ordered() {
        let mut registry = RateRegistry::new(addr(1));
        assert_ok!(registry.set_rate(addr(1), curve(), infi(), Rate::new(2)));
        assert_ok!(registry.set_rate(addr(1), AssetId::Native, curve(), Rate::new(3)));
        assert_ok!(registry.set_rate(addr(1), infi(), curve(), Rate::new(1)));
        let pairs: Vec<_> = registry
            .entries()
            .into_iter()
            .map(|e| (e.asset_in, e.asset_out))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (AssetId::Native, curve()),
                (infi(), curve()),
                (curve(), infi())
            ]
        );
    }
}
