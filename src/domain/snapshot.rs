//! Serializable form of the whole ledger.
//!
//! [`LedgerState`] is what the persistence layer stores in
//! `ledger_snapshots`. Amounts and rates are decimal strings; collections
//! are sorted lists so the JSON is deterministic. [`Ledger::restore`]
//! validates every field before building a ledger.

use std::collections::HashMap;

use hydra_amm::domain::Amount;
use serde::{Deserialize, Serialize};

use super::host::Host;
use super::ledger::Ledger;
use super::pool_ledger::PoolLedger;
use super::token::FungibleToken;
use super::{Address, AssetId, Rate, RateRegistry};
use crate::error::{LedgerError, SnapshotError};

/// Persisted ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Rate administrator.
    pub admin: Address,
    /// Custody account of the pools.
    pub custody: Address,
    /// Registered rates.
    pub rates: Vec<RateRecord>,
    /// Pool balances.
    pub pools: Vec<PoolRecord>,
    /// Deployed tokens.
    pub tokens: Vec<TokenRecord>,
    /// Native balances.
    pub native: Vec<BalanceRecord>,
}

/// One registered rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    /// Input asset.
    pub asset_in: AssetId,
    /// Output asset.
    pub asset_out: AssetId,
    /// Scaled rate.
    pub rate: String,
}

/// One pool balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRecord {
    /// Pooled asset.
    pub asset: AssetId,
    /// Custodial balance.
    pub balance: String,
}

/// One account balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Holder.
    pub account: Address,
    /// Balance.
    pub amount: String,
}

/// One allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceRecord {
    /// Balance owner.
    pub owner: Address,
    /// Approved spender.
    pub spender: Address,
    /// Allowance.
    pub amount: String,
}

/// One token contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Contract address.
    pub address: Address,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Minting account.
    pub owner: Address,
    /// Holder balances.
    pub balances: Vec<BalanceRecord>,
    /// Allowances.
    pub allowances: Vec<AllowanceRecord>,
}

fn parse_amount(field: &'static str, value: &str) -> Result<Amount, SnapshotError> {
    value
        .parse::<u128>()
        .map(Amount::new)
        .map_err(|_| SnapshotError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn balance_records<'a>(iter: impl Iterator<Item = (&'a Address, &'a Amount)>) -> Vec<BalanceRecord> {
    let mut records: Vec<BalanceRecord> = iter
        .map(|(account, amount)| BalanceRecord {
            account: *account,
            amount: amount.to_string(),
        })
        .collect();
    records.sort_by_key(|r| r.account);
    records
}

impl TokenRecord {
    fn capture(token: &FungibleToken) -> Self {
        let mut allowances: Vec<AllowanceRecord> = token
            .allowances()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(&(owner, spender), amount)| AllowanceRecord {
                owner,
                spender,
                amount: amount.to_string(),
            })
            .collect();
        allowances.sort_by_key(|a| (a.owner, a.spender));
        Self {
            address: token.address(),
            name: token.name().to_string(),
            symbol: token.symbol().to_string(),
            owner: token.owner(),
            balances: balance_records(token.balances()),
            allowances,
        }
    }

    fn restore(self) -> Result<FungibleToken, SnapshotError> {
        let mut balances = HashMap::new();
        for record in self.balances {
            let amount = parse_amount("token balance", &record.amount)?;
            if balances.insert(record.account, amount).is_some() {
                return Err(SnapshotError::Duplicate("token balance"));
            }
        }
        let mut allowances = HashMap::new();
        for record in self.allowances {
            let amount = parse_amount("allowance", &record.amount)?;
            if allowances
                .insert((record.owner, record.spender), amount)
                .is_some()
            {
                return Err(SnapshotError::Duplicate("allowance"));
            }
        }
        Ok(FungibleToken::from_parts(
            self.address,
            self.name,
            self.symbol,
            self.owner,
            balances,
            allowances,
        )?)
    }
}

impl Ledger {
    /// Captures the full state in its persisted form.
    #[must_use]
    pub fn snapshot(&self) -> LedgerState {
        let rates = self
            .list_rates()
            .into_iter()
            .map(|entry| RateRecord {
                asset_in: entry.asset_in,
                asset_out: entry.asset_out,
                rate: entry.rate.to_string(),
            })
            .collect();
        let pools = self
            .list_pools()
            .into_iter()
            .map(|pool| PoolRecord {
                asset: pool.asset,
                balance: pool.balance.to_string(),
            })
            .collect();

        LedgerState {
            admin: self.admin(),
            custody: self.custody(),
            rates,
            pools,
            tokens: self.host().tokens().map(TokenRecord::capture).collect(),
            native: balance_records(self.host().native().balances()),
        }
    }

    /// Rebuilds a ledger from its persisted form.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] for unparseable numbers, duplicate keys,
    /// zero admin/custody addresses, identical-asset rates or balances that
    /// overflow.
    pub fn restore(state: LedgerState) -> Result<Self, SnapshotError> {
        if state.admin.is_zero() || state.custody.is_zero() {
            return Err(LedgerError::ZeroAddress.into());
        }
        if state.admin == state.custody {
            return Err(LedgerError::CustodyCaller.into());
        }

        let mut rates = RateRegistry::new(state.admin);
        for record in state.rates {
            let rate = record
                .rate
                .parse::<Rate>()
                .map_err(|_| SnapshotError::InvalidNumber {
                    field: "rate",
                    value: record.rate.clone(),
                })?;
            if !rates.get_rate(record.asset_in, record.asset_out).is_zero() {
                return Err(SnapshotError::Duplicate("rate"));
            }
            rates.set_rate(state.admin, record.asset_in, record.asset_out, rate)?;
        }

        let mut pool_balances = HashMap::new();
        for record in state.pools {
            let balance = parse_amount("pool balance", &record.balance)?;
            if pool_balances.insert(record.asset, balance).is_some() {
                return Err(SnapshotError::Duplicate("pool"));
            }
        }

        let mut host = Host::new();
        for record in state.tokens {
            let address = record.address;
            if address.is_zero() {
                return Err(LedgerError::ZeroAddress.into());
            }
            if host.token(&address).is_ok() {
                return Err(SnapshotError::Duplicate("token"));
            }
            host.install_token(record.restore()?);
        }
        for record in state.native {
            let amount = parse_amount("native balance", &record.amount)?;
            if !host.native().balance_of(&record.account).is_zero() {
                return Err(SnapshotError::Duplicate("native balance"));
            }
            host.native_mut().credit(record.account, amount)?;
        }

        Ok(Self::from_parts(
            rates,
            PoolLedger::from_balances(state.custody, pool_balances),
            host,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::CallContext;
    use tokio_test::{assert_err, assert_ok};

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn populated() -> Ledger {
        let Ok(mut ledger) = Ledger::new(addr(1), addr(0xcc)) else {
            panic!("valid ledger");
        };
        let Ok(token) = ledger.deploy_token(addr(1), "infi", "IF", Amount::new(1_000)) else {
            panic!("deploy");
        };
        let asset = AssetId::Token(token.address);
        assert_ok!(ledger.token_approve(addr(1), &token.address, addr(0xcc), Amount::new(500)));
        assert_ok!(ledger.deposit_token(&CallContext::new(addr(1)), asset, Amount::new(100)));
        assert_ok!(ledger.set_rate(addr(1), asset, AssetId::Native, Rate::new(60)));
        assert_ok!(ledger.credit_native(addr(2), Amount::new(u128::MAX / 2)));
        ledger
    }

    #[test]
    fn restore_reproduces_state() {
        let ledger = populated();
        let state = ledger.snapshot();
        let restored = assert_ok!(Ledger::restore(state.clone()));
        assert_eq!(restored.snapshot(), state);
        assert_eq!(restored.admin(), addr(1));
    }

    #[test]
    fn snapshot_survives_json() {
        let state = populated().snapshot();
        let Ok(json) = serde_json::to_value(&state) else {
            panic!("serialize");
        };
        let Ok(decoded) = serde_json::from_value::<LedgerState>(json) else {
            panic!("deserialize");
        };
        assert_eq!(decoded, state);
    }

    #[test]
    fn remaining_allowance_is_kept() {
        let state = populated().snapshot();
        let Some(token) = state.tokens.first() else {
            panic!("one token");
        };
        assert_eq!(token.allowances.len(), 1);
        assert_eq!(token.allowances.first().map(|a| a.amount.as_str()), Some("400"));
    }

    #[test]
    fn malformed_amount_is_rejected() {
        let mut state = populated().snapshot();
        if let Some(pool) = state.pools.first_mut() {
            pool.balance = "12abc".to_string();
        }
        let err = assert_err!(Ledger::restore(state));
        assert!(matches!(err, SnapshotError::InvalidNumber { field: "pool balance", .. }));
    }

    #[test]
    fn duplicate_rate_is_rejected() {
        let mut state = populated().snapshot();
        if let Some(rate) = state.rates.first().cloned() {
            state.rates.push(rate);
        }
        let err = assert_err!(Ledger::restore(state));
        assert!(matches!(err, SnapshotError::Duplicate("rate")));
    }

    #[test]
    fn zero_admin_is_rejected() {
        let mut state = populated().snapshot();
        state.admin = Address::ZERO;
        assert!(Ledger::restore(state).is_err());
    }

    #[test]
    fn custody_as_admin_is_rejected() {
        let mut state = populated().snapshot();
        state.admin = state.custody;
        let err = assert_err!(Ledger::restore(state));
        assert!(matches!(err, SnapshotError::Ledger(LedgerError::CustodyCaller)));
    }
}
