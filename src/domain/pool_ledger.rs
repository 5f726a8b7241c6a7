//! Custodial pool balances and the fixed-rate swap engine.
//!
//! [`PoolLedger`] owns one balance per asset, held by the custody account.
//! Deposits grow a pool; swaps grow the input pool by `amount_in` and
//! shrink the output pool by `floor(amount_in * rate / 10^18)`.
//!
//! Every mutating operation validates everything it can (amounts, rates,
//! liquidity, both transfers) before moving a single unit, so a failed
//! call leaves pools and host balances exactly as they were.

use std::collections::HashMap;

use hydra_amm::domain::Amount;
use hydra_amm::math::CheckedArithmetic;
use serde::Serialize;

use super::host::{CallContext, Host};
use super::{Address, AssetId, Rate, RateRegistry};
use crate::error::LedgerError;

/// Outcome of a successful deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositReceipt {
    /// Deposited asset.
    pub asset: AssetId,
    /// Depositing account.
    pub depositor: Address,
    /// Amount added to the pool.
    pub amount: Amount,
    /// Pool balance after the deposit.
    pub pool_balance: Amount,
}

/// Read-only pricing of a swap against current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Input asset.
    pub asset_in: AssetId,
    /// Output asset.
    pub asset_out: AssetId,
    /// Input amount.
    pub amount_in: Amount,
    /// Output amount the swap would release.
    pub amount_out: Amount,
    /// Rate applied.
    pub rate: Rate,
    /// Output pool balance before the swap.
    pub available: Amount,
}

/// Outcome of a committed swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapReceipt {
    /// Pricing that was executed.
    pub quote: SwapQuote,
    /// Swapping account.
    pub caller: Address,
    /// Input pool balance after the swap.
    pub pool_in_balance: Amount,
    /// Output pool balance after the swap.
    pub pool_out_balance: Amount,
}

/// A pool balance entry for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolBalance {
    /// Pooled asset.
    pub asset: AssetId,
    /// Balance held in custody (string-encoded u128).
    #[serde(serialize_with = "serialize_amount")]
    pub balance: Amount,
}

fn serialize_amount<S: serde::Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(amount)
}

/// Per-asset custodial balances plus the swap engine.
#[derive(Debug, Clone)]
pub struct PoolLedger {
    custody: Address,
    balances: HashMap<AssetId, Amount>,
}

impl PoolLedger {
    /// Creates empty pools held by `custody`.
    #[must_use]
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            balances: HashMap::new(),
        }
    }

    /// Rebuilds pools from persisted balances.
    #[must_use]
    pub fn from_balances(custody: Address, balances: HashMap<AssetId, Amount>) -> Self {
        Self { custody, balances }
    }

    /// The account holding pooled funds.
    #[must_use]
    pub const fn custody(&self) -> Address {
        self.custody
    }

    /// Pool balance of `asset` (zero if never funded).
    #[must_use]
    pub fn balance_of(&self, asset: AssetId) -> Amount {
        self.balances.get(&asset).copied().unwrap_or_default()
    }

    /// All funded pools ordered by asset.
    #[must_use]
    pub fn balances(&self) -> Vec<PoolBalance> {
        let mut pools: Vec<PoolBalance> = self
            .balances
            .iter()
            .map(|(&asset, &balance)| PoolBalance { asset, balance })
            .collect();
        pools.sort_by_key(|p| p.asset);
        pools
    }

    /// Rejects the custody account acting as a caller.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CustodyCaller`].
    pub fn ensure_external(&self, caller: &Address) -> Result<(), LedgerError> {
        if *caller == self.custody {
            return Err(LedgerError::CustodyCaller);
        }
        Ok(())
    }

    /// Adds `amount` of `asset` to its pool, pulling funds from the caller.
    ///
    /// For the native asset the attached value must equal `amount`; for a
    /// token no value may be attached and the caller must have approved the
    /// custody account for at least `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CustodyCaller`] when custody deposits into
    /// itself, [`LedgerError::AmountMismatch`] for a value/amount mismatch
    /// and [`LedgerError::TransferFailed`] when the pull is rejected.
    pub fn deposit(
        &mut self,
        host: &mut Host,
        ctx: &CallContext,
        asset: AssetId,
        amount: Amount,
    ) -> Result<DepositReceipt, LedgerError> {
        self.ensure_external(&ctx.caller)?;
        let expected_value = if asset.is_native() { amount } else { Amount::ZERO };
        if ctx.value != expected_value {
            return Err(LedgerError::AmountMismatch {
                expected: expected_value,
                attached: ctx.value,
            });
        }

        let pool_balance = self.balance_of(asset).safe_add(&amount)?;
        host.ensure_receive(asset, ctx, &self.custody, amount)?;

        host.receive(asset, ctx, self.custody, amount)?;
        self.balances.insert(asset, pool_balance);

        Ok(DepositReceipt {
            asset,
            depositor: ctx.caller,
            amount,
            pool_balance,
        })
    }

    /// Prices a swap without touching any state.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidNativeAmount`] /
    /// [`LedgerError::InvalidAmount`] for a zero input or a zero output
    /// (unset rate or dust), [`LedgerError::IdenticalAssets`], and
    /// [`LedgerError::InsufficientLiquidity`].
    pub fn quote(
        &self,
        rates: &RateRegistry,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: Amount,
    ) -> Result<SwapQuote, LedgerError> {
        if amount_in.is_zero() {
            return Err(invalid_amount_for(asset_in));
        }
        if asset_in == asset_out {
            return Err(LedgerError::IdenticalAssets);
        }

        let rate = rates.get_rate(asset_in, asset_out);
        let amount_out = rate.apply(amount_in)?;
        if amount_out.is_zero() {
            return Err(invalid_amount_for(asset_out));
        }

        let available = self.balance_of(asset_out);
        if available < amount_out {
            return Err(LedgerError::InsufficientLiquidity {
                asset: asset_out,
                available,
                requested: amount_out,
            });
        }

        Ok(SwapQuote {
            asset_in,
            asset_out,
            amount_in,
            amount_out,
            rate,
            available,
        })
    }

    /// Swaps `amount_in` of `asset_in` for `asset_out` at the registered
    /// rate as one all-or-nothing transition.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CustodyCaller`] when custody swaps against
    /// itself, [`LedgerError::InvalidNativeAmount`] if native input is not
    /// attached exactly (or value is attached to a token-input swap), then
    /// everything [`PoolLedger::quote`] returns, then
    /// [`LedgerError::TransferFailed`] if either transfer would be refused.
    pub fn swap(
        &mut self,
        rates: &RateRegistry,
        host: &mut Host,
        ctx: &CallContext,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: Amount,
    ) -> Result<SwapReceipt, LedgerError> {
        self.ensure_external(&ctx.caller)?;
        if asset_in.is_native() {
            if ctx.value != amount_in || amount_in.is_zero() {
                return Err(LedgerError::InvalidNativeAmount);
            }
        } else if amount_in.is_zero() {
            return Err(LedgerError::InvalidAmount);
        } else if !ctx.value.is_zero() {
            return Err(LedgerError::InvalidNativeAmount);
        }

        let quote = self.quote(rates, asset_in, asset_out, amount_in)?;
        let pool_in_balance = self.balance_of(asset_in).safe_add(&amount_in)?;
        let pool_out_balance = quote.available.safe_sub(&quote.amount_out)?;

        host.ensure_receive(asset_in, ctx, &self.custody, amount_in)?;
        host.ensure_send(asset_out, &self.custody, &ctx.caller, quote.amount_out)?;

        // Both transfers were checked above and touch different assets.
        host.receive(asset_in, ctx, self.custody, amount_in)?;
        host.send(asset_out, self.custody, ctx.caller, quote.amount_out)?;

        self.balances.insert(asset_in, pool_in_balance);
        self.balances.insert(asset_out, pool_out_balance);

        Ok(SwapReceipt {
            quote,
            caller: ctx.caller,
            pool_in_balance,
            pool_out_balance,
        })
    }
}

/// The zero-amount error for the side `asset` sits on.
fn invalid_amount_for(asset: AssetId) -> LedgerError {
    if asset.is_native() {
        LedgerError::InvalidNativeAmount
    } else {
        LedgerError::InvalidAmount
    }
}
