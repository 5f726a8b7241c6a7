//! Execution host: token contracts, native bank, and call context.
//!
//! The [`Host`] is everything outside the exchange that the exchange moves
//! value through. Its asset-generic `ensure_*` / `receive` / `send` helpers
//! let the swap engine treat the native asset and tokens uniformly.

use std::collections::BTreeMap;

use hydra_amm::domain::Amount;

use super::balance_ledger::BalanceLedger;
use super::native_bank::NativeBank;
use super::token::FungibleToken;
use super::{Address, AssetId};
use crate::error::TokenError;

/// Identity of the caller and native value attached to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Account issuing the call.
    pub caller: Address,
    /// Native value attached to the call.
    pub value: Amount,
}

impl CallContext {
    /// A call with no attached value.
    #[must_use]
    pub const fn new(caller: Address) -> Self {
        Self {
            caller,
            value: Amount::ZERO,
        }
    }

    /// A call carrying `value` of the native asset.
    #[must_use]
    pub const fn with_value(caller: Address, value: Amount) -> Self {
        Self { caller, value }
    }
}

/// Token directory plus native balances.
#[derive(Debug, Clone, Default)]
pub struct Host {
    tokens: BTreeMap<Address, FungibleToken>,
    native: NativeBank,
}

impl Host {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploys a new token at a fresh address, minting `initial_supply` to
    /// `deployer`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ZeroAddress`] if `deployer` is the zero address.
    pub fn deploy_token(
        &mut self,
        deployer: Address,
        name: &str,
        symbol: &str,
        initial_supply: Amount,
    ) -> Result<Address, TokenError> {
        if deployer.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let mut address = Address::random();
        while self.tokens.contains_key(&address) {
            address = Address::random();
        }
        let token = FungibleToken::new(address, name, symbol, deployer, initial_supply);
        self.tokens.insert(address, token);
        Ok(address)
    }

    /// Installs an already-built token (snapshot restore).
    pub fn install_token(&mut self, token: FungibleToken) {
        self.tokens.insert(token.address(), token);
    }

    /// Looks up a token contract.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnknownToken`] if nothing is deployed there.
    pub fn token(&self, address: &Address) -> Result<&FungibleToken, TokenError> {
        self.tokens
            .get(address)
            .ok_or(TokenError::UnknownToken(*address))
    }

    /// Mutable token lookup.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnknownToken`] if nothing is deployed there.
    pub fn token_mut(&mut self, address: &Address) -> Result<&mut FungibleToken, TokenError> {
        self.tokens
            .get_mut(address)
            .ok_or(TokenError::UnknownToken(*address))
    }

    /// All deployed tokens ordered by address.
    pub fn tokens(&self) -> impl Iterator<Item = &FungibleToken> {
        self.tokens.values()
    }

    /// Native balances.
    #[must_use]
    pub const fn native(&self) -> &NativeBank {
        &self.native
    }

    /// Mutable native balances.
    pub fn native_mut(&mut self) -> &mut NativeBank {
        &mut self.native
    }

    /// Balance of `account` in `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnknownToken`] for an undeployed token.
    pub fn balance_of(&self, asset: AssetId, account: &Address) -> Result<Amount, TokenError> {
        match asset {
            AssetId::Native => Ok(self.native.balance_of(account)),
            AssetId::Token(token) => Ok(self.token(&token)?.balance_of(account)),
        }
    }

    /// Checks that `amount` of `asset` can be pulled from `ctx.caller` into
    /// `custody`. Native value must already be attached to the call.
    ///
    /// # Errors
    ///
    /// Returns the [`TokenError`] the pull would fail with.
    pub fn ensure_receive(
        &self,
        asset: AssetId,
        ctx: &CallContext,
        custody: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        match asset {
            AssetId::Native => self.native.ensure_transfer(&ctx.caller, custody, amount),
            AssetId::Token(token) => {
                self.token(&token)?
                    .ensure_transfer_from(custody, &ctx.caller, custody, amount)
            }
        }
    }

    /// Pulls `amount` of `asset` from `ctx.caller` into `custody`.
    ///
    /// # Errors
    ///
    /// Same as [`Host::ensure_receive`].
    pub fn receive(
        &mut self,
        asset: AssetId,
        ctx: &CallContext,
        custody: Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        match asset {
            AssetId::Native => self.native.transfer(ctx.caller, custody, amount),
            AssetId::Token(token) => {
                self.token_mut(&token)?
                    .transfer_from(custody, ctx.caller, custody, amount)
            }
        }
    }

    /// Checks that `custody` can release `amount` of `asset` to `to`.
    ///
    /// # Errors
    ///
    /// Returns the [`TokenError`] the push would fail with.
    pub fn ensure_send(
        &self,
        asset: AssetId,
        custody: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        match asset {
            AssetId::Native => self.native.ensure_transfer(custody, to, amount),
            AssetId::Token(token) => self.token(&token)?.ensure_transfer(custody, to, amount),
        }
    }

    /// Releases `amount` of `asset` from `custody` to `to`.
    ///
    /// # Errors
    ///
    /// Same as [`Host::ensure_send`].
    pub fn send(
        &mut self,
        asset: AssetId,
        custody: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        match asset {
            AssetId::Native => self.native.transfer(custody, to, amount),
            AssetId::Token(token) => self.token_mut(&token)?.transfer(custody, to, amount),
        }
    }
}
