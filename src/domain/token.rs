//! Mintable fungible token ("MyToken").
//!
//! [`FungibleToken`] is the in-process token contract whose balances the
//! exchange pulls from and pushes to. The constructor mints the whole
//! initial supply to the deploying account; afterwards only the owner may
//! mint.

use std::collections::HashMap;

use hydra_amm::domain::Amount;
use serde::Serialize;

use super::Address;
use super::balance_ledger::BalanceLedger;
use crate::error::TokenError;

/// Decimal places of every token deployed through the exchange host.
pub const TOKEN_DECIMALS: u8 = 18;

/// A mintable, transferable token ledger.
#[derive(Debug, Clone)]
pub struct FungibleToken {
    address: Address,
    name: String,
    symbol: String,
    owner: Address,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
}

impl FungibleToken {
    /// Deploys a token and mints `initial_supply` to `owner`.
    #[must_use]
    pub fn new(
        address: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        owner: Address,
        initial_supply: Amount,
    ) -> Self {
        let mut balances = HashMap::new();
        if !initial_supply.is_zero() {
            balances.insert(owner, initial_supply);
        }
        Self {
            address,
            name: name.into(),
            symbol: symbol.into(),
            owner,
            total_supply: initial_supply,
            balances,
            allowances: HashMap::new(),
        }
    }

    /// Contract address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Token name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Always [`TOKEN_DECIMALS`].
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    /// Account allowed to mint.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Sum of all balances.
    #[must_use]
    pub const fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Non-zero balances, unordered.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Non-zero allowances as `((owner, spender), amount)`, unordered.
    pub fn allowances(&self) -> impl Iterator<Item = (&(Address, Address), &Amount)> {
        self.allowances.iter()
    }

    /// Mints `amount` to `to`. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::NotOwner`], [`TokenError::ZeroAddress`] or
    /// [`TokenError::Overflow`].
    pub fn mint(&mut self, caller: Address, to: Address, amount: Amount) -> Result<(), TokenError> {
        if caller != self.owner {
            return Err(TokenError::NotOwner(caller));
        }
        if to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let supply = self
            .total_supply
            .checked_add(&amount)
            .ok_or(TokenError::Overflow)?;
        let balance = self
            .balance_of(&to)
            .checked_add(&amount)
            .ok_or(TokenError::Overflow)?;
        self.total_supply = supply;
        self.set_balance(to, balance);
        Ok(())
    }

    /// Rebuilds a token from persisted parts.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Overflow`] if the balances do not sum to a
    /// representable supply.
    pub fn from_parts(
        address: Address,
        name: String,
        symbol: String,
        owner: Address,
        balances: HashMap<Address, Amount>,
        allowances: HashMap<(Address, Address), Amount>,
    ) -> Result<Self, TokenError> {
        let total_supply = balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.checked_add(b))
            .ok_or(TokenError::Overflow)?;
        Ok(Self {
            address,
            name,
            symbol,
            owner,
            total_supply,
            balances,
            allowances,
        })
    }

    fn set_balance(&mut self, account: Address, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }
}

impl BalanceLedger for FungibleToken {
    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), TokenError> {
        self.ensure_transfer(&from, &to, amount)?;
        if from == to {
            return Ok(());
        }
        let from_balance = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(TokenError::Overflow)?;
        let to_balance = self
            .balance_of(&to)
            .checked_add(&amount)
            .ok_or(TokenError::Overflow)?;
        self.set_balance(from, from_balance);
        self.set_balance(to, to_balance);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.ensure_transfer_from(&spender, &from, &to, amount)?;
        let remaining = self
            .allowance(&from, &spender)
            .checked_sub(&amount)
            .ok_or(TokenError::Overflow)?;
        self.transfer(from, to, amount)?;
        self.approve(from, spender, remaining);
        Ok(())
    }
}

/// Read-only token metadata.
#[derive(Debug, Clone, Serialize)]
pub struct TokenSummary {
    /// Contract address.
    pub address: Address,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Decimal places.
    pub decimals: u8,
    /// Minting account.
    pub owner: Address,
    /// Total supply (string-encoded u128).
    pub total_supply: String,
}

impl From<&FungibleToken> for TokenSummary {
    fn from(token: &FungibleToken) -> Self {
        Self {
            address: token.address,
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            decimals: token.decimals(),
            owner: token.owner,
            total_supply: token.total_supply.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    const SUPPLY: u128 = 50_000;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn token() -> FungibleToken {
        FungibleToken::new(addr(0xee), "phuoc", "p", addr(1), Amount::new(SUPPLY))
    }

    #[test]
    fn constructor_mints_supply_to_owner() {
        let t = token();
        assert_eq!(t.total_supply(), Amount::new(SUPPLY));
        assert_eq!(t.balance_of(&addr(1)), Amount::new(SUPPLY));
        assert_eq!(t.decimals(), 18);
    }

    #[test]
    fn transfer_moves_balance() {
        let mut t = token();
        assert_ok!(t.transfer(addr(1), addr(2), Amount::new(500)));
        assert_eq!(t.balance_of(&addr(1)), Amount::new(SUPPLY - 500));
        assert_eq!(t.balance_of(&addr(2)), Amount::new(500));
        assert_eq!(t.total_supply(), Amount::new(SUPPLY));
    }

    #[test]
    fn transfer_exceeding_balance_fails() {
        let mut t = token();
        let err = assert_err!(t.transfer(addr(2), addr(1), Amount::new(1)));
        assert_eq!(
            err,
            TokenError::InsufficientBalance {
                have: Amount::ZERO,
                need: Amount::new(1)
            }
        );
    }

    #[test]
    fn transfer_to_zero_address_fails() {
        let mut t = token();
        let err = assert_err!(t.transfer(addr(1), Address::ZERO, Amount::new(1)));
        assert_eq!(err, TokenError::ZeroAddress);
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut t = token();
        t.approve(addr(1), addr(9), Amount::new(100));
        assert_ok!(t.transfer_from(addr(9), addr(1), addr(3), Amount::new(40)));
        assert_eq!(t.allowance(&addr(1), &addr(9)), Amount::new(60));
        assert_eq!(t.balance_of(&addr(3)), Amount::new(40));
    }

    #[test]
    fn transfer_from_checks_allowance_before_balance() {
        let mut t = token();
        let err = assert_err!(t.transfer_from(addr(9), addr(2), addr(3), Amount::new(1)));
        assert!(matches!(err, TokenError::InsufficientAllowance { .. }));
    }

    #[test]
    fn failed_transfer_from_leaves_state_untouched() {
        let mut t = token();
        t.approve(addr(2), addr(9), Amount::new(100));
        let err = assert_err!(t.transfer_from(addr(9), addr(2), addr(3), Amount::new(10)));
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
        assert_eq!(t.allowance(&addr(2), &addr(9)), Amount::new(100));
    }

    #[test]
    fn only_owner_mints() {
        let mut t = token();
        let err = assert_err!(t.mint(addr(2), addr(2), Amount::new(1)));
        assert_eq!(err, TokenError::NotOwner(addr(2)));

        assert_ok!(t.mint(addr(1), addr(2), Amount::new(7)));
        assert_eq!(t.balance_of(&addr(2)), Amount::new(7));
        assert_eq!(t.total_supply(), Amount::new(SUPPLY + 7));
    }

    #[test]
    fn from_parts_recomputes_supply() {
        let mut balances = HashMap::new();
        balances.insert(addr(1), Amount::new(10));
        balances.insert(addr(2), Amount::new(5));
        let t = assert_ok!(FungibleToken::from_parts(
            addr(0xee),
            "curve".to_string(),
            "CR".to_string(),
            addr(1),
            balances,
            HashMap::new(),
        ));
        assert_eq!(t.total_supply(), Amount::new(15));
    }
}
