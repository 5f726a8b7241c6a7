//! Native-asset balances and the value-transfer primitive.

use std::collections::HashMap;

use hydra_amm::domain::Amount;

use super::Address;
use crate::error::TokenError;

/// Per-account balances of the native asset.
#[derive(Debug, Clone, Default)]
pub struct NativeBank {
    balances: HashMap<Address, Amount>,
}

impl NativeBank {
    /// Creates an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of `account` (zero if never credited).
    #[must_use]
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Non-zero balances, unordered.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Sum of all balances.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Overflow`] if the sum does not fit in a `u128`.
    pub fn total(&self) -> Result<Amount, TokenError> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.checked_add(b))
            .ok_or(TokenError::Overflow)
    }

    /// Credits newly issued value (genesis allocation, snapshot restore).
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ZeroAddress`] or [`TokenError::Overflow`].
    pub fn credit(&mut self, account: Address, amount: Amount) -> Result<(), TokenError> {
        if account.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let balance = self
            .balance_of(&account)
            .checked_add(&amount)
            .ok_or(TokenError::Overflow)?;
        self.set_balance(account, balance);
        Ok(())
    }

    /// Checks that `from` could send `amount` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ZeroAddress`] or
    /// [`TokenError::InsufficientBalance`].
    pub fn ensure_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let have = self.balance_of(from);
        if have < amount {
            return Err(TokenError::InsufficientBalance { have, need: amount });
        }
        Ok(())
    }

    /// Moves `amount` of native value from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Same as [`NativeBank::ensure_transfer`].
    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), TokenError> {
        self.ensure_transfer(&from, &to, amount)?;
        if from == to || amount.is_zero() {
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

    fn set_balance(&mut self, account: Address, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
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

    #[test]
    fn credit_and_transfer() {
        let mut bank = NativeBank::new();
        assert_ok!(bank.credit(addr(1), Amount::new(100)));
        assert_ok!(bank.transfer(addr(1), addr(2), Amount::new(30)));
        assert_eq!(bank.balance_of(&addr(1)), Amount::new(70));
        assert_eq!(bank.balance_of(&addr(2)), Amount::new(30));
        assert_eq!(bank.total().ok(), Some(Amount::new(100)));
    }

    #[test]
    fn overdraft_is_rejected_without_effect() {
        let mut bank = NativeBank::new();
        assert_ok!(bank.credit(addr(1), Amount::new(10)));
        let err = assert_err!(bank.transfer(addr(1), addr(2), Amount::new(11)));
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
        assert_eq!(bank.balance_of(&addr(1)), Amount::new(10));
        assert_eq!(bank.balance_of(&addr(2)), Amount::ZERO);
    }

    #[test]
    fn zero_address_cannot_be_credited() {
        let mut bank = NativeBank::new();
        let err = assert_err!(bank.credit(Address::ZERO, Amount::new(1)));
        assert_eq!(err, TokenError::ZeroAddress);
    }
}
