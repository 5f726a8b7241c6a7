//! The balance-ledger interface the exchange consumes from token contracts.

use hydra_amm::domain::Amount;

use super::Address;
use crate::error::TokenError;

/// Standard fungible-token balance operations.
///
/// Transfers conserve total supply. The `ensure_*` methods perform the same
/// checks as their mutating counterparts without side effects, so callers
/// can validate a multi-step transition before touching any balance.
pub trait BalanceLedger {
    /// Returns the balance of `account` (zero if never credited).
    fn balance_of(&self, account: &Address) -> Amount;

    /// Returns how much `spender` may move on behalf of `owner`.
    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Sets the allowance of `spender` over `owner`'s balance.
    fn approve(&mut self, owner: Address, spender: Address, amount: Amount);

    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InsufficientBalance`] or
    /// [`TokenError::ZeroAddress`].
    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), TokenError>;

    /// Moves `amount` from `from` to `to` using `spender`'s allowance.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InsufficientAllowance`] before any balance
    /// check, then the same errors as [`BalanceLedger::transfer`].
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TokenError>;

    /// Checks that `from` could send `amount` to `to`.
    ///
    /// # Errors
    ///
    /// Same as [`BalanceLedger::transfer`].
    fn ensure_transfer(&self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let have = self.balance_of(from);
        if have < amount {
            return Err(TokenError::InsufficientBalance { have, need: amount });
        }
        Ok(())
    }

    /// Checks that `spender` could move `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Same as [`BalanceLedger::transfer_from`].
    fn ensure_transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let have = self.allowance(from, spender);
        if have < amount {
            return Err(TokenError::InsufficientAllowance { have, need: amount });
        }
        self.ensure_transfer(from, to, amount)
    }
}
