//! The exchange ledger: rate registry, pools and host in one state machine.
//!
//! [`Ledger`] is the single owner of all exchange state. Every method is a
//! synchronous, all-or-nothing transition; callers serialize access (the
//! service holds it behind one `RwLock`).

use hydra_amm::domain::Amount;

use super::host::{CallContext, Host};
use super::pool_ledger::{DepositReceipt, PoolBalance, PoolLedger, SwapQuote, SwapReceipt};
use super::token::TokenSummary;
use super::{Address, AssetId, BalanceLedger, Rate, RateEntry, RateRegistry};
use crate::error::{LedgerError, TokenError};

/// Complete exchange state.
#[derive(Debug, Clone)]
pub struct Ledger {
    rates: RateRegistry,
    pools: PoolLedger,
    host: Host,
}

impl Ledger {
    /// Creates an empty ledger administered by `admin` with pooled funds
    /// held by `custody`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroAddress`] if either account is zero and
    /// [`LedgerError::CustodyCaller`] if they are the same account.
    pub fn new(admin: Address, custody: Address) -> Result<Self, LedgerError> {
        if admin.is_zero() || custody.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if admin == custody {
            return Err(LedgerError::CustodyCaller);
        }
        Ok(Self {
            rates: RateRegistry::new(admin),
            pools: PoolLedger::new(custody),
            host: Host::new(),
        })
    }

    /// Assembles a ledger from already-validated parts.
    pub(crate) fn from_parts(rates: RateRegistry, pools: PoolLedger, host: Host) -> Self {
        Self { rates, pools, host }
    }

    /// Current administrator.
    #[must_use]
    pub const fn admin(&self) -> Address {
        self.rates.admin()
    }

    /// Custody account holding pooled funds.
    #[must_use]
    pub const fn custody(&self) -> Address {
        self.pools.custody()
    }

    /// The rate registry.
    #[must_use]
    pub const fn rates(&self) -> &RateRegistry {
        &self.rates
    }

    /// The pool ledger.
    #[must_use]
    pub const fn pools(&self) -> &PoolLedger {
        &self.pools
    }

    /// Tokens and native balances.
    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    // -- rate registry ---------------------------------------------------

    /// Sets a directional rate; see [`RateRegistry::set_rate`].
    ///
    /// # Errors
    ///
    /// Same as [`RateRegistry::set_rate`].
    pub fn set_rate(
        &mut self,
        caller: Address,
        asset_in: AssetId,
        asset_out: AssetId,
        rate: Rate,
    ) -> Result<Rate, LedgerError> {
        self.rates.set_rate(caller, asset_in, asset_out, rate)
    }

    /// Rate for `asset_in → asset_out`, zero if unset.
    #[must_use]
    pub fn get_rate(&self, asset_in: AssetId, asset_out: AssetId) -> Rate {
        self.rates.get_rate(asset_in, asset_out)
    }

    /// All registered rates.
    #[must_use]
    pub fn list_rates(&self) -> Vec<RateEntry> {
        self.rates.entries()
    }

    /// Hands administration to `new_admin`.
    ///
    /// # Errors
    ///
    /// Same as [`RateRegistry::transfer_admin`], plus
    /// [`LedgerError::CustodyCaller`] when `new_admin` is the custody account.
    pub fn transfer_admin(&mut self, caller: Address, new_admin: Address) -> Result<Address, LedgerError> {
        self.pools.ensure_external(&new_admin)?;
        self.rates.transfer_admin(caller, new_admin)
    }

    // -- pools -----------------------------------------------------------

    /// Deposits into the pool of `asset`.
    ///
    /// # Errors
    ///
    /// Same as [`PoolLedger::deposit`].
    pub fn deposit_token(
        &mut self,
        ctx: &CallContext,
        asset: AssetId,
        amount: Amount,
    ) -> Result<DepositReceipt, LedgerError> {
        self.pools.deposit(&mut self.host, ctx, asset, amount)
    }

    /// Executes a swap.
    ///
    /// # Errors
    ///
    /// Same as [`PoolLedger::swap`].
    pub fn swap(
        &mut self,
        ctx: &CallContext,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: Amount,
    ) -> Result<SwapReceipt, LedgerError> {
        self.pools
            .swap(&self.rates, &mut self.host, ctx, asset_in, asset_out, amount_in)
    }

    /// Prices a swap without executing it.
    ///
    /// # Errors
    ///
    /// Same as [`PoolLedger::quote`].
    pub fn quote_swap(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: Amount,
    ) -> Result<SwapQuote, LedgerError> {
        self.pools.quote(&self.rates, asset_in, asset_out, amount_in)
    }

    /// Pool balance of `asset`.
    #[must_use]
    pub fn pool_balance(&self, asset: AssetId) -> Amount {
        self.pools.balance_of(asset)
    }

    /// All funded pools.
    #[must_use]
    pub fn list_pools(&self) -> Vec<PoolBalance> {
        self.pools.balances()
    }

    // -- tokens and native value ------------------------------------------

    /// Deploys a token whose initial supply is minted to `deployer`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CustodyCaller`] when the custody account
    /// deploys, and [`LedgerError::TransferFailed`] for a zero deployer.
    pub fn deploy_token(
        &mut self,
        deployer: Address,
        name: &str,
        symbol: &str,
        initial_supply: Amount,
    ) -> Result<TokenSummary, LedgerError> {
        self.pools.ensure_external(&deployer)?;
        let address = self.host.deploy_token(deployer, name, symbol, initial_supply)?;
        Ok(self.token_info(&address)?)
    }

    /// Token metadata.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnknownToken`].
    pub fn token_info(&self, token: &Address) -> Result<TokenSummary, TokenError> {
        self.host.token(token).map(TokenSummary::from)
    }

    /// Token balance of `account`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnknownToken`].
    pub fn token_balance(&self, token: &Address, account: &Address) -> Result<Amount, TokenError> {
        Ok(self.host.token(token)?.balance_of(account))
    }

    /// Allowance of `spender` over `owner`'s balance.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnknownToken`].
    pub fn token_allowance(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
    ) -> Result<Amount, TokenError> {
        Ok(self.host.token(token)?.allowance(owner, spender))
    }

    /// Transfers `amount` of `token` from the caller to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CustodyCaller`] when the caller is the
    /// custody account, otherwise the token's failure as
    /// [`LedgerError::TransferFailed`].
    pub fn token_transfer(
        &mut self,
        caller: Address,
        token: &Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.pools.ensure_external(&caller)?;
        Ok(self.host.token_mut(token)?.transfer(caller, to, amount)?)
    }

    /// Sets the caller's allowance for `spender`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CustodyCaller`] when the caller is the
    /// custody account, and [`LedgerError::TransferFailed`] for an unknown
    /// token or a zero spender.
    pub fn token_approve(
        &mut self,
        caller: Address,
        token: &Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.pools.ensure_external(&caller)?;
        if spender.is_zero() {
            return Err(TokenError::ZeroAddress.into());
        }
        self.host.token_mut(token)?.approve(caller, spender, amount);
        Ok(())
    }

    /// Mints `amount` of `token` to `to`; token owner only.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CustodyCaller`] when the caller is the
    /// custody account, otherwise the token's failure as
    /// [`LedgerError::TransferFailed`].
    pub fn token_mint(
        &mut self,
        caller: Address,
        token: &Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.pools.ensure_external(&caller)?;
        Ok(self.host.token_mut(token)?.mint(caller, to, amount)?)
    }

    /// Native balance of `account`.
    #[must_use]
    pub fn native_balance(&self, account: &Address) -> Amount {
        self.host.native().balance_of(account)
    }

    /// Moves native value from the caller to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CustodyCaller`] when the caller is the
    /// custody account, and [`LedgerError::TransferFailed`] for an
    /// insufficient balance or a zero recipient.
    pub fn native_transfer(&mut self, caller: Address, to: Address, amount: Amount) -> Result<(), LedgerError> {
        self.pools.ensure_external(&caller)?;
        Ok(self.host.native_mut().transfer(caller, to, amount)?)
    }

    /// Credits newly issued native value (genesis funding).
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ZeroAddress`] or [`TokenError::Overflow`].
    pub fn credit_native(&mut self, account: Address, amount: Amount) -> Result<(), TokenError> {
        self.host.native_mut().credit(account, amount)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::RATE_SCALE;
    use tokio_test::{assert_err, assert_ok};

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn ledger() -> Ledger {
        let Ok(ledger) = Ledger::new(addr(1), addr(0xcc)) else {
            panic!("valid ledger");
        };
        ledger
    }

    #[test]
    fn zero_admin_or_custody_rejected() {
        assert!(Ledger::new(Address::ZERO, addr(2)).is_err());
        assert!(Ledger::new(addr(1), Address::ZERO).is_err());
    }

    #[test]
    fn admin_is_deployer() {
        assert_eq!(ledger().admin(), addr(1));
        assert_eq!(ledger().custody(), addr(0xcc));
    }

    #[test]
    fn token_lifecycle_through_facade() {
        let mut ledger = ledger();
        let summary = assert_ok!(ledger.deploy_token(addr(1), "infi", "IF", Amount::new(1_000)));
        let token = summary.address;
        assert_eq!(summary.total_supply, "1000");

        assert_ok!(ledger.token_transfer(addr(1), &token, addr(2), Amount::new(100)));
        assert_ok!(ledger.token_approve(addr(2), &token, addr(0xcc), Amount::new(40)));
        assert_eq!(
            ledger.token_allowance(&token, &addr(2), &addr(0xcc)).ok(),
            Some(Amount::new(40))
        );

        let err = assert_err!(ledger.token_mint(addr(2), &token, addr(2), Amount::new(1)));
        assert!(matches!(err, LedgerError::TransferFailed(TokenError::NotOwner(a)) if a == addr(2)));
        assert_ok!(ledger.token_mint(addr(1), &token, addr(2), Amount::new(5)));
        assert_eq!(ledger.token_balance(&token, &addr(2)).ok(), Some(Amount::new(105)));
    }

    #[test]
    fn deposit_then_swap_through_facade() {
        let mut ledger = ledger();
        let custody = ledger.custody();
        let Ok(summary) = ledger.deploy_token(addr(1), "infi", "IF", Amount::new(1_000)) else {
            panic!("deploy");
        };
        let infi = AssetId::Token(summary.address);
        assert_ok!(ledger.credit_native(addr(1), Amount::new(500)));
        assert_ok!(ledger.token_approve(addr(1), &summary.address, custody, Amount::new(1_000)));

        let native_ctx = CallContext::with_value(addr(1), Amount::new(300));
        assert_ok!(ledger.deposit_token(&native_ctx, AssetId::Native, Amount::new(300)));
        assert_ok!(ledger.set_rate(addr(1), infi, AssetId::Native, Rate::new(2 * RATE_SCALE)));

        let quote = assert_ok!(ledger.quote_swap(infi, AssetId::Native, Amount::new(100)));
        assert_eq!(quote.amount_out, Amount::new(200));

        let receipt = assert_ok!(ledger.swap(&CallContext::new(addr(1)), infi, AssetId::Native, Amount::new(100)));
        assert_eq!(receipt.pool_out_balance, Amount::new(100));
        assert_eq!(ledger.pool_balance(infi), Amount::new(100));
        assert_eq!(ledger.native_balance(&addr(1)), Amount::new(400));
        assert_eq!(ledger.list_pools().len(), 2);
    }

    #[test]
    fn approve_zero_spender_rejected() {
        let mut ledger = ledger();
        let Ok(summary) = ledger.deploy_token(addr(1), "infi", "IF", Amount::new(1)) else {
            panic!("deploy");
        };
        let err = assert_err!(ledger.token_approve(addr(1), &summary.address, Address::ZERO, Amount::new(1)));
        assert!(matches!(err, LedgerError::TransferFailed(TokenError::ZeroAddress)));
    }

    #[test]
    fn custody_cannot_share_the_admin_account() {
        assert!(matches!(
            Ledger::new(addr(1), addr(1)),
            Err(LedgerError::CustodyCaller)
        ));
        let mut ledger = ledger();
        let err = assert_err!(ledger.transfer_admin(addr(1), addr(0xcc)));
        assert!(matches!(err, LedgerError::CustodyCaller));
        assert_eq!(ledger.admin(), addr(1));
    }

    /// Ledger with 500 infi and 50 native pooled, custody holding both.
    fn pooled() -> (Ledger, Address) {
        let mut ledger = ledger();
        let custody = ledger.custody();
        let Ok(summary) = ledger.deploy_token(addr(1), "infi", "IF", Amount::new(1_000)) else {
            panic!("deploy");
        };
        let infi = AssetId::Token(summary.address);
        assert_ok!(ledger.token_approve(addr(1), &summary.address, custody, Amount::new(500)));
        assert_ok!(ledger.deposit_token(&CallContext::new(addr(1)), infi, Amount::new(500)));
        assert_ok!(ledger.credit_native(addr(1), Amount::new(50)));
        let native_ctx = CallContext::with_value(addr(1), Amount::new(50));
        assert_ok!(ledger.deposit_token(&native_ctx, AssetId::Native, Amount::new(50)));
        (ledger, summary.address)
    }

    #[test]
    fn custody_cannot_move_pooled_tokens() {
        let (mut ledger, token) = pooled();
        let custody = ledger.custody();

        let err = assert_err!(ledger.token_transfer(custody, &token, addr(9), Amount::new(500)));
        assert!(matches!(err, LedgerError::CustodyCaller));
        let err = assert_err!(ledger.token_approve(custody, &token, addr(9), Amount::new(500)));
        assert!(matches!(err, LedgerError::CustodyCaller));

        assert_eq!(ledger.token_balance(&token, &custody).ok(), Some(Amount::new(500)));
        assert_eq!(ledger.token_allowance(&token, &custody, &addr(9)).ok(), Some(Amount::ZERO));
        assert_eq!(ledger.pool_balance(AssetId::Token(token)), Amount::new(500));
    }

    #[test]
    fn custody_cannot_move_pooled_native_value() {
        let (mut ledger, _) = pooled();
        let custody = ledger.custody();

        let err = assert_err!(ledger.native_transfer(custody, addr(9), Amount::new(50)));
        assert!(matches!(err, LedgerError::CustodyCaller));
        assert_eq!(ledger.native_balance(&custody), Amount::new(50));
        assert_eq!(ledger.native_balance(&addr(9)), Amount::ZERO);
    }

    #[test]
    fn custody_cannot_deploy_or_mint() {
        let (mut ledger, token) = pooled();
        let custody = ledger.custody();

        let err = assert_err!(ledger.deploy_token(custody, "fake", "FK", Amount::new(1)));
        assert!(matches!(err, LedgerError::CustodyCaller));
        let err = assert_err!(ledger.token_mint(custody, &token, custody, Amount::new(1)));
        assert!(matches!(err, LedgerError::CustodyCaller));
    }

    #[test]
    fn custody_cannot_deposit_or_swap_into_its_own_pools() {
        let (mut ledger, token) = pooled();
        let custody = ledger.custody();
        let infi = AssetId::Token(token);
        assert_ok!(ledger.set_rate(addr(1), AssetId::Native, infi, Rate::new(RATE_SCALE)));

        let as_custody = CallContext::with_value(custody, Amount::new(50));
        let err = assert_err!(ledger.deposit_token(&as_custody, AssetId::Native, Amount::new(50)));
        assert!(matches!(err, LedgerError::CustodyCaller));
        let err = assert_err!(ledger.swap(&as_custody, AssetId::Native, infi, Amount::new(50)));
        assert!(matches!(err, LedgerError::CustodyCaller));

        assert_eq!(ledger.pool_balance(AssetId::Native), Amount::new(50));
        assert_eq!(ledger.pool_balance(infi), Amount::new(500));
        assert_eq!(ledger.native_balance(&custody), Amount::new(50));
    }
}
