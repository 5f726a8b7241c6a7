//! Exchange service: serializes ledger transitions and emits events.

use std::sync::Arc;

use chrono::Utc;
use hydra_amm::domain::Amount;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    Address, AssetId, CallContext, DepositReceipt, EventBus, Ledger, LedgerEvent, LedgerState,
    PoolBalance, Rate, RateEntry, SwapQuote, SwapReceipt, TokenSummary,
};
use crate::error::{GatewayError, LedgerError};

/// A committed swap together with its identifier.
#[derive(Debug, Clone, Copy)]
pub struct ExecutedSwap {
    /// Identifier carried by the `swap_executed` event.
    pub swap_id: Uuid,
    /// Swap outcome.
    pub receipt: SwapReceipt,
}

/// Orchestration layer for every exchange operation.
///
/// Owns the [`Ledger`] behind a single [`RwLock`], which gives all
/// transitions one total order, and the [`EventBus`] for event emission.
/// Every mutation method follows the pattern: acquire write lock → run
/// the ledger transition → release the lock → emit events → return.
/// Failed transitions emit nothing.
#[derive(Debug, Clone)]
pub struct ExchangeService {
    ledger: Arc<RwLock<Ledger>>,
    event_bus: EventBus,
}

impl ExchangeService {
    /// Creates a service around an existing ledger.
    #[must_use]
    pub fn new(ledger: Ledger, event_bus: EventBus) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    fn emit(&self, event: LedgerEvent) {
        let receivers = self.event_bus.publish(event);
        tracing::trace!(receivers, "event published");
    }

    // -- administration and rates ------------------------------------------

    /// Current administrator.
    pub async fn admin(&self) -> Address {
        self.ledger.read().await.admin()
    }

    /// Hands administration to `new_admin`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if `caller` is not the administrator or
    /// `new_admin` is the zero address.
    pub async fn transfer_admin(&self, caller: Address, new_admin: Address) -> Result<Address, GatewayError> {
        let previous_admin = self
            .ledger
            .write()
            .await
            .transfer_admin(caller, new_admin)
            .inspect_err(|e| warn_rejected(e, "transfer_admin"))?;

        tracing::info!(%previous_admin, %new_admin, "administration transferred");
        self.emit(LedgerEvent::AdminTransferred {
            previous_admin,
            new_admin,
            timestamp: Utc::now(),
        });
        Ok(previous_admin)
    }

    /// Registers, overwrites or (with a zero rate) clears a directional rate.
    /// Returns the previous rate.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if `caller` is not the administrator or
    /// both assets are the same.
    pub async fn set_rate(
        &self,
        caller: Address,
        asset_in: AssetId,
        asset_out: AssetId,
        rate: Rate,
    ) -> Result<Rate, GatewayError> {
        let previous = self
            .ledger
            .write()
            .await
            .set_rate(caller, asset_in, asset_out, rate)
            .inspect_err(|e| warn_rejected(e, "set_rate"))?;

        tracing::info!(%asset_in, %asset_out, %rate, %previous, "rate set");
        self.emit(LedgerEvent::RateSet {
            asset_in,
            asset_out,
            rate: rate.to_string(),
            previous_rate: previous.to_string(),
            admin: caller,
            timestamp: Utc::now(),
        });
        Ok(previous)
    }

    /// Rate for `asset_in → asset_out`, zero if unset.
    pub async fn get_rate(&self, asset_in: AssetId, asset_out: AssetId) -> Rate {
        self.ledger.read().await.get_rate(asset_in, asset_out)
    }

    /// All registered rates.
    pub async fn list_rates(&self) -> Vec<RateEntry> {
        self.ledger.read().await.list_rates()
    }

    // -- pools and swaps -----------------------------------------------------

    /// Deposits `amount` of `asset` into its pool.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the attached value does not match or
    /// the pull from the caller is refused.
    pub async fn deposit_token(
        &self,
        ctx: CallContext,
        asset: AssetId,
        amount: Amount,
    ) -> Result<DepositReceipt, GatewayError> {
        let receipt = self
            .ledger
            .write()
            .await
            .deposit_token(&ctx, asset, amount)
            .inspect_err(|e| warn_rejected(e, "deposit"))?;

        tracing::info!(
            %asset,
            depositor = %receipt.depositor,
            amount = %receipt.amount,
            pool_balance = %receipt.pool_balance,
            "deposit accepted"
        );
        self.emit(LedgerEvent::Deposited {
            asset,
            depositor: receipt.depositor,
            amount: receipt.amount.to_string(),
            pool_balance: receipt.pool_balance.to_string(),
            timestamp: Utc::now(),
        });
        Ok(receipt)
    }

    /// Executes a swap at the registered rate.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] for invalid amounts, identical assets,
    /// insufficient liquidity or a refused transfer. State is unchanged on
    /// error.
    pub async fn swap(
        &self,
        ctx: CallContext,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: Amount,
    ) -> Result<ExecutedSwap, GatewayError> {
        let receipt = self
            .ledger
            .write()
            .await
            .swap(&ctx, asset_in, asset_out, amount_in)
            .inspect_err(|e| warn_rejected(e, "swap"))?;
        let swap_id = Uuid::new_v4();
        let quote = receipt.quote;

        tracing::info!(
            %swap_id,
            caller = %receipt.caller,
            %asset_in,
            %asset_out,
            amount_in = %quote.amount_in,
            amount_out = %quote.amount_out,
            "swap executed"
        );
        self.emit(LedgerEvent::SwapExecuted {
            swap_id,
            caller: receipt.caller,
            asset_in,
            asset_out,
            amount_in: quote.amount_in.to_string(),
            amount_out: quote.amount_out.to_string(),
            rate: quote.rate.to_string(),
            pool_in_balance: receipt.pool_in_balance.to_string(),
            pool_out_balance: receipt.pool_out_balance.to_string(),
            timestamp: Utc::now(),
        });
        Ok(ExecutedSwap { swap_id, receipt })
    }

    /// Prices a swap against current state without executing it.
    ///
    /// # Errors
    ///
    /// Returns the [`GatewayError`] the swap would fail with before any
    /// transfer is attempted.
    pub async fn quote_swap(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: Amount,
    ) -> Result<SwapQuote, GatewayError> {
        Ok(self
            .ledger
            .read()
            .await
            .quote_swap(asset_in, asset_out, amount_in)?)
    }

    /// Pool balance of `asset`.
    pub async fn pool_balance(&self, asset: AssetId) -> Amount {
        self.ledger.read().await.pool_balance(asset)
    }

    /// All funded pools.
    pub async fn list_pools(&self) -> Vec<PoolBalance> {
        self.ledger.read().await.list_pools()
    }

    /// The custody account holding pooled funds.
    pub async fn custody(&self) -> Address {
        self.ledger.read().await.custody()
    }

    // -- tokens ------------------------------------------------------------------

    /// Deploys a token with its initial supply minted to `deployer`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] for a zero deployer.
    pub async fn deploy_token(
        &self,
        deployer: Address,
        name: &str,
        symbol: &str,
        initial_supply: Amount,
    ) -> Result<TokenSummary, GatewayError> {
        let summary = self
            .ledger
            .write()
            .await
            .deploy_token(deployer, name, symbol, initial_supply)
            .inspect_err(|e| warn_rejected(e, "deploy_token"))?;

        tracing::info!(token = %summary.address, name, symbol, owner = %deployer, "token deployed");
        self.emit(LedgerEvent::TokenDeployed {
            token: summary.address,
            name: summary.name.clone(),
            symbol: summary.symbol.clone(),
            owner: deployer,
            initial_supply: initial_supply.to_string(),
            timestamp: Utc::now(),
        });
        Ok(summary)
    }

    /// Token metadata.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] for an unknown token.
    pub async fn token_info(&self, token: Address) -> Result<TokenSummary, GatewayError> {
        Ok(self.ledger.read().await.token_info(&token)?)
    }

    /// Token balance of `account`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] for an unknown token.
    pub async fn token_balance(&self, token: Address, account: Address) -> Result<Amount, GatewayError> {
        Ok(self.ledger.read().await.token_balance(&token, &account)?)
    }

    /// Allowance of `spender` over `owner`'s token balance.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] for an unknown token.
    pub async fn token_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<Amount, GatewayError> {
        Ok(self
            .ledger
            .read()
            .await
            .token_allowance(&token, &owner, &spender)?)
    }

    /// Transfers tokens from `caller` to `to`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] for an unknown token or a refused transfer.
    pub async fn token_transfer(
        &self,
        caller: Address,
        token: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), GatewayError> {
        self.ledger
            .write()
            .await
            .token_transfer(caller, &token, to, amount)
            .inspect_err(|e| warn_rejected(e, "token_transfer"))?;

        tracing::info!(%token, from = %caller, %to, %amount, "token transfer");
        self.emit(LedgerEvent::TokenTransferred {
            token,
            from: caller,
            to,
            amount: amount.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Sets `caller`'s allowance for `spender`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] for an unknown token or a zero spender.
    pub async fn token_approve(
        &self,
        caller: Address,
        token: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), GatewayError> {
        self.ledger
            .write()
            .await
            .token_approve(caller, &token, spender, amount)
            .inspect_err(|e| warn_rejected(e, "token_approve"))?;

        tracing::info!(%token, owner = %caller, %spender, %amount, "allowance set");
        self.emit(LedgerEvent::TokenApproved {
            token,
            owner: caller,
            spender,
            amount: amount.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Mints tokens to `to`; token owner only.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] for an unknown token, a non-owner caller
    /// or a supply overflow.
    pub async fn token_mint(
        &self,
        caller: Address,
        token: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), GatewayError> {
        self.ledger
            .write()
            .await
            .token_mint(caller, &token, to, amount)
            .inspect_err(|e| warn_rejected(e, "token_mint"))?;

        tracing::info!(%token, %to, %amount, "tokens minted");
        self.emit(LedgerEvent::TokenTransferred {
            token,
            from: Address::ZERO,
            to,
            amount: amount.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    // -- native value ------------------------------------------------------------

    /// Native balance of `account`.
    pub async fn native_balance(&self, account: Address) -> Amount {
        self.ledger.read().await.native_balance(&account)
    }

    /// Moves native value from `caller` to `to`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the caller's balance is insufficient or
    /// `to` is the zero address.
    pub async fn native_transfer(&self, caller: Address, to: Address, amount: Amount) -> Result<(), GatewayError> {
        self.ledger
            .write()
            .await
            .native_transfer(caller, to, amount)
            .inspect_err(|e| warn_rejected(e, "native_transfer"))?;

        tracing::info!(from = %caller, %to, %amount, "native transfer");
        self.emit(LedgerEvent::NativeTransferred {
            from: caller,
            to,
            amount: amount.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    // -- persistence -------------------------------------------------------------

    /// Captures the whole ledger in its persisted form.
    pub async fn snapshot(&self) -> LedgerState {
        self.ledger.read().await.snapshot()
    }
}

fn warn_rejected(err: &LedgerError, action: &'static str) {
    match err {
        LedgerError::Unauthorized { caller } => {
            tracing::warn!(%caller, action, "privileged call rejected");
        }
        LedgerError::CustodyCaller => tracing::warn!(action, "custody account rejected as caller"),
        _ => {}
    }
}
