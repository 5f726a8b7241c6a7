//! Pool deposit and balance DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PaginationMeta;
use crate::domain::{DepositReceipt, PoolBalance};

/// Request body for `POST /pools/deposit`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DepositRequest {
    /// Asset to deposit (zero address for native).
    pub asset: String,
    /// Amount to deposit (string-encoded u128).
    pub amount: String,
    /// Native value attached to the call. Must equal `amount` for a
    /// native deposit and be absent or zero for a token deposit.
    #[serde(default)]
    pub value: Option<String>,
}

/// Response body for `POST /pools/deposit`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DepositResponse {
    /// Deposited asset.
    pub asset: String,
    /// Depositing account.
    pub depositor: String,
    /// Deposited amount.
    pub amount: String,
    /// Pool balance after the deposit.
    pub pool_balance: String,
}

impl From<DepositReceipt> for DepositResponse {
    fn from(receipt: DepositReceipt) -> Self {
        Self {
            asset: receipt.asset.to_string(),
            depositor: receipt.depositor.to_string(),
            amount: receipt.amount.to_string(),
            pool_balance: receipt.pool_balance.to_string(),
        }
    }
}

/// Balance of one pool.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolBalanceDto {
    /// Pooled asset.
    pub asset: String,
    /// Custodial balance (string-encoded u128).
    pub balance: String,
}

impl From<PoolBalance> for PoolBalanceDto {
    fn from(pool: PoolBalance) -> Self {
        Self {
            asset: pool.asset.to_string(),
            balance: pool.balance.to_string(),
        }
    }
}

/// Response body for `GET /pools`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolListResponse {
    /// Custody account holding every pool.
    pub custody: String,
    /// Funded pools for the requested page.
    pub data: Vec<PoolBalanceDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
