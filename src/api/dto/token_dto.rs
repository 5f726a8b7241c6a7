//! Token contract DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::TokenSummary;

/// Request body for `POST /tokens`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeployTokenRequest {
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Initial supply minted to the caller (string-encoded u128).
    pub initial_supply: String,
}

/// Token metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Contract address.
    pub address: String,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Decimal places.
    pub decimals: u8,
    /// Minting account.
    pub owner: String,
    /// Total supply (string-encoded).
    pub total_supply: String,
}

impl From<TokenSummary> for TokenResponse {
    fn from(summary: TokenSummary) -> Self {
        Self {
            address: summary.address.to_string(),
            name: summary.name,
            symbol: summary.symbol,
            decimals: summary.decimals,
            owner: summary.owner.to_string(),
            total_supply: summary.total_supply,
        }
    }
}

/// Request body for `POST /tokens/{token}/transfer` and `/mint`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenTransferRequest {
    /// Recipient.
    pub to: String,
    /// Amount (string-encoded u128).
    pub amount: String,
}

/// Request body for `POST /tokens/{token}/approve`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveRequest {
    /// Approved spender (typically the exchange custody account).
    pub spender: String,
    /// New allowance (string-encoded u128).
    pub amount: String,
}

/// Allowance of a spender over an owner's balance.
#[derive(Debug, Serialize, ToSchema)]
pub struct AllowanceResponse {
    /// Contract address.
    pub token: String,
    /// Balance owner.
    pub owner: String,
    /// Approved spender.
    pub spender: String,
    /// Allowance (string-encoded).
    pub allowance: String,
}

/// Acknowledgement of a committed token or native transfer.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferResponse {
    /// Asset moved.
    pub asset: String,
    /// Debited account (zero address for mints).
    pub from: String,
    /// Credited account.
    pub to: String,
    /// Amount moved.
    pub amount: String,
}
