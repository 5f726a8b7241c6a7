//! Swap and quote DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::SwapQuote;

/// Request body for `POST /swap`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SwapRequest {
    /// Input asset (zero address for native).
    pub asset_in: String,
    /// Output asset (zero address for native).
    pub asset_out: String,
    /// Exact input amount (string-encoded u128).
    pub amount_in: String,
    /// Native value attached to the call. Must equal `amount_in` when the
    /// input is native and be absent or zero otherwise.
    #[serde(default)]
    pub value: Option<String>,
}

/// Request body for `POST /quote`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteRequest {
    /// Input asset (zero address for native).
    pub asset_in: String,
    /// Output asset (zero address for native).
    pub asset_out: String,
    /// Exact input amount (string-encoded u128).
    pub amount_in: String,
}

/// Response body for `POST /swap`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SwapResponse {
    /// Unique swap identifier.
    pub swap_id: String,
    /// Swapping account.
    pub caller: String,
    /// Input asset.
    pub asset_in: String,
    /// Output asset.
    pub asset_out: String,
    /// Input amount (string-encoded).
    pub amount_in: String,
    /// Output amount (string-encoded).
    pub amount_out: String,
    /// Rate applied.
    pub rate: String,
    /// Input pool balance after the swap.
    pub pool_in_balance: String,
    /// Output pool balance after the swap.
    pub pool_out_balance: String,
    /// Execution timestamp.
    pub executed_at: DateTime<Utc>,
}

/// Response body for `POST /quote`.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    /// Input asset.
    pub asset_in: String,
    /// Output asset.
    pub asset_out: String,
    /// Input amount (string-encoded).
    pub amount_in: String,
    /// Output amount a swap would release (string-encoded).
    pub amount_out: String,
    /// Rate applied.
    pub rate: String,
    /// Output pool balance available.
    pub available: String,
    /// Quote timestamp.
    pub quoted_at: DateTime<Utc>,
}

impl From<SwapQuote> for QuoteResponse {
    fn from(quote: SwapQuote) -> Self {
        Self {
            asset_in: quote.asset_in.to_string(),
            asset_out: quote.asset_out.to_string(),
            amount_in: quote.amount_in.to_string(),
            amount_out: quote.amount_out.to_string(),
            rate: quote.rate.to_string(),
            available: quote.available.to_string(),
            quoted_at: Utc::now(),
        }
    }
}
