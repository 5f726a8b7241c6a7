//! Shared DTO types and request-field parsers.

use hydra_amm::domain::Amount;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Address, AssetId, Rate};
use crate::error::GatewayError;

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Clamps `per_page` to the allowed maximum of 100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }

    /// Cuts one page out of `items`.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>) -> (Vec<T>, PaginationMeta) {
        let params = self.clamped();
        let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let total_pages = total.div_ceil(params.per_page);
        let start = usize::try_from(
            u64::from(params.page - 1) * u64::from(params.per_page),
        )
        .unwrap_or(usize::MAX);
        let data = items
            .into_iter()
            .skip(start)
            .take(params.per_page as usize)
            .collect();
        (
            data,
            PaginationMeta {
                page: params.page,
                per_page: params.per_page,
                total,
                total_pages,
            },
        )
    }
}

/// Parses a decimal string into an [`Amount`].
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] naming `field`.
pub fn parse_amount(field: &str, value: &str) -> Result<Amount, GatewayError> {
    value
        .trim()
        .parse::<u128>()
        .map(Amount::new)
        .map_err(|_| GatewayError::InvalidRequest(format!("invalid {field}: {value}")))
}

/// Parses an optional decimal string, treating absence as zero.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] naming `field`.
pub fn parse_optional_amount(field: &str, value: Option<&str>) -> Result<Amount, GatewayError> {
    value.map_or(Ok(Amount::ZERO), |v| parse_amount(field, v))
}

/// Parses a `0x`-prefixed hex address.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] naming `field`.
pub fn parse_address(field: &str, value: &str) -> Result<Address, GatewayError> {
    value
        .parse::<Address>()
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid {field}: {e}")))
}

/// Parses an asset identifier (the zero address is the native asset).
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] naming `field`.
pub fn parse_asset(field: &str, value: &str) -> Result<AssetId, GatewayError> {
    value
        .parse::<AssetId>()
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid {field}: {e}")))
}

/// Parses a scaled rate.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] naming `field`.
pub fn parse_rate(field: &str, value: &str) -> Result<Rate, GatewayError> {
    value
        .parse::<Rate>()
        .map_err(|_| GatewayError::InvalidRequest(format!("invalid {field}: {value}")))
}

/// Balance of an account (token or native).
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Asset the balance is denominated in.
    pub asset: String,
    /// Holder address.
    pub account: String,
    /// Balance (string-encoded u128).
    pub balance: String,
}
