//! Rate and administration DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PaginationMeta;
use crate::domain::RateEntry;

/// Request body for `PUT /rates`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRateRequest {
    /// Input asset address (zero address for native).
    pub asset_in: String,
    /// Output asset address (zero address for native).
    pub asset_out: String,
    /// Scaled rate (`asset_out` base units per `asset_in` unit × 10^18).
    /// `"0"` clears the pair.
    pub rate: String,
}

/// Response body for `PUT /rates`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SetRateResponse {
    /// Input asset.
    pub asset_in: String,
    /// Output asset.
    pub asset_out: String,
    /// Rate now in effect.
    pub rate: String,
    /// Rate before the update.
    pub previous_rate: String,
}

/// A single directional rate.
#[derive(Debug, Serialize, ToSchema)]
pub struct RateDto {
    /// Input asset.
    pub asset_in: String,
    /// Output asset.
    pub asset_out: String,
    /// Scaled rate (`"0"` when unset).
    pub rate: String,
}

impl From<RateEntry> for RateDto {
    fn from(entry: RateEntry) -> Self {
        Self {
            asset_in: entry.asset_in.to_string(),
            asset_out: entry.asset_out.to_string(),
            rate: entry.rate.to_string(),
        }
    }
}

/// Response body for `GET /rates`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RateListResponse {
    /// Registered rates for the requested page.
    pub data: Vec<RateDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for `GET /admin`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminResponse {
    /// Current administrator.
    pub admin: String,
    /// Custody account holding pooled funds.
    pub custody: String,
}

/// Request body for `POST /admin/transfer`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferAdminRequest {
    /// Incoming administrator.
    pub new_admin: String,
}

/// Response body for `POST /admin/transfer`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferAdminResponse {
    /// Outgoing administrator.
    pub previous_admin: String,
    /// Incoming administrator.
    pub admin: String,
}
