//! Native value DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `POST /native/transfer`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NativeTransferRequest {
    /// Recipient.
    pub to: String,
    /// Amount (string-encoded u128).
    pub amount: String,
}
