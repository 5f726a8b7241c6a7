//! Error types for the ledger and the gateway.
//!
//! [`TokenError`] is raised by the balance collaborators (token ledgers and
//! the native bank). [`LedgerError`] is the exchange's own taxonomy and
//! wraps collaborator failures as [`LedgerError::TransferFailed`].
//! [`GatewayError`] is the HTTP-facing error; each variant maps to a
//! specific status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hydra_amm::domain::Amount;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Address, AssetId};

/// Failures raised by a balance ledger or the native bank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The debited account does not hold enough funds.
    #[error("transfer amount exceeds balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Current balance.
        have: Amount,
        /// Requested amount.
        need: Amount,
    },

    /// The spender's allowance does not cover the amount.
    #[error("insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance {
        /// Current allowance.
        have: Amount,
        /// Requested amount.
        need: Amount,
    },

    /// A transfer or mint targeted the reserved zero address.
    #[error("transfer to the zero address")]
    ZeroAddress,

    /// No token contract is deployed at the address.
    #[error("no token deployed at {0}")]
    UnknownToken(Address),

    /// The caller is not the token owner.
    #[error("caller {0} is not the token owner")]
    NotOwner(Address),

    /// A balance or supply update overflowed.
    #[error("balance overflow")]
    Overflow,
}

/// Failures of exchange operations (rate registry, deposits, swaps).
///
/// Any operation returning one of these has left the ledger unchanged.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The caller is not the administrator.
    #[error("Ownable: caller is not the owner")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// The custody account attempted to act as a caller.
    #[error("custody account cannot act as a caller")]
    CustodyCaller,

    /// Zero or otherwise unusable token-side amount.
    #[error("Invalid amount")]
    InvalidAmount,

    /// Zero or mismatched native-side amount.
    #[error("Amount must be greater than 0")]
    InvalidNativeAmount,

    /// Attached native value differs from the declared amount.
    #[error("attached value {attached} does not match amount {expected}")]
    AmountMismatch {
        /// Amount the call declared.
        expected: Amount,
        /// Native value attached to the call.
        attached: Amount,
    },

    /// Input and output assets are the same.
    #[error("input and output assets must differ")]
    IdenticalAssets,

    /// The zero address was supplied where a real account is required.
    #[error("zero address is not allowed")]
    ZeroAddress,

    /// The pool cannot cover the requested output.
    #[error("insufficient liquidity for {asset}: available {available}, requested {requested}")]
    InsufficientLiquidity {
        /// Output asset.
        asset: AssetId,
        /// Current pool balance.
        available: Amount,
        /// Requested output.
        requested: Amount,
    },

    /// A balance collaborator rejected a transfer.
    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TokenError),

    /// Checked arithmetic overflowed.
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(#[from] hydra_amm::error::AmmError),
}

/// Failures restoring a ledger from its persisted form.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// A string-encoded amount or rate did not parse as a `u128`.
    #[error("invalid {field} value {value:?}")]
    InvalidNumber {
        /// Field being decoded.
        field: &'static str,
        /// Offending text.
        value: String,
    },

    /// The same key appears twice.
    #[error("duplicate {0} entry")]
    Duplicate(&'static str),

    /// The state violates a ledger rule.
    #[error("invalid ledger state: {0}")]
    Ledger(#[from] LedgerError),

    /// The state violates a token rule.
    #[error("invalid token state: {0}")]
    Token(#[from] TokenError),
}

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4001,
///     "message": "insufficient liquidity for 0x…: available 0, requested 5",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1199 | Validation      | 400 Bad Request            |
/// | 1200–1299 | Access control  | 403 Forbidden              |
/// | 2000–2999 | Not Found       | 404 Not Found              |
/// | 3000–3999 | Server          | 500 Internal Server Error  |
/// | 4000–4999 | Ledger state    | 422 Unprocessable Entity   |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Error propagated from the exchange ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for GatewayError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::UnknownToken(address) => Self::NotFound(format!("token {address}")),
            other => Self::Ledger(LedgerError::TransferFailed(other)),
        }
    }
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::NotFound(_) => 2001,
            Self::Ledger(err) => match err {
                LedgerError::InvalidAmount => 1101,
                LedgerError::InvalidNativeAmount => 1102,
                LedgerError::AmountMismatch { .. } => 1103,
                LedgerError::IdenticalAssets => 1104,
                LedgerError::ZeroAddress => 1105,
                LedgerError::ArithmeticOverflow(_) => 1106,
                LedgerError::Unauthorized { .. } => 1201,
                LedgerError::CustodyCaller => 1202,
                LedgerError::InsufficientLiquidity { .. } => 4001,
                LedgerError::TransferFailed(TokenError::UnknownToken(_)) => 2001,
                LedgerError::TransferFailed(_) => 4002,
            },
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Ledger(err) => match err {
                LedgerError::Unauthorized { .. } | LedgerError::CustodyCaller => StatusCode::FORBIDDEN,
                LedgerError::TransferFailed(TokenError::UnknownToken(_)) => StatusCode::NOT_FOUND,
                LedgerError::InsufficientLiquidity { .. } | LedgerError::TransferFailed(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                LedgerError::InvalidAmount
                | LedgerError::InvalidNativeAmount
                | LedgerError::AmountMismatch { .. }
                | LedgerError::IdenticalAssets
                | LedgerError::ZeroAddress
                | LedgerError::ArithmeticOverflow(_) => StatusCode::BAD_REQUEST,
            },
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
