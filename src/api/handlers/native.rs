//! Native value handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BalanceResponse, NativeTransferRequest, TransferResponse, parse_address, parse_amount,
};
use crate::api::extract::Caller;
use crate::app_state::AppState;
use crate::domain::AssetId;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /native/balances/{account}` — Native balance.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a malformed account.
#[utoipa::path(
    get,
    path = "/api/v1/native/balances/{account}",
    tag = "Native",
    summary = "Get native balance",
    params(
        ("account" = String, Path, description = "Holder address"),
    ),
    responses(
        (status = 200, description = "Balance", body = BalanceResponse),
        (status = 400, description = "Malformed address", body = ErrorResponse),
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let account = parse_address("account", &account)?;
    let balance = state.exchange.native_balance(account).await;
    Ok(Json(BalanceResponse {
        asset: AssetId::Native.to_string(),
        account: account.to_string(),
        balance: balance.to_string(),
    }))
}

/// `POST /native/transfer` — Move native value from the caller.
///
/// # Errors
///
/// Returns [`GatewayError`] if the balance is insufficient or the
/// recipient is the zero address.
#[utoipa::path(
    post,
    path = "/api/v1/native/transfer",
    tag = "Native",
    summary = "Transfer native value",
    params(
        ("x-caller" = String, Header, description = "Calling account"),
    ),
    request_body = NativeTransferRequest,
    responses(
        (status = 200, description = "Transfer committed", body = TransferResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Caller is the custody account", body = ErrorResponse),
        (status = 422, description = "Transfer refused", body = ErrorResponse),
    )
)]
pub async fn transfer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<NativeTransferRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let to = parse_address("to", &req.to)?;
    let amount = parse_amount("amount", &req.amount)?;
    state.exchange.native_transfer(caller, to, amount).await?;
    Ok(Json(TransferResponse {
        asset: AssetId::Native.to_string(),
        from: caller.to_string(),
        to: to.to_string(),
        amount: amount.to_string(),
    }))
}

/// Native value routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/native/balances/{account}", get(get_balance))
        .route("/native/transfer", post(transfer))
}
