//! Swap and quote endpoint handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{
    QuoteRequest, QuoteResponse, SwapRequest, SwapResponse, parse_amount, parse_asset,
    parse_optional_amount,
};
use crate::api::extract::Caller;
use crate::app_state::AppState;
use crate::domain::CallContext;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /swap` — Execute a fixed-rate swap.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid amounts, identical assets,
/// insufficient liquidity, or a refused transfer.
#[utoipa::path(
    post,
    path = "/api/v1/swap",
    tag = "Swaps",
    summary = "Execute a swap",
    description = "Swaps amount_in of asset_in for floor(amount_in × rate / 10^18) of asset_out. Native input attaches `value` equal to `amount_in`.",
    params(
        ("x-caller" = String, Header, description = "Calling account"),
    ),
    request_body = SwapRequest,
    responses(
        (status = 200, description = "Swap executed", body = SwapResponse),
        (status = 400, description = "Invalid swap parameters", body = ErrorResponse),
        (status = 403, description = "Caller is the custody account", body = ErrorResponse),
        (status = 404, description = "Token not deployed", body = ErrorResponse),
        (status = 422, description = "Insufficient liquidity or transfer refused", body = ErrorResponse),
    )
)]
pub async fn execute_swap(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<SwapRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset_in = parse_asset("asset_in", &req.asset_in)?;
    let asset_out = parse_asset("asset_out", &req.asset_out)?;
    let amount_in = parse_amount("amount_in", &req.amount_in)?;
    let value = parse_optional_amount("value", req.value.as_deref())?;

    let executed = state
        .exchange
        .swap(
            CallContext::with_value(caller, value),
            asset_in,
            asset_out,
            amount_in,
        )
        .await?;
    let receipt = executed.receipt;

    Ok(Json(SwapResponse {
        swap_id: executed.swap_id.to_string(),
        caller: receipt.caller.to_string(),
        asset_in: asset_in.to_string(),
        asset_out: asset_out.to_string(),
        amount_in: receipt.quote.amount_in.to_string(),
        amount_out: receipt.quote.amount_out.to_string(),
        rate: receipt.quote.rate.to_string(),
        pool_in_balance: receipt.pool_in_balance.to_string(),
        pool_out_balance: receipt.pool_out_balance.to_string(),
        executed_at: Utc::now(),
    }))
}

/// `POST /quote` — Price a swap (read-only).
///
/// # Errors
///
/// Returns the [`GatewayError`] the swap would fail with before any
/// transfer is attempted.
#[utoipa::path(
    post,
    path = "/api/v1/quote",
    tag = "Swaps",
    summary = "Get swap quote",
    description = "Returns the output a swap would release against current rates and pool balances. Nothing is modified.",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Quote computed", body = QuoteResponse),
        (status = 400, description = "Invalid swap parameters", body = ErrorResponse),
        (status = 422, description = "Insufficient liquidity", body = ErrorResponse),
    )
)]
pub async fn quote_swap(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset_in = parse_asset("asset_in", &req.asset_in)?;
    let asset_out = parse_asset("asset_out", &req.asset_out)?;
    let amount_in = parse_amount("amount_in", &req.amount_in)?;

    let quote = state
        .exchange
        .quote_swap(asset_in, asset_out, amount_in)
        .await?;
    Ok(Json(QuoteResponse::from(quote)))
}

/// Swap routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/swap", post(execute_swap))
        .route("/quote", post(quote_swap))
}
