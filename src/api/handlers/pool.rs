//! Pool handlers: deposit and balances.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    DepositRequest, DepositResponse, PaginationParams, PoolBalanceDto, PoolListResponse,
    parse_amount, parse_asset, parse_optional_amount,
};
use crate::api::extract::Caller;
use crate::app_state::AppState;
use crate::domain::{CallContext, PoolBalance};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /pools/deposit` — Deposit into an asset's pool.
///
/// # Errors
///
/// Returns [`GatewayError`] on malformed fields, a value/amount mismatch,
/// or a refused pull from the caller.
#[utoipa::path(
    post,
    path = "/api/v1/pools/deposit",
    tag = "Pools",
    summary = "Deposit liquidity",
    description = "Adds funds to an asset's pool. Native deposits attach `value` equal to `amount`; token deposits require a prior approval of the custody account.",
    params(
        ("x-caller" = String, Header, description = "Calling account"),
    ),
    request_body = DepositRequest,
    responses(
        (status = 201, description = "Deposit accepted", body = DepositResponse),
        (status = 400, description = "Invalid request or value mismatch", body = ErrorResponse),
        (status = 403, description = "Caller is the custody account", body = ErrorResponse),
        (status = 404, description = "Token not deployed", body = ErrorResponse),
        (status = 422, description = "Transfer refused", body = ErrorResponse),
    )
)]
pub async fn deposit(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<DepositRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset = parse_asset("asset", &req.asset)?;
    let amount = parse_amount("amount", &req.amount)?;
    let value = parse_optional_amount("value", req.value.as_deref())?;

    let receipt = state
        .exchange
        .deposit_token(CallContext::with_value(caller, value), asset, amount)
        .await?;
    Ok((StatusCode::CREATED, Json(DepositResponse::from(receipt))))
}

/// `GET /pools` — List funded pools.
#[utoipa::path(
    get,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "List pools",
    description = "Returns a paginated list of pool balances ordered by asset.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated pool list", body = PoolListResponse),
    )
)]
pub async fn list_pools(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> impl IntoResponse {
    let (pools, pagination) = params.paginate(state.exchange.list_pools().await);
    Json(PoolListResponse {
        custody: state.exchange.custody().await.to_string(),
        data: pools.into_iter().map(PoolBalanceDto::from).collect(),
        pagination,
    })
}

/// `GET /pools/{asset}` — Balance of one pool.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a malformed asset.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{asset}",
    tag = "Pools",
    summary = "Get pool balance",
    description = "Returns the custodial balance of one asset (\"0\" if never funded).",
    params(
        ("asset" = String, Path, description = "Asset address (zero address for native)"),
    ),
    responses(
        (status = 200, description = "Pool balance", body = PoolBalanceDto),
        (status = 400, description = "Malformed asset", body = ErrorResponse),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset = parse_asset("asset", &asset)?;
    let balance = state.exchange.pool_balance(asset).await;
    Ok(Json(PoolBalanceDto::from(PoolBalance { asset, balance })))
}

/// Pool routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", get(list_pools))
        .route("/pools/deposit", post(deposit))
        .route("/pools/{asset}", get(get_pool))
}
