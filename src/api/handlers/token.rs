//! Token contract handlers: deploy, metadata, balances, transfers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AllowanceResponse, ApproveRequest, BalanceResponse, DeployTokenRequest, TokenResponse,
    TokenTransferRequest, TransferResponse, parse_address, parse_amount,
};
use crate::api::extract::Caller;
use crate::app_state::AppState;
use crate::domain::Address;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /tokens` — Deploy a token with its supply minted to the caller.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for an empty name or symbol or
/// a malformed supply.
#[utoipa::path(
    post,
    path = "/api/v1/tokens",
    tag = "Tokens",
    summary = "Deploy a token",
    description = "Deploys an 18-decimal mintable token. The caller becomes its owner and receives the initial supply.",
    params(
        ("x-caller" = String, Header, description = "Calling account"),
    ),
    request_body = DeployTokenRequest,
    responses(
        (status = 201, description = "Token deployed", body = TokenResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Caller is the custody account", body = ErrorResponse),
    )
)]
pub async fn deploy_token(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<DeployTokenRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let name = req.name.trim();
    let symbol = req.symbol.trim();
    if name.is_empty() || symbol.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "name and symbol must not be empty".to_string(),
        ));
    }
    let supply = parse_amount("initial_supply", &req.initial_supply)?;

    let summary = state
        .exchange
        .deploy_token(caller, name, symbol, supply)
        .await?;
    Ok((StatusCode::CREATED, Json(TokenResponse::from(summary))))
}

/// `GET /tokens/{token}` — Token metadata.
///
/// # Errors
///
/// Returns [`GatewayError::NotFound`] if no token is deployed there.
#[utoipa::path(
    get,
    path = "/api/v1/tokens/{token}",
    tag = "Tokens",
    summary = "Get token",
    description = "Returns name, symbol, decimals, owner and total supply.",
    params(
        ("token" = String, Path, description = "Token address"),
    ),
    responses(
        (status = 200, description = "Token metadata", body = TokenResponse),
        (status = 404, description = "Token not deployed", body = ErrorResponse),
    )
)]
pub async fn get_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let token = parse_token(&token)?;
    let summary = state.exchange.token_info(token).await?;
    Ok(Json(TokenResponse::from(summary)))
}

/// `GET /tokens/{token}/balances/{account}` — Token balance.
///
/// # Errors
///
/// Returns [`GatewayError::NotFound`] if no token is deployed there.
#[utoipa::path(
    get,
    path = "/api/v1/tokens/{token}/balances/{account}",
    tag = "Tokens",
    summary = "Get token balance",
    params(
        ("token" = String, Path, description = "Token address"),
        ("account" = String, Path, description = "Holder address"),
    ),
    responses(
        (status = 200, description = "Balance", body = BalanceResponse),
        (status = 404, description = "Token not deployed", body = ErrorResponse),
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path((token, account)): Path<(String, String)>,
) -> Result<impl IntoResponse, GatewayError> {
    let token = parse_token(&token)?;
    let account = parse_address("account", &account)?;
    let balance = state.exchange.token_balance(token, account).await?;
    Ok(Json(BalanceResponse {
        asset: token.to_string(),
        account: account.to_string(),
        balance: balance.to_string(),
    }))
}

/// `GET /tokens/{token}/allowances/{owner}/{spender}` — Allowance.
///
/// # Errors
///
/// Returns [`GatewayError::NotFound`] if no token is deployed there.
#[utoipa::path(
    get,
    path = "/api/v1/tokens/{token}/allowances/{owner}/{spender}",
    tag = "Tokens",
    summary = "Get allowance",
    params(
        ("token" = String, Path, description = "Token address"),
        ("owner" = String, Path, description = "Balance owner"),
        ("spender" = String, Path, description = "Approved spender"),
    ),
    responses(
        (status = 200, description = "Allowance", body = AllowanceResponse),
        (status = 404, description = "Token not deployed", body = ErrorResponse),
    )
)]
pub async fn get_allowance(
    State(state): State<AppState>,
    Path((token, owner, spender)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, GatewayError> {
    let token = parse_token(&token)?;
    let owner = parse_address("owner", &owner)?;
    let spender = parse_address("spender", &spender)?;
    let allowance = state.exchange.token_allowance(token, owner, spender).await?;
    Ok(Json(AllowanceResponse {
        token: token.to_string(),
        owner: owner.to_string(),
        spender: spender.to_string(),
        allowance: allowance.to_string(),
    }))
}

/// `POST /tokens/{token}/transfer` — Transfer tokens from the caller.
///
/// # Errors
///
/// Returns [`GatewayError`] for an unknown token or a refused transfer.
#[utoipa::path(
    post,
    path = "/api/v1/tokens/{token}/transfer",
    tag = "Tokens",
    summary = "Transfer tokens",
    params(
        ("token" = String, Path, description = "Token address"),
        ("x-caller" = String, Header, description = "Calling account"),
    ),
    request_body = TokenTransferRequest,
    responses(
        (status = 200, description = "Transfer committed", body = TransferResponse),
        (status = 403, description = "Caller is the custody account", body = ErrorResponse),
        (status = 404, description = "Token not deployed", body = ErrorResponse),
        (status = 422, description = "Transfer refused", body = ErrorResponse),
    )
)]
pub async fn transfer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(token): Path<String>,
    Json(req): Json<TokenTransferRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let token = parse_token(&token)?;
    let to = parse_address("to", &req.to)?;
    let amount = parse_amount("amount", &req.amount)?;
    state
        .exchange
        .token_transfer(caller, token, to, amount)
        .await?;
    Ok(Json(TransferResponse {
        asset: token.to_string(),
        from: caller.to_string(),
        to: to.to_string(),
        amount: amount.to_string(),
    }))
}

/// `POST /tokens/{token}/approve` — Set the caller's allowance for a spender.
///
/// # Errors
///
/// Returns [`GatewayError`] for an unknown token or a zero spender.
#[utoipa::path(
    post,
    path = "/api/v1/tokens/{token}/approve",
    tag = "Tokens",
    summary = "Approve a spender",
    description = "Overwrites the caller's allowance for `spender`. Approve the custody account before depositing or swapping a token.",
    params(
        ("token" = String, Path, description = "Token address"),
        ("x-caller" = String, Header, description = "Calling account"),
    ),
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Allowance set", body = AllowanceResponse),
        (status = 403, description = "Caller is the custody account", body = ErrorResponse),
        (status = 404, description = "Token not deployed", body = ErrorResponse),
        (status = 422, description = "Zero spender", body = ErrorResponse),
    )
)]
pub async fn approve(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(token): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let token = parse_token(&token)?;
    let spender = parse_address("spender", &req.spender)?;
    let amount = parse_amount("amount", &req.amount)?;
    state
        .exchange
        .token_approve(caller, token, spender, amount)
        .await?;
    Ok(Json(AllowanceResponse {
        token: token.to_string(),
        owner: caller.to_string(),
        spender: spender.to_string(),
        allowance: amount.to_string(),
    }))
}

/// `POST /tokens/{token}/mint` — Mint tokens (token owner only).
///
/// # Errors
///
/// Returns [`GatewayError`] for an unknown token, a non-owner caller or a
/// supply overflow.
#[utoipa::path(
    post,
    path = "/api/v1/tokens/{token}/mint",
    tag = "Tokens",
    summary = "Mint tokens",
    params(
        ("token" = String, Path, description = "Token address"),
        ("x-caller" = String, Header, description = "Calling account"),
    ),
    request_body = TokenTransferRequest,
    responses(
        (status = 200, description = "Tokens minted", body = TransferResponse),
        (status = 403, description = "Caller is the custody account", body = ErrorResponse),
        (status = 404, description = "Token not deployed", body = ErrorResponse),
        (status = 422, description = "Caller is not the token owner", body = ErrorResponse),
    )
)]
pub async fn mint(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(token): Path<String>,
    Json(req): Json<TokenTransferRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let token = parse_token(&token)?;
    let to = parse_address("to", &req.to)?;
    let amount = parse_amount("amount", &req.amount)?;
    state.exchange.token_mint(caller, token, to, amount).await?;
    Ok(Json(TransferResponse {
        asset: token.to_string(),
        from: Address::ZERO.to_string(),
        to: to.to_string(),
        amount: amount.to_string(),
    }))
}

/// Token routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tokens", post(deploy_token))
        .route("/tokens/{token}", get(get_token))
        .route("/tokens/{token}/balances/{account}", get(get_balance))
        .route(
            "/tokens/{token}/allowances/{owner}/{spender}",
            get(get_allowance),
        )
        .route("/tokens/{token}/transfer", post(transfer))
        .route("/tokens/{token}/approve", post(approve))
        .route("/tokens/{token}/mint", post(mint))
}

fn parse_token(value: &str) -> Result<Address, GatewayError> {
    parse_address("token", value)
}
