//! Rate registry handlers.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    PaginationParams, RateDto, RateListResponse, SetRateRequest, SetRateResponse, parse_asset,
    parse_rate,
};
use crate::api::extract::Caller;
use crate::app_state::AppState;
use crate::domain::RateEntry;
use crate::error::{ErrorResponse, GatewayError};

/// `PUT /rates` — Register, overwrite or clear a directional rate.
///
/// # Errors
///
/// Returns [`GatewayError`] if the caller is not the administrator, a
/// field is malformed, or both assets are the same.
#[utoipa::path(
    put,
    path = "/api/v1/rates",
    tag = "Rates",
    summary = "Set a rate",
    description = "Sets the rate for asset_in → asset_out, scaled by 10^18. A zero rate clears the pair. Administrator only.",
    params(
        ("x-caller" = String, Header, description = "Calling account"),
    ),
    request_body = SetRateRequest,
    responses(
        (status = 200, description = "Rate set", body = SetRateResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Caller is not the administrator", body = ErrorResponse),
    )
)]
pub async fn set_rate(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<SetRateRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset_in = parse_asset("asset_in", &req.asset_in)?;
    let asset_out = parse_asset("asset_out", &req.asset_out)?;
    let rate = parse_rate("rate", &req.rate)?;

    let previous = state
        .exchange
        .set_rate(caller, asset_in, asset_out, rate)
        .await?;
    Ok(Json(SetRateResponse {
        asset_in: asset_in.to_string(),
        asset_out: asset_out.to_string(),
        rate: rate.to_string(),
        previous_rate: previous.to_string(),
    }))
}

/// `GET /rates` — List registered rates.
#[utoipa::path(
    get,
    path = "/api/v1/rates",
    tag = "Rates",
    summary = "List rates",
    description = "Returns a paginated list of all non-zero rates ordered by pair.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated rate list", body = RateListResponse),
    )
)]
pub async fn list_rates(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> impl IntoResponse {
    let (entries, pagination) = params.paginate(state.exchange.list_rates().await);
    Json(RateListResponse {
        data: entries.into_iter().map(RateDto::from).collect(),
        pagination,
    })
}

/// `GET /rates/{asset_in}/{asset_out}` — Look up one directional rate.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for malformed assets.
#[utoipa::path(
    get,
    path = "/api/v1/rates/{asset_in}/{asset_out}",
    tag = "Rates",
    summary = "Get a rate",
    description = "Returns the rate for asset_in → asset_out, or \"0\" if unset.",
    params(
        ("asset_in" = String, Path, description = "Input asset address"),
        ("asset_out" = String, Path, description = "Output asset address"),
    ),
    responses(
        (status = 200, description = "Rate", body = RateDto),
        (status = 400, description = "Malformed asset", body = ErrorResponse),
    )
)]
pub async fn get_rate(
    State(state): State<AppState>,
    Path((asset_in, asset_out)): Path<(String, String)>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset_in = parse_asset("asset_in", &asset_in)?;
    let asset_out = parse_asset("asset_out", &asset_out)?;
    let rate = state.exchange.get_rate(asset_in, asset_out).await;
    Ok(Json(RateDto::from(RateEntry {
        asset_in,
        asset_out,
        rate,
    })))
}

/// Rate routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rates", get(list_rates).put(set_rate))
        .route("/rates/{asset_in}/{asset_out}", get(get_rate))
}
