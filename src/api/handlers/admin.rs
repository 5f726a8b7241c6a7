//! Administration handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AdminResponse, TransferAdminRequest, TransferAdminResponse, parse_address};
use crate::api::extract::Caller;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /admin` — Current administrator and custody account.
#[utoipa::path(
    get,
    path = "/api/v1/admin",
    tag = "Admin",
    summary = "Get administrator",
    description = "Returns the account allowed to set rates and the custody account holding pooled funds.",
    responses(
        (status = 200, description = "Administrator", body = AdminResponse),
    )
)]
pub async fn get_admin(State(state): State<AppState>) -> impl IntoResponse {
    Json(AdminResponse {
        admin: state.exchange.admin().await.to_string(),
        custody: state.exchange.custody().await.to_string(),
    })
}

/// `POST /admin/transfer` — Hand administration to another account.
///
/// # Errors
///
/// Returns [`GatewayError`] if the caller is not the administrator or the
/// new administrator is the zero address.
#[utoipa::path(
    post,
    path = "/api/v1/admin/transfer",
    tag = "Admin",
    summary = "Transfer administration",
    description = "Replaces the administrator. Only the current administrator may call this.",
    params(
        ("x-caller" = String, Header, description = "Calling account"),
    ),
    request_body = TransferAdminRequest,
    responses(
        (status = 200, description = "Administration transferred", body = TransferAdminResponse),
        (status = 400, description = "Invalid request or zero address", body = ErrorResponse),
        (status = 403, description = "Caller is not the administrator", body = ErrorResponse),
    )
)]
pub async fn transfer_admin(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<TransferAdminRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let new_admin = parse_address("new_admin", &req.new_admin)?;
    let previous_admin = state.exchange.transfer_admin(caller, new_admin).await?;
    Ok(Json(TransferAdminResponse {
        previous_admin: previous_admin.to_string(),
        admin: new_admin.to_string(),
    }))
}

/// Administration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(get_admin))
        .route("/admin/transfer", post(transfer_admin))
}
