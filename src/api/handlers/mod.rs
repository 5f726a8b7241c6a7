//! REST endpoint handlers organized by resource.

pub mod admin;
pub mod native;
pub mod pool;
pub mod rate;
pub mod swap;
pub mod system;
pub mod token;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(admin::routes())
        .merge(rate::routes())
        .merge(pool::routes())
        .merge(swap::routes())
        .merge(token::routes())
        .merge(native::routes())
}
