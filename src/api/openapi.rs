//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto;
use crate::api::handlers::{admin, native, pool, rate, swap, system, token};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "MultiSwap Gateway",
        description = "Fixed-rate multi-asset exchange ledger with REST and WebSocket access."
    ),
    paths(
        system::health_handler,
        admin::get_admin,
        admin::transfer_admin,
        rate::set_rate,
        rate::list_rates,
        rate::get_rate,
        pool::deposit,
        pool::list_pools,
        pool::get_pool,
        swap::execute_swap,
        swap::quote_swap,
        token::deploy_token,
        token::get_token,
        token::get_balance,
        token::get_allowance,
        token::transfer,
        token::approve,
        token::mint,
        native::get_balance,
        native::transfer,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        dto::PaginationMeta,
        dto::BalanceResponse,
        dto::AdminResponse,
        dto::TransferAdminRequest,
        dto::TransferAdminResponse,
        dto::SetRateRequest,
        dto::SetRateResponse,
        dto::RateDto,
        dto::RateListResponse,
        dto::DepositRequest,
        dto::DepositResponse,
        dto::PoolBalanceDto,
        dto::PoolListResponse,
        dto::SwapRequest,
        dto::SwapResponse,
        dto::QuoteRequest,
        dto::QuoteResponse,
        dto::DeployTokenRequest,
        dto::TokenResponse,
        dto::TokenTransferRequest,
        dto::ApproveRequest,
        dto::AllowanceResponse,
        dto::TransferResponse,
        dto::NativeTransferRequest,
    )),
    tags(
        (name = "System", description = "Health"),
        (name = "Admin", description = "Rate administrator"),
        (name = "Rates", description = "Directional fixed rates"),
        (name = "Pools", description = "Custodial pool balances"),
        (name = "Swaps", description = "Fixed-rate swaps and quotes"),
        (name = "Tokens", description = "Mintable token contracts"),
        (name = "Native", description = "Native asset balances"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_swap_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/swap"));
        assert!(doc.paths.paths.contains_key("/api/v1/rates/{asset_in}/{asset_out}"));
    }
}
