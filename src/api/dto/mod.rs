//! Data Transfer Objects for REST request/response serialization.
//!
//! All numeric amounts and rates are serialized as JSON strings to prevent
//! precision loss on u128 values. Addresses are `0x`-prefixed hex; the
//! zero address denotes the native asset.

pub mod common_dto;
pub mod native_dto;
pub mod pool_dto;
pub mod rate_dto;
pub mod swap_dto;
pub mod token_dto;

pub use common_dto::*;
pub use native_dto::*;
pub use pool_dto::*;
pub use rate_dto::*;
pub use swap_dto::*;
pub use token_dto::*;
