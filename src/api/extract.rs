//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::Address;
use crate::error::GatewayError;

/// Header carrying the identity of the calling account.
pub const CALLER_HEADER: &str = "x-caller";

/// The account issuing a request, taken from the [`CALLER_HEADER`].
///
/// Missing or malformed headers are rejected with
/// [`GatewayError::InvalidRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Address);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| GatewayError::InvalidRequest(format!("missing {CALLER_HEADER} header")))?;
        let text = value
            .to_str()
            .map_err(|_| GatewayError::InvalidRequest(format!("non-ascii {CALLER_HEADER} header")))?;
        let address = text
            .parse::<Address>()
            .map_err(|e| GatewayError::InvalidRequest(format!("invalid {CALLER_HEADER} header: {e}")))?;
        Ok(Self(address))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<Caller, GatewayError> {
        let mut builder = Request::builder().uri("/");
        if let Some(h) = header {
            builder = builder.header(CALLER_HEADER, h);
        }
        let Ok(request) = builder.body(()) else {
            panic!("request builds");
        };
        let (mut parts, ()) = request.into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn parses_header() {
        let caller = extract(Some("0x0101010101010101010101010101010101010101")).await;
        assert_eq!(caller.ok(), Some(Caller(Address::from_bytes([1; 20]))));
    }

    #[tokio::test]
    async fn missing_header_is_invalid_request() {
        assert!(matches!(
            extract(None).await,
            Err(GatewayError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn malformed_header_is_invalid_request() {
        assert!(matches!(
            extract(Some("0x12")).await,
            Err(GatewayError::InvalidRequest(_))
        ));
    }
}
