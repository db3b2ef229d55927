//! Request handlers for the single relay endpoint.
//!
//! # Per-request States
//! ```text
//! AWAITING_METHOD
//!     → OPTIONS: PREFLIGHT_DONE
//!     → GET:     FETCHING → RELAYED | FAILED
//! ```

use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::cors;
use crate::http::error::RelayError;
use crate::http::request::{forwarded_api_key, target_url};
use crate::http::server::AppState;
use crate::upstream::OutboundRequest;

/// CORS preflight. Never contacts the upstream.
pub async fn preflight_handler() -> Response {
    cors::preflight_response()
}

/// Rejects methods the relay does not serve, without contacting the upstream.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET,OPTIONS")],
    )
        .into_response()
}

/// Relay a GET to the target named by the `url` query parameter.
pub async fn relay_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response, RelayError> {
    let target = target_url(query.as_deref()).ok_or(RelayError::MissingUrl)?;
    let request = OutboundRequest::new(target).with_auth_token(forwarded_api_key(&headers));

    tracing::debug!(
        upstream = %request.target,
        has_api_key = request.auth_token.is_some(),
        "Relaying request"
    );

    let body = match state.upstream.fetch(&request).await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(upstream = %request.target, error = %e.describe(), "Upstream error");
            return Err(e.into());
        }
    };

    Ok((
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, cors::ALLOW_ORIGIN),
            (header::CONTENT_TYPE, "application/json"),
        ],
        body,
    )
        .into_response())
}
