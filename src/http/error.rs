//! Mapping of relay failures to HTTP responses.
//!
//! Every failure of a relayed request ends here. Nothing propagates past the
//! handler, so one bad request never affects the listener.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The client did not say where to relay to.
    #[error("Missing 'url' query parameter")]
    MissingUrl,

    #[error("Proxy error: {}", .0.describe())]
    Upstream(#[from] UpstreamError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingUrl => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
