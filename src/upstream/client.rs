//! Outbound HTTP client for the relayed upstream API.
//!
//! # Responsibilities
//! - Validate the caller-supplied target URL
//! - Send exactly one GET per relayed request (no retries)
//! - Translate the forwarded API key into `X-Auth-Token`
//! - Read the full upstream body into memory
//!
//! # Design Decisions
//! - Idle connections are not pooled; each request opens its own connection
//! - Non-2xx upstream statuses are failures, like the relay's original client
//! - A total request timeout and a connect timeout bound every call

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use thiserror::Error;
use url::Url;

use crate::config::TimeoutConfig;

/// Header carrying the upstream API credential.
pub const X_AUTH_TOKEN: HeaderName = HeaderName::from_static("x-auth-token");

/// A single GET to be sent upstream.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// Literal target taken from the `url` query parameter.
    pub target: String,
    /// Value for `X-Auth-Token`, when the client supplied an API key.
    pub auth_token: Option<HeaderValue>,
}

impl OutboundRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: Option<HeaderValue>) -> Self {
        self.auth_token = token;
        self
    }
}

/// Failure while constructing, sending, or reading the upstream request.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid target url '{target}': {source}")]
    InvalidUrl {
        target: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported url scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("request to {url} failed")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream {url} returned {status}")]
    Status { url: Url, status: StatusCode },

    #[error("failed to read body from {url}")]
    Body {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    /// Display this error followed by every underlying cause.
    pub fn describe(&self) -> String {
        let mut description = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            if !description.ends_with(&cause_text) {
                description.push_str(": ");
                description.push_str(&cause_text);
            }
            source = cause.source();
        }
        description
    }
}

/// Client that performs the single outbound call of a relayed request.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Build a client with the configured timeouts and no idle pooling.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { http })
    }

    /// Send the request and return the upstream body bytes.
    pub async fn fetch(&self, request: &OutboundRequest) -> Result<Bytes, UpstreamError> {
        let url = parse_target(&request.target)?;

        let mut builder = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &request.auth_token {
            builder = builder.header(X_AUTH_TOKEN, token.clone());
        }

        let response = builder.send().await.map_err(|source| UpstreamError::Request {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { url, status });
        }

        response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Body { url, source })
    }
}

fn parse_target(target: &str) -> Result<Url, UpstreamError> {
    let url = Url::parse(target).map_err(|source| UpstreamError::InvalidUrl {
        target: target.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UpstreamError::UnsupportedScheme(other.to_string())),
    }
}
