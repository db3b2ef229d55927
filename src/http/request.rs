//! Extraction of relay inputs from the incoming request.
//!
//! # Responsibilities
//! - Pull the target from the `url` query parameter
//! - Look up the optional `X-Football-API-Key` header

use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Header a browser client uses to hand its API key to the relay.
pub const X_FOOTBALL_API_KEY: HeaderName = HeaderName::from_static("x-football-api-key");

/// Query parameter naming the upstream target.
pub const URL_PARAM: &str = "url";

/// Return the first non-empty `url` value in a raw query string.
///
/// The query is form-decoded, so `+` becomes a space and percent escapes
/// are resolved. Blank values are skipped as if the parameter were absent.
pub fn target_url(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == URL_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Return the client's API key, if the header is present.
///
/// Header names are case-insensitive; the first value wins when repeated.
pub fn forwarded_api_key(headers: &HeaderMap) -> Option<HeaderValue> {
    headers.get(X_FOOTBALL_API_KEY).cloned()
}
