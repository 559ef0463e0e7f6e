use axum::http::{
    HeaderMap, HeaderValue,
    header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_MAX_AGE, ORIGIN, VARY,
    },
};

use crate::CorsConfig;

pub const ALLOWED_HEADERS: &str = "Content-Type";
pub const ALLOWED_METHODS: &str = "OPTIONS,POST";

/// CORS response headers for one request, plus the allow-listed origin that
/// matched, if any.
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    pub headers: HeaderMap,
    pub allowed_origin: Option<String>,
}

/// The caller's `Origin` header. Header names are case-insensitive, so both
/// `origin` and `Origin` land here.
pub fn request_origin(headers: &HeaderMap) -> Option<&str> {
    headers.get(ORIGIN).and_then(|value| value.to_str().ok())
}

/// Exact, case-sensitive match against the allow list.
pub fn match_origin<'a>(allowed: &'a [String], origin: Option<&str>) -> Option<&'a str> {
    let origin = origin?;
    allowed
        .iter()
        .find(|candidate| candidate.as_str() == origin)
        .map(String::as_str)
}

impl CorsHeaders {
    pub fn for_request(config: &CorsConfig, request_headers: &HeaderMap) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(config.max_age_seconds));
        headers.insert(VARY, HeaderValue::from_static("Origin"));

        let allowed_origin =
            match_origin(&config.allowed_origins, request_origin(request_headers)).and_then(
                |origin| match HeaderValue::from_str(origin) {
                    Ok(value) => {
                        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
                        Some(origin.to_string())
                    }
                    Err(e) => {
                        tracing::warn!("Allowed origin {:?} is not a valid header: {}", origin, e);
                        None
                    }
                },
            );

        Self {
            headers,
            allowed_origin,
        }
    }
}
