use axum::http::StatusCode;
use thiserror::Error;

/// A request-ending failure: the status the caller receives and the text
/// placed in the response body.
///
/// The first failing check in the pipeline creates one and it travels to the
/// dispatcher unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CodedFailure {
    pub status: StatusCode,
    pub message: String,
}

impl CodedFailure {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn missing(field: &str) -> Self {
        Self::bad_request(format!("Missing {}", field))
    }
}
