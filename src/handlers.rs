use axum::{
    body::{Body, to_bytes},
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use crate::AppState;
use crate::assembler::assemble_send_config;
use crate::cors::{CorsHeaders, request_origin};
use crate::failure::CodedFailure;

const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// Validate, assemble and relay. Nothing here is retried.
async fn relay(app_state: &AppState, body: &[u8]) -> Result<(), CodedFailure> {
    let send_config = assemble_send_config(
        body,
        app_state.env.as_ref(),
        app_state.secrets.as_ref(),
        &app_state.config.secrets.password_parameter,
    )
    .await?;

    app_state.transport.send(&send_config).await.map_err(|e| {
        error!("Mail transport {} failed: {}", app_state.transport.name(), e);
        CodedFailure::from(e)
    })?;

    info!("Relayed contact message to {}", send_config.to_address);
    Ok(())
}

/// `POST` on the send endpoint.
///
/// The body is taken raw so that every outcome, including unreadable or
/// oversized bodies, is answered here with the CORS headers attached.
pub async fn send_email_handler(
    State(app_state): State<AppState>,
    request_headers: HeaderMap,
    body: Body,
) -> Response {
    let cors = CorsHeaders::for_request(&app_state.config.cors, &request_headers);
    let mut headers = cors.headers;
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));

    if app_state.config.cors.enforce_origin && cors.allowed_origin.is_none() {
        warn!(
            "Rejecting send request from origin {:?}",
            request_origin(&request_headers)
        );
        return (StatusCode::FORBIDDEN, headers, "Invalid origin").into_response();
    }

    let body = match to_bytes(body, app_state.config.server.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read request body: {}", e);
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                headers,
                "Request body too large",
            )
                .into_response();
        }
    };

    match relay(&app_state, &body).await {
        Ok(()) => (StatusCode::OK, headers).into_response(),
        Err(failure) => {
            info!(
                "Send request failed with {}: {}",
                failure.status, failure.message
            );
            (failure.status, headers, failure.message).into_response()
        }
    }
}

/// `OPTIONS` on the send endpoint. Never touches configuration or mail.
pub async fn preflight_handler(
    State(app_state): State<AppState>,
    request_headers: HeaderMap,
) -> Response {
    let cors = CorsHeaders::for_request(&app_state.config.cors, &request_headers);
    (StatusCode::NO_CONTENT, cors.headers).into_response()
}
