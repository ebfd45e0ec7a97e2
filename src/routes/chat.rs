use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    message::EVENT_STREAM,
    services::{rate_limiter::client_key, validation::validate_messages},
    state::SharedState,
};

/// Relay one conversation to the gateway and stream the reply back.
///
/// Checks run in a fixed order and fail fast: rate limit, body shape,
/// per-message shape, upstream credential.
pub async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let request_id = Uuid::new_v4();
    let key = client_key(&headers);
    let span = info_span!("chat", %request_id, client = %key);

    relay(state, key, body).instrument(span).await
}

async fn relay(state: SharedState, key: String, body: Bytes) -> Result<Response, AppError> {
    if state.limiter.check(&key).await {
        return Err(AppError::RateLimited);
    }

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "request body is not JSON");
        AppError::Internal(format!("invalid request body: {e}"))
    })?;

    let messages = validate_messages(&payload)?;

    let upstream = state.gateway.stream_completion(&messages).await?;
    info!(turns = messages.len(), "relaying upstream stream");

    // Bytes go through as they arrive; framing is the upstream's.
    let stream = upstream.bytes_stream();
    Ok((StatusCode::OK, [(CONTENT_TYPE, EVENT_STREAM)], Body::from_stream(stream)).into_response())
}

/// Bare OPTIONS: nothing to do, the CORS layer adds the headers.
pub async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}
