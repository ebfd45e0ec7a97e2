// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::message::ErrorBody;
use crate::services::{gateway::GatewayError, validation::ValidationError};

pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable.";
pub const UPSTREAM_MESSAGE: &str = "AI service error";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";

/// Every way the relay can refuse a request.
///
/// The client only ever sees the fixed messages above; details stay in the logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing or invalid bearer token")]
    Unauthorized,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("upstream quota exhausted")]
    QuotaExhausted,

    #[error("AI service not configured")]
    NotConfigured,

    #[error("upstream returned status {0}")]
    Upstream(StatusCode),

    #[error("{0}")]
    Internal(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotConfigured => AppError::NotConfigured,
            GatewayError::RateLimited => AppError::RateLimited,
            GatewayError::QuotaExhausted => AppError::QuotaExhausted,
            GatewayError::Status(status) => AppError::Upstream(status),
            GatewayError::Transport(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            AppError::NotConfigured | AppError::Upstream(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::RateLimited => RATE_LIMITED_MESSAGE.to_string(),
            AppError::Validation(e) => e.to_string(),
            AppError::QuotaExhausted => UNAVAILABLE_MESSAGE.to_string(),
            AppError::Upstream(_) => UPSTREAM_MESSAGE.to_string(),
            AppError::NotConfigured | AppError::Internal(_) => UNEXPECTED_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "chat error");
        } else {
            warn!(error = %self, %status, "chat request rejected");
        }
        (status, Json(ErrorBody { error: self.public_message() })).into_response()
    }
}
