//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::channel::ChannelId;

/// Application error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    /// A write payload failed to decode into the value the channel expects.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The request named a channel that is not in the channel table.
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// The channel exists but does not accept writes.
    #[error("Channel {0} is read-only")]
    NotWritable(ChannelId),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable numeric code carried in both HTTP error bodies and
    /// gateway error frames.
    pub fn code(&self) -> u16 {
        match self {
            AppError::Internal(_) => 20000,
            AppError::InvalidInput(_) => 20001,
            AppError::UnknownChannel(_) => 20002,
            AppError::NotWritable(_) => 20003,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UnknownChannel(name) => {
                (StatusCode::NOT_FOUND, format!("Unknown channel: {}", name))
            }
            AppError::NotWritable(channel) => (
                StatusCode::METHOD_NOT_ALLOWED,
                format!("Channel {} is read-only", channel),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        let body = ErrorResponse { code, message };

        (status, Json(body)).into_response()
    }
}
