use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::state::score::InvalidAlliance;

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A background task backing the operation is gone.
    #[error("unavailable: {0}")]
    Unavailable(String),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<InvalidAlliance> for ServiceError {
    fn from(err: InvalidAlliance) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

/// Problems with a message received from a station. Reported back to the
/// station as an `error` message; the connection stays open.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame was not a JSON envelope.
    #[error("failed to parse message: {0}")]
    Malformed(#[source] serde_json::Error),
    /// Binary frames are not part of the protocol.
    #[error("binary messages are not supported")]
    Binary,
    /// The envelope named a type the session does not handle.
    #[error("Invalid message type '{0}'.")]
    UnknownType(String),
    /// The payload could not be decoded or failed validation.
    #[error("Failed to parse '{kind}' message: {reason}")]
    InvalidPayload {
        /// Message type the payload belonged to.
        kind: String,
        /// Decoder or validator message.
        reason: String,
    },
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Service unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(message) => AppError::ServiceUnavailable(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

impl From<InvalidAlliance> for AppError {
    fn from(err: InvalidAlliance) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
