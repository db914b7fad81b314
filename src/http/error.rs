use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::application::{ErrorKind, LedgerError};

/// Errors as the HTTP layer reports them.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(#[source] LedgerError),
}

impl ApiError {
    /// Mapping for lookups: a missing wallet is a 404.
    pub fn from_lookup(err: LedgerError) -> Self {
        match err.kind() {
            ErrorKind::State => ApiError::NotFound(err.to_string()),
            ErrorKind::Infrastructure | ErrorKind::Integrity => ApiError::Internal(err),
            ErrorKind::Input | ErrorKind::Business => ApiError::BadRequest(err.to_string()),
        }
    }

    /// Mapping for mutations: every rejection of the request is a 400, store
    /// failures and corrupt stored data stay a 500.
    pub fn from_update(err: LedgerError) -> Self {
        match err.kind() {
            ErrorKind::Infrastructure | ErrorKind::Integrity => ApiError::Internal(err),
            ErrorKind::Input | ErrorKind::State | ErrorKind::Business => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "INTERNAL_ERROR",
            ),
        };

        let body = Json(json!({
            "error": code,
            "message": message
        }));

        (status, body).into_response()
    }
}
