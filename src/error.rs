// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ApiError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Unauthorized(reason) => {
                tracing::warn!(reason = %reason, "Unauthorized request");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::with_details("Unauthorized", reason.clone()),
                )
            }
            ApiError::Forbidden(reason) => {
                tracing::warn!(reason = %reason, "Forbidden request");
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse::with_details("Forbidden", reason.clone()),
                )
            }
            ApiError::NotFound { entity, id } => {
                tracing::debug!(entity = %entity, id = %id, "Entity not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::with_details(format!("{entity} not found"), format!("ID: {id}")),
                )
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, ErrorResponse::with_details("Bad request", msg.clone()))
            }
            ApiError::Store(err) => {
                tracing::error!(error = %err, "Store error");
                let status = match err {
                    StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                    StoreError::Rejected(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, ErrorResponse::new("Storage failure"))
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
