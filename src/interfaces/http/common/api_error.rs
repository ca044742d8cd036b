//! `DomainError` → HTTP response mapping
//!
//! | Error                   | Status | Body                        |
//! |-------------------------|--------|-----------------------------|
//! | `Validation`            | 400    | `{"field": ["message"]}`    |
//! | `TokenMissing`          | 400    | `{"error": "..."}`          |
//! | malformed body          | 400    | `{"detail": "..."}`         |
//! | `Unauthorized`          | 401    | `{"detail": "..."}`         |
//! | `Forbidden`             | 403    | `{"detail": "..."}`         |
//! | `NotFound`              | 404    | `{"detail": "Not found."}`  |
//! | `Database` / `Crypto`   | 500    | `{"detail": "..."}`         |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::shared::{DomainError, FieldErrors};

#[derive(Debug)]
pub enum ApiError {
    Validation(FieldErrors),
    /// Operation-level failure reported as `{"error": ...}`.
    Failed(String),
    Malformed(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound,
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(errors) => ApiError::Validation(errors),
            DomainError::TokenMissing(msg) => ApiError::Failed(msg),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::NotFound { .. } => ApiError::NotFound,
            DomainError::Database(_) | DomainError::Crypto(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = |status: StatusCode, msg: String| (status, Json(json!({ "detail": msg })));

        match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::Failed(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Malformed(msg) => detail(StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Unauthorized(msg) => detail(StatusCode::UNAUTHORIZED, msg).into_response(),
            ApiError::Forbidden(msg) => detail(StatusCode::FORBIDDEN, msg).into_response(),
            ApiError::NotFound => {
                detail(StatusCode::NOT_FOUND, "Not found.".to_string()).into_response()
            }
            ApiError::Internal(msg) => {
                error!("Request failed: {}", msg);
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A server error occurred.".to_string(),
                )
                .into_response()
            }
        }
    }
}
