use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every error body has the shape `{ "error": string, "details"?: string }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A third-party service (LLM, Zep, Hume) failed and there is no fallback.
    #[error("{service} error: {message}")]
    Upstream { service: &'static str, message: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(service: &'static str, err: impl std::fmt::Display) -> Self {
        AppError::Upstream {
            service,
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Upstream { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Extractor rejections (bad JSON, wrong content type, malformed path or
// query) are client errors and use the same body shape as everything else.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::NotFound(msg) | AppError::Validation(msg) => json!({ "error": msg }),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                json!({
                    "error": "A database error occurred",
                    "details": e.to_string(),
                })
            }
            AppError::Upstream { service, message } => {
                tracing::error!("{service} error: {message}");
                json!({
                    "error": format!("{service} request failed"),
                    "details": message,
                })
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                json!({
                    "error": "An internal server error occurred",
                    "details": format!("{e:#}"),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
