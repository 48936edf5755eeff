use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;
use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(errors) => json!({
                "error": "validation_error",
                "message": "Invalid input",
                "fields": errors,
            }),
            AppError::BadRequest(msg) => json!({ "error": "bad_request", "message": msg }),
            AppError::NotFound(msg) => json!({ "error": "not_found", "message": msg }),
            AppError::Conflict(msg) => json!({ "error": "conflict", "message": msg }),
            AppError::Db(e) => {
                // Driver details stay in the logs.
                error!("Database failure: {}", e);
                json!({ "error": "internal_error", "message": "Internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Db(value)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(value: ValidationErrors) -> Self {
        AppError::Validation(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Database(e) => AppError::Db(e),
        }
    }
}
