use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::errors::IngestError;
use crate::infrastructure::persistence::DbError;

/// Errors returned by the HTTP surface
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NotInitialized(String),
    #[error("Unprocessable block: {0}")]
    Unprocessable(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotInitialized(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Timeout { .. } | DbError::ConnectionError(_) => {
                ApiError::Unavailable(err.to_string())
            }
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::NotInitialized => ApiError::NotInitialized(err.to_string()),
            IngestError::DecodeError(e) => ApiError::InvalidRequest(e.to_string()),
            IngestError::HandlerError { .. } => ApiError::Unprocessable(err.to_string()),
            IngestError::DbError(e) => ApiError::from(e),
        }
    }
}
