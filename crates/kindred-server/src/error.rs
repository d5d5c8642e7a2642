use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kindred_core::time::TimeParseError;
use kindred_core::CoreError;
use kindred_store::{StoreError, StoreErrorKind};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError::BadRequest(message.into())
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    ApiError::NotFound(message.into())
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<TimeParseError> for ApiError {
    fn from(err: TimeParseError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            ApiError::Internal(_) => internal(self),
            ApiError::Store(err) => match err.kind() {
                StoreErrorKind::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
                StoreErrorKind::Core
                | StoreErrorKind::InvalidId
                | StoreErrorKind::InvalidActivityKind => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                StoreErrorKind::Io
                | StoreErrorKind::Sql
                | StoreErrorKind::Json
                | StoreErrorKind::MissingHomeDir
                | StoreErrorKind::Migration
                | StoreErrorKind::InvalidDataPath => internal(self),
            },
        }
    }
}

fn internal(err: &ApiError) -> (StatusCode, String) {
    tracing::error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error".to_string(),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = ErrorBody {
            success: false,
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_404() {
        let err = ApiError::from(StoreError::NotFound("contact".to_string()));
        assert_eq!(err.status_and_message().0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_errors_map_to_400() {
        let err = ApiError::from(StoreError::Core(CoreError::EmptyFirstName));
        assert_eq!(err.status_and_message().0, StatusCode::BAD_REQUEST);

        let err = ApiError::from(TimeParseError::Empty);
        assert_eq!(err.status_and_message().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_failures_hide_details() {
        let err = ApiError::from(StoreError::Migration("boom".to_string()));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal Server Error");
    }
}
