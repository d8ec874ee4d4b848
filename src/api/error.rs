//! HTTP error responses
//!
//! | kind           | status | message                                     |
//! |----------------|--------|---------------------------------------------|
//! | validation     | 400    | field specific                              |
//! | conflict       | 400    | duplicate email                             |
//! | unauthorized   | 401    | generic, never says which part was wrong    |
//! | not found      | 404    | same whether missing or owned by someone else |
//! | internal       | 500    | the failing step; details only in the log   |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::validation::ValidationError;
use crate::error::Error;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub missing_fields: Vec<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_fields: Option<&'a [&'static str]>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            missing_fields: Vec::new(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// A failed infrastructure step. `reason` names the step for the client;
    /// the underlying error is only logged.
    pub fn internal(reason: &str, err: impl std::fmt::Display) -> Self {
        tracing::error!("{}: {}", reason, err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, reason)
    }

    /// Map a storage error, reporting lost connectivity separately from the
    /// step that failed
    pub fn storage(reason: &str, err: Error) -> Self {
        if err.is_connection_lost() {
            return Self::internal("Database connection failed", err);
        }
        Self::internal(reason, err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.message,
            missing_fields: err.missing_fields,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: &self.message,
            missing_fields: (!self.missing_fields.is_empty()).then_some(&self.missing_fields[..]),
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_maps_lost_connection() {
        let err = ApiError::storage(
            "Error checking user existence",
            Error::Unavailable("refused".into()),
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Database connection failed");

        let err = ApiError::storage("Error checking user existence", Error::Other("boom".into()));
        assert_eq!(err.message, "Error checking user existence");
    }

    #[test]
    fn test_validation_keeps_missing_fields() {
        let err: ApiError = ValidationError {
            message: "Missing required fields: name".into(),
            missing_fields: vec!["name"],
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.missing_fields, vec!["name"]);
    }
}
