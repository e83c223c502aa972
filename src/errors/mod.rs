//! Unified error handling with RFC 7807 Problem-Details responses.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Problem-Details body returned for every error response.
///
/// `errors` carries field-level validation messages and is omitted when empty.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed")]
    ValidationFields(BTreeMap<String, Vec<String>>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Route resolution failed: {0}")]
    RouteResolution(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error represents an authorization failure.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value for '{field}'"))
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        AppError::ValidationFields(fields)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, problem_type, title, detail, errors) = match self {
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "not-found",
                "Resource not found",
                msg,
                None,
            ),
            AppError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation-error",
                "Validation failed",
                msg,
                None,
            ),
            AppError::ValidationFields(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation-error",
                "Validation failed",
                "One or more fields are invalid".to_string(),
                Some(fields),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required",
                "A valid access token is required".to_string(),
                None,
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "Access denied",
                msg,
                None,
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", "Conflict", msg, None),
            AppError::RouteResolution(msg) => {
                // Internal misconfiguration; never leak the route table to clients.
                tracing::error!(error = %msg, "Route resolution failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal-error",
                    "Internal server error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal-error",
                    "Internal server error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal-error",
                    "Internal server error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ProblemDetails {
            problem_type: format!("https://homeport.dev/problems/{problem_type}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_is_not_found() {
        let err = AppError::NotFound("song".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_forbidden());
    }

    #[test]
    fn app_error_display() {
        let err = AppError::Validation("name is required".to_string());
        assert_eq!(err.to_string(), "Validation error: name is required");
    }

    #[test]
    fn app_error_from_sqlx() {
        let sqlx_err = sqlx::Error::RowNotFound;
        let err: AppError = sqlx_err.into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn problem_details_omits_empty_errors() {
        let body = ProblemDetails {
            problem_type: "https://homeport.dev/problems/not-found".to_string(),
            title: "Resource not found".to_string(),
            status: 404,
            detail: "Vehicle 42 not found".to_string(),
            errors: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "https://homeport.dev/problems/not-found");
        assert_eq!(json["status"], 404);
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn validation_errors_map_to_fields() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 1, message = "name must not be empty"))]
            name: String,
        }

        let probe = Probe {
            name: String::new(),
        };
        let err: AppError = probe.validate().unwrap_err().into();
        match err {
            AppError::ValidationFields(fields) => {
                assert_eq!(fields["name"], vec!["name must not be empty".to_string()]);
            }
            other => panic!("expected ValidationFields, got {other:?}"),
        }
    }
}
