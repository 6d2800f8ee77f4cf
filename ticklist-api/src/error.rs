/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, ApiError>`, and this is the single place
/// where domain error kinds become transport-level status codes and
/// `{code, message}` bodies. Anything unexpected collapses to a generic
/// internal error; internal detail is logged, never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401) - bad/expired/missing token, bad credentials
    Unauthorized(String),

    /// Not found (404) - includes lookups scoped to another owner
    NotFound(String),

    /// Conflict (409) - duplicate username
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "unauthorized")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl ApiError {
    /// Flattens `validator` output into a `ValidationError` kind
    ///
    /// Handlers call this on `req.validate()` failures so every payload
    /// reports field-level details in the same shape.
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

/// Maps a named database constraint to an API error
///
/// Only the username uniqueness constraint is a client-visible conflict.
/// Anything else (foreign keys, checks) is a server-side bug and collapses
/// to an internal error, whose response body never carries the constraint
/// name.
fn map_constraint(constraint: &str) -> ApiError {
    if constraint.contains("username") {
        ApiError::Conflict("Username already exists".to_string())
    } else {
        ApiError::InternalError(format!("Constraint violation: {}", constraint))
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    return map_constraint(constraint);
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert identity resolution errors to API errors
impl From<ticklist_shared::auth::middleware::AuthError> for ApiError {
    fn from(err: ticklist_shared::auth::middleware::AuthError) -> Self {
        use ticklist_shared::auth::middleware::AuthError;

        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::InvalidToken(_) => ApiError::Unauthorized("Invalid token".to_string()),
            // A verified token must always map to an existing user
            AuthError::UnknownSubject => {
                ApiError::InternalError("Token subject does not map to an existing user".to_string())
            }
            AuthError::DatabaseError(msg) => ApiError::InternalError(msg.to_string()),
        }
    }
}

/// Convert JWT errors to API errors
impl From<ticklist_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: ticklist_shared::auth::jwt::JwtError) -> Self {
        use ticklist_shared::auth::jwt::JwtError;

        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::WrongKind { expected, .. } => {
                ApiError::Unauthorized(format!("Expected {} token", expected))
            }
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            JwtError::ValidationError(_) => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<ticklist_shared::auth::password::PasswordError> for ApiError {
    fn from(err: ticklist_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert image host errors to API errors
impl From<crate::images::ImageHostError> for ApiError {
    fn from(err: crate::images::ImageHostError) -> Self {
        use crate::images::ImageHostError;

        match err {
            ImageHostError::Rejected(msg) => ApiError::BadRequest(msg),
            ImageHostError::Transport(msg) | ImageHostError::MalformedResponse(msg) => {
                ApiError::InternalError(format!("Image host error: {}", msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticklist_shared::auth::jwt::JwtError;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Todo not found".to_string());
        assert_eq!(err.to_string(), "Not found: Todo not found");
    }

    #[test]
    fn test_validation_error_display() {
        let errors = vec![
            ValidationErrorDetail {
                field: "username".to_string(),
                message: "Username too long".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Password too short".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_expired_token_maps_to_unauthorized() {
        let err: ApiError = JwtError::Expired.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_wrong_kind_maps_to_unauthorized() {
        let err: ApiError = JwtError::WrongKind {
            expected: "refresh",
            actual: "access",
        }
        .into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_username_constraint_maps_to_conflict() {
        let err = map_constraint("users_username_key");
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_other_constraints_map_to_internal_error() {
        // FK violations are server bugs, not client conflicts
        let err = map_constraint("todos_owner_id_fkey");
        assert!(matches!(err, ApiError::InternalError(_)));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_body_is_generic() {
        let response = ApiError::InternalError("secret detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_serialization() {
        let body = ErrorResponse {
            code: "not_found".to_string(),
            message: "Todo not found".to_string(),
            details: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "not_found");
        assert_eq!(json["message"], "Todo not found");
        assert!(json.get("details").is_none());
    }
}
