/// Per-request identity resolution
///
/// Every authenticated endpoint goes through the same sequence: extract
/// the bearer token, validate it as an access token, resolve the subject
/// username to a numeric user id, and hand the result to the handler as
/// an [`AuthContext`] request extension.
///
/// A valid token whose username no longer maps to a user is an
/// unexpected-state error, not an authorization failure: tokens are only
/// issued for existing users and users are never deleted in this system.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use ticklist_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.username, auth.user_id)
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;

use super::jwt::{validate_access_token, JwtError};
use crate::models::user::User;

/// Authentication context added to request extensions
///
/// Handlers extract it with Axum's `Extension` extractor after the auth
/// layer has run.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Resolved numeric id of the authenticated user
    pub user_id: i64,

    /// Username from the token's subject claim
    pub username: String,
}

/// Error type for identity resolution
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Invalid authorization header format
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token subject does not map to an existing user
    #[error("Token subject does not map to an existing user")]
    UnknownSubject,

    /// Database error during resolution
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(_) => {
                (StatusCode::UNAUTHORIZED, "Invalid token").into_response()
            }
            AuthError::UnknownSubject | AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Extracts the bearer token from an `Authorization` header value
///
/// # Errors
///
/// Returns `AuthError::InvalidFormat` when the header is not a Bearer
/// scheme.
pub fn extract_bearer(auth_header: &str) -> Result<&str, AuthError> {
    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Resolves a bearer access token to an authenticated identity
///
/// Validates the token, then looks up the subject username to obtain the
/// numeric user id that scopes all todo operations.
///
/// # Errors
///
/// - `AuthError::InvalidToken` for bad signature, expiry, or wrong kind
/// - `AuthError::UnknownSubject` when the username no longer exists
/// - `AuthError::DatabaseError` when the lookup itself fails
pub async fn resolve_identity(
    pool: &PgPool,
    token: &str,
    secret: &str,
) -> Result<AuthContext, AuthError> {
    let claims = validate_access_token(token, secret)?;

    let user = User::find_by_username(pool, &claims.sub)
        .await?
        .ok_or(AuthError::UnknownSubject)?;

    Ok(AuthContext {
        user_id: user.id,
        username: user.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_wrong_scheme() {
        assert!(extract_bearer("Basic dXNlcjpwYXNz").is_err());
        assert!(extract_bearer("abc.def.ghi").is_err());
    }
}
