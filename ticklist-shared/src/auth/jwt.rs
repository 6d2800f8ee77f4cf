/// JWT token generation and validation
///
/// Tokens are signed with HS256 and bind a username (subject) to an
/// expiry. Two kinds exist: short-lived access tokens that authorize API
/// calls, and long-lived refresh tokens that can only be exchanged for a
/// new access token. The kind is an explicit claim, so presenting an
/// access token to the refresh path (or vice versa) fails validation.
///
/// There is no revocation: a token is valid for its entire lifetime once
/// issued. The signing secret is process-wide immutable configuration.
///
/// # Example
///
/// ```
/// use ticklist_shared::auth::jwt::{create_token, validate_token, Claims, TokenKind};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new("alice", TokenKind::Access);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long")?;
///
/// let validated = validate_token(&token, "secret-key-at-least-32-bytes-long")?;
/// assert_eq!(validated.sub, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim stamped into every token
const ISSUER: &str = "ticklist";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token kind does not match the operation
    #[error("Wrong token kind: expected {expected}, got {actual}")]
    WrongKind {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Token kind identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Access token (short-lived, authorizes API calls)
    Access,

    /// Refresh token (long-lived, exchanged for new access tokens)
    Refresh,
}

impl TokenKind {
    /// Gets the fixed lifetime for this token kind
    pub fn lifetime(&self) -> Duration {
        match self {
            TokenKind::Access => Duration::hours(1),
            TokenKind::Refresh => Duration::days(30),
        }
    }

    /// Gets the token kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// JWT claims structure
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`) plus the custom
/// `kind` claim distinguishing access from refresh tokens. The subject is
/// the username, which the request layer resolves back to a user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - username
    pub sub: String,

    /// Issuer - always "ticklist"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Token kind (custom claim)
    pub kind: TokenKind,
}

impl Claims {
    /// Creates new claims with the fixed lifetime for the given kind
    pub fn new(username: impl Into<String>, kind: TokenKind) -> Self {
        Self::with_expiration(username, kind, kind.lifetime())
    }

    /// Creates claims with a custom expiration
    ///
    /// Used by tests to produce already-expired tokens; production code
    /// goes through [`Claims::new`].
    pub fn with_expiration(
        username: impl Into<String>,
        kind: TokenKind,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: username.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            kind,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret. The secret
/// should be at least 32 bytes and randomly generated.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies the signature, expiry, not-before time, and issuer. An
/// expired token fails even when the signature is structurally valid.
///
/// # Errors
///
/// Returns `JwtError::Expired` for expired tokens and
/// `JwtError::ValidationError` for any other invalid or malformed token.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token and checks it is an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.kind != TokenKind::Access {
        return Err(JwtError::WrongKind {
            expected: TokenKind::Access.as_str(),
            actual: claims.kind.as_str(),
        });
    }

    Ok(claims)
}

/// Validates a token and checks it is a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.kind != TokenKind::Refresh {
        return Err(JwtError::WrongKind {
            expected: TokenKind::Refresh.as_str(),
            actual: claims.kind.as_str(),
        });
    }

    Ok(claims)
}

/// Exchanges a valid refresh token for a new access token
///
/// The new access token carries the same username and a fresh expiry.
///
/// # Errors
///
/// Returns an error if the refresh token is invalid, expired, or is not
/// a refresh token.
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let refresh_claims = validate_refresh_token(refresh_token, secret)?;

    let access_claims = Claims::new(refresh_claims.sub, TokenKind::Access);

    create_token(&access_claims, secret)
}
