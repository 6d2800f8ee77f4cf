/// User endpoints
///
/// # Endpoints
///
/// - `POST /v1/users` - Register a new user
/// - `POST /v1/users/login` - Login and get access + refresh tokens
/// - `GET /v1/users/me` - Current user's profile (bearer access token)
/// - `POST /v1/users/me/upload` - Upload profile image (bearer access token)
/// - `GET /v1/users/refresh` - New access token (bearer refresh token)
/// - `GET /v1/users?id=&username=` - Public lookup by id or username

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use ticklist_shared::{
    auth::{
        jwt::{self, Claims, TokenKind},
        middleware::{extract_bearer, AuthContext},
        password,
    },
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,

    /// Password (stored only as an Argon2id hash)
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Success message
    pub message: String,

    /// Assigned user id
    pub id: i64,

    /// Registered username
    pub username: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (1h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (1h)
    pub access_token: String,
}

/// Current user's profile
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Username
    pub username: String,

    /// Profile image URL, if one was uploaded
    pub profile_image: Option<String>,
}

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Success message
    pub message: String,

    /// Hosted image URL now stored on the user record
    pub url: String,
}

/// Public view of a user, for the unauthenticated lookup endpoint
///
/// Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    /// User id
    pub id: i64,

    /// Username
    pub username: String,

    /// Profile image URL
    pub profile_image: Option<String>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            profile_image: user.profile_image,
        }
    }
}

/// Lookup query parameters
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    /// Lookup by id
    pub id: Option<i64>,

    /// Lookup by username
    pub username: Option<String>,
}

/// Register a new user
///
/// The password is hashed before storage; plaintext is never persisted.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `409 Conflict`: username already taken (original record unchanged)
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let hashed_password = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            hashed_password,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            id: user.id,
            username: user.username,
        }),
    ))
}

/// Login and receive access + refresh tokens
///
/// Both an unknown username and a wrong password report the same
/// invalid-credentials message.
///
/// # Errors
///
/// - `401 Unauthorized`: invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.hashed_password)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let access_claims = Claims::new(user.username.as_str(), TokenKind::Access);
    let refresh_claims = Claims::new(user.username.as_str(), TokenKind::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
    }))
}

/// Current user's profile
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProfileResponse>> {
    // The auth layer resolved the user a moment ago; re-read for the
    // profile image so the response reflects the latest upload.
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::InternalError("Authenticated user vanished".to_string()))?;

    Ok(Json(ProfileResponse {
        username: user.username,
        profile_image: user.profile_image,
    }))
}

/// Upload a profile image
///
/// The binary request body is forwarded to the external image host; only
/// the URL it returns is stored on the user record.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: empty body
/// - `400 Bad Request`: the image host rejected the upload
pub async fn upload_profile_image(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Bytes,
) -> ApiResult<Json<UploadResponse>> {
    if body.is_empty() {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "profile_image".to_string(),
            message: "No file uploaded".to_string(),
        }]));
    }

    let url = state.images.upload(body.to_vec(), &auth.username).await?;

    User::set_profile_image(&state.db, auth.user_id, &url)
        .await?
        .ok_or_else(|| ApiError::InternalError("Authenticated user vanished".to_string()))?;

    tracing::info!(user_id = auth.user_id, "Profile image updated");

    Ok(Json(UploadResponse {
        message: "Profile image uploaded successfully".to_string(),
        url,
    }))
}

/// Exchange a refresh token for a new access token
///
/// The bearer token on this endpoint is a refresh token, so it is
/// validated here rather than by the access-token auth layer. An access
/// token presented here is rejected.
///
/// # Errors
///
/// - `401 Unauthorized`: invalid, expired, or wrong-kind token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<RefreshResponse>> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let refresh_token = extract_bearer(auth_header)?;

    let access_token = jwt::refresh_access_token(refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Public lookup by id or username
///
/// Unauthenticated, as the original API behaves; only public fields are
/// returned. When both parameters are present, id wins.
///
/// # Errors
///
/// - `400 Bad Request`: neither parameter given
/// - `404 Not Found`: no matching user
pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> ApiResult<Json<PublicUser>> {
    let user = if let Some(id) = query.id {
        User::find_by_id(&state.db, id).await?
    } else if let Some(ref username) = query.username {
        User::find_by_username(&state.db, username).await?
    } else {
        return Err(ApiError::BadRequest(
            "Provide an id or username query parameter".to_string(),
        ));
    };

    let user = user.ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
