/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use ticklist_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = ticklist_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, images::ImageHostClient};
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use ticklist_shared::auth::middleware::{extract_bearer, resolve_identity};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The
/// config and image client are behind `Arc`, the pool is internally
/// reference-counted, so cloning is cheap. All of it is read-only after
/// startup.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// External image host client
    pub images: Arc<ImageHostClient>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let images = Arc::new(ImageHostClient::new(config.images.clone()));
        Self {
            db,
            config: Arc::new(config),
            images,
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// └── /v1/
///     ├── /users                 # POST register (public)
///     ├── /users                 # GET lookup by id/username (public)
///     ├── /users/login           # POST issue tokens (public)
///     ├── /users/refresh         # GET new access token (bearer refresh)
///     ├── /users/me              # GET profile (bearer access)
///     ├── /users/me/upload       # POST profile image (bearer access)
///     └── /todos                 # todo CRUD (bearer access)
///         ├── POST   /
///         ├── GET    /
///         ├── GET    /complete
///         ├── GET    /incomplete
///         ├── PUT    /:id
///         ├── PUT    /:id/toggle
///         ├── GET    /:id/state
///         └── DELETE /:id
/// ```
///
/// The refresh endpoint validates its token inline (it carries a refresh
/// token, not an access token), so it sits outside the auth layer.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public user routes: registration, login, refresh, lookup
    let user_public_routes = Router::new()
        .route("/users", post(routes::users::register))
        .route("/users", get(routes::users::lookup))
        .route("/users/login", post(routes::users::login))
        .route("/users/refresh", get(routes::users::refresh));

    // Profile routes (require a bearer access token)
    let user_me_routes = Router::new()
        .route("/users/me", get(routes::users::me))
        .route("/users/me/upload", post(routes::users::upload_profile_image))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Todo routes (require a bearer access token)
    let todo_routes = Router::new()
        .route("/todos", post(routes::todos::create_todo))
        .route("/todos", get(routes::todos::list_todos))
        .route("/todos/complete", get(routes::todos::list_complete_todos))
        .route("/todos/incomplete", get(routes::todos::list_incomplete_todos))
        .route("/todos/:id", put(routes::todos::update_todo))
        .route("/todos/:id/toggle", put(routes::todos::toggle_todo))
        .route("/todos/:id/state", get(routes::todos::todo_state))
        .route("/todos/:id", delete(routes::todos::delete_todo))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .merge(user_public_routes)
        .merge(user_me_routes)
        .merge(todo_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts the bearer token from the Authorization header, validates it
/// as an access token, resolves the subject username to a user id, and
/// injects an `AuthContext` into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = extract_bearer(auth_header)?;

    let auth_context = resolve_identity(&state.db, token, state.jwt_secret()).await?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
