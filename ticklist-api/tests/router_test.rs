/// Router-level tests for authentication and error translation
///
/// These tests exercise the request layer without a live database: the
/// pool is created lazily and never connected, and every request below
/// is rejected (or satisfied) before any query runs. DB-backed behavior
/// is covered by todo_flow_test.rs against a live Postgres.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::postgres::PgPoolOptions;
use ticklist_api::app::{build_router, AppState};
use ticklist_api::config::{ApiConfig, Config, DatabaseConfig, ImageHostConfig, JwtConfig};
use ticklist_shared::auth::jwt::{create_token, Claims, TokenKind};
use tower::Service as _;

const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Builds an app whose pool never connects; only non-DB paths may run.
fn test_app() -> axum::Router {
    let config = Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgresql://nobody@localhost:1/unreachable".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
        images: ImageHostConfig {
            upload_url: "https://images.example.com/image/upload".to_string(),
            upload_preset: "ticklist".to_string(),
        },
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database.url)
        .expect("lazy pool");

    build_router(AppState::new(pool, config))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_todos_without_token_is_unauthorized() {
    let mut app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/todos")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "unauthorized");
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_non_bearer_scheme_is_bad_request() {
    let mut app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/todos")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "bad_request");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let mut app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/todos")
        .header("authorization", "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "unauthorized");
    // Never leak validation internals
    assert_eq!(json["message"], "Invalid token");
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let mut app = test_app();

    let claims = Claims::with_expiration("alice", TokenKind::Access, chrono::Duration::seconds(-60));
    let token = create_token(&claims, JWT_SECRET).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/todos")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_rejected_on_access_routes() {
    let mut app = test_app();

    let claims = Claims::new("alice", TokenKind::Refresh);
    let token = create_token(&claims, JWT_SECRET).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/todos")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_endpoint_rejects_access_token() {
    let mut app = test_app();

    let claims = Claims::new("alice", TokenKind::Access);
    let token = create_token(&claims, JWT_SECRET).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/users/refresh")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "unauthorized");
}

#[tokio::test]
async fn test_refresh_endpoint_issues_access_token() {
    let mut app = test_app();

    let claims = Claims::new("alice", TokenKind::Refresh);
    let token = create_token(&claims, JWT_SECRET).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/users/refresh")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let new_token = json["access_token"].as_str().unwrap();

    // The new token is a valid access token for the same user
    let validated =
        ticklist_shared::auth::jwt::validate_access_token(new_token, JWT_SECRET).unwrap();
    assert_eq!(validated.sub, "alice");
}

#[tokio::test]
async fn test_refresh_endpoint_without_header_is_unauthorized() {
    let mut app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/users/refresh")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_lookup_without_parameters_is_bad_request() {
    let mut app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/users")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "bad_request");
}

#[tokio::test]
async fn test_register_with_empty_username_is_validation_error() {
    let mut app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/users")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"username": "", "password": "pw1"}"#))
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "validation_error");
    assert_eq!(json["details"][0]["field"], "username");
}
