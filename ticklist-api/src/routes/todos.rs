/// Todo endpoints
///
/// All endpoints require a bearer access token; the auth layer has
/// already resolved it to an `AuthContext` carrying the caller's user
/// id. Every database operation is scoped to that id, so a todo id
/// belonging to another user reports not-found.
///
/// # Endpoints
///
/// - `POST /v1/todos` - Create a todo for the caller
/// - `GET /v1/todos` - List the caller's todos, newest first
/// - `GET /v1/todos/complete` - List the caller's finished todos
/// - `GET /v1/todos/incomplete` - List the caller's unfinished todos
/// - `PUT /v1/todos/:id` - Replace text and done flag
/// - `PUT /v1/todos/:id/toggle` - Toggle done, return the new state
/// - `GET /v1/todos/:id/state` - Return the done state
/// - `DELETE /v1/todos/:id` - Delete the caller's todo

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use ticklist_shared::{auth::middleware::AuthContext, models::todo::Todo};
use validator::Validate;

/// Create todo request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    /// Item content
    #[validate(length(min = 1, message = "Todo text must not be empty"))]
    pub text: String,
}

/// Create todo response
#[derive(Debug, Serialize)]
pub struct CreateTodoResponse {
    /// Success message
    pub message: String,

    /// The created todo
    pub todo: Todo,
}

/// Update todo request: full replacement of the mutable fields
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    /// New item content
    #[validate(length(min = 1, message = "Todo text must not be empty"))]
    pub text: String,

    /// New done flag
    pub done: bool,
}

/// Update todo response
#[derive(Debug, Serialize)]
pub struct UpdateTodoResponse {
    /// Success message
    pub message: String,

    /// The todo after the update
    pub todo: Todo,
}

/// Toggle response: the todo's new state
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// Todo id
    pub id: i64,

    /// Done flag after the toggle
    pub done: bool,
}

/// Done-state response
#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// Done flag
    pub done: bool,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
}

/// Create a todo for the caller
///
/// New todos start with `done = false`.
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<CreateTodoResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let todo = Todo::create(&state.db, auth.user_id, &req.text).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTodoResponse {
            message: "Todo created successfully".to_string(),
            todo,
        }),
    ))
}

/// List the caller's todos, newest first by id
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Todo>>> {
    let todos = Todo::list_for_owner(&state.db, auth.user_id).await?;

    Ok(Json(todos))
}

/// List the caller's finished todos, newest first by id
pub async fn list_complete_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Todo>>> {
    let todos = Todo::list_for_owner_by_done(&state.db, auth.user_id, true).await?;

    Ok(Json(todos))
}

/// List the caller's unfinished todos, newest first by id
pub async fn list_incomplete_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Todo>>> {
    let todos = Todo::list_for_owner_by_done(&state.db, auth.user_id, false).await?;

    Ok(Json(todos))
}

/// Replace a todo's text and done flag
///
/// # Errors
///
/// - `404 Not Found`: no such todo for this caller
/// - `422 Unprocessable Entity`: empty text
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTodoRequest>,
) -> ApiResult<Json<UpdateTodoResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let todo = Todo::update(&state.db, id, auth.user_id, &req.text, req.done)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    Ok(Json(UpdateTodoResponse {
        message: "Todo updated successfully".to_string(),
        todo,
    }))
}

/// Toggle a todo's done flag and return the new state
///
/// # Errors
///
/// - `404 Not Found`: no such todo for this caller
pub async fn toggle_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ToggleResponse>> {
    let todo = Todo::toggle_done(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    Ok(Json(ToggleResponse {
        id: todo.id,
        done: todo.done,
    }))
}

/// Return a todo's done state
///
/// # Errors
///
/// - `404 Not Found`: no such todo for this caller
pub async fn todo_state(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<StateResponse>> {
    let todo = Todo::find_for_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    Ok(Json(StateResponse { done: todo.done }))
}

/// Delete the caller's todo
///
/// Deletion is permanent.
///
/// # Errors
///
/// - `404 Not Found`: no such todo for this caller
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteResponse>> {
    Todo::delete(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    Ok(Json(DeleteResponse {
        message: "Todo deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_todo_request_validation() {
        let req = CreateTodoRequest {
            text: "buy milk".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = CreateTodoRequest {
            text: "".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_todo_request_validation() {
        let req = UpdateTodoRequest {
            text: "buy oat milk".to_string(),
            done: true,
        };
        assert!(req.validate().is_ok());

        let req = UpdateTodoRequest {
            text: "".to_string(),
            done: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_toggle_response_serialization() {
        let resp = ToggleResponse { id: 4, done: true };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["done"], true);
    }
}
