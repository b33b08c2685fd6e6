//! Per-user todo list. Every operation is scoped to the owner; another
//! user's todo is indistinguishable from a missing one.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::todo::TodoRow;
use crate::state::AppState;
use crate::store::require_user;

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_urgent: bool,
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub status: &'static str,
    pub todos: Vec<TodoRow>,
}

fn not_found(todo_id: Uuid) -> AppError {
    AppError::NotFound(format!("Todo {todo_id} not found"))
}

/// POST /api/v1/todos
pub async fn handle_create_todo(
    State(state): State<AppState>,
    Json(request): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoRow>), AppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    require_user(state.store.as_ref(), request.user_id).await?;
    let todo = state
        .store
        .create_todo(
            request.user_id,
            title,
            request.description.trim(),
            request.is_urgent,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /api/v1/todos?user_id=
pub async fn handle_list_todos(
    State(state): State<AppState>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Json<TodoListResponse>, AppError> {
    let todos = state.store.list_todos(owner.user_id).await?;
    Ok(Json(TodoListResponse {
        status: "success",
        todos,
    }))
}

/// POST /api/v1/todos/:id/complete?user_id=
pub async fn handle_complete_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<Uuid>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Json<TodoRow>, AppError> {
    state
        .store
        .complete_todo(owner.user_id, todo_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(todo_id))
}

/// POST /api/v1/todos/:id/toggle-urgent?user_id=
pub async fn handle_toggle_urgent(
    State(state): State<AppState>,
    Path(todo_id): Path<Uuid>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Json<TodoRow>, AppError> {
    state
        .store
        .toggle_todo_urgent(owner.user_id, todo_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(todo_id))
}

/// DELETE /api/v1/todos/:id?user_id=
pub async fn handle_delete_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<Uuid>,
    Query(owner): Query<OwnerQuery>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_todo(owner.user_id, todo_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(todo_id))
    }
}
