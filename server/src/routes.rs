//! Axum handlers mapping the HTTP surface onto [`TodoStore`] operations.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::error::StoreError;
use crate::store::TodoStore;
use crate::types::{CreateTodo, ReorderEntry, Todo, UpdateTodo};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: TodoStore,
    pub started: Instant,
}

impl AppState {
    pub fn new(store: TodoStore) -> Self {
        Self {
            store,
            started: Instant::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub completed: Option<bool>,
}

pub async fn list_todos(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Todo>>, StoreError> {
    state.store.list(query.completed).map(Json)
}

pub async fn create_todo(
    State(state): State<AppState>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), StoreError> {
    let todo = state.store.create(&input)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, StoreError> {
    state.store.get(id).map(Json)
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateTodo>,
) -> Result<Json<Todo>, StoreError> {
    state.store.update(id, &patch).map(Json)
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StoreError> {
    if state.store.delete(id)? {
        Ok(StatusCode::OK)
    } else {
        Err(StoreError::NotFound(id))
    }
}

/// Bulk order reassignment. The body carries the full item set with the
/// client-computed dense renumbering; the store applies it atomically.
pub async fn reorder_todos(
    State(state): State<AppState>,
    Json(entries): Json<Vec<ReorderEntry>>,
) -> Result<Json<Vec<Todo>>, StoreError> {
    state.store.reorder(&entries).map(Json)
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_secs": state.started.elapsed().as_secs(),
    }))
}
