use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};

use crate::api::error::{resolve_conflict, ApiError};
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::handlers::{created, AppState, Created};
use crate::logic::{require_fields, ValidationError};
use crate::model::{Id, NewTodo, Todo};
use crate::store::traits::Store;

fn todo_not_found(id: Id) -> ApiError {
    ApiError::not_found(format!("ToDo {id} not found"))
}

pub async fn list_todos<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.store.list_todos().await?))
}

pub async fn get_todo<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Todo>, ApiError> {
    state
        .store
        .get_todo(id)
        .await?
        .map(Json)
        .ok_or_else(|| todo_not_found(id))
}

pub async fn create_todo<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(new_todo): ApiJson<NewTodo>,
) -> Result<Created<Todo>, ApiError> {
    require_fields(&[("name", Some(new_todo.name.as_str()))])?;

    let todo = state.store.insert_todo(new_todo).await?;
    log::info!("Created todo {} '{}'", todo.id, todo.name);
    Ok(created(format!("/api/ToDos/{}", todo.id), todo))
}

/// Whole-record replace. A row that vanished before the write is a 404.
pub async fn replace_todo<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(todo): ApiJson<Todo>,
) -> Result<StatusCode, ApiError> {
    if todo.id != id {
        return Err(ValidationError::IdMismatch {
            route: id,
            body: todo.id,
        }
        .into());
    }
    require_fields(&[("name", Some(todo.name.as_str()))])?;

    if let Err(err) = state.store.replace_todo(todo).await {
        let missing = format!("ToDo {id} not found");
        return Err(resolve_conflict(err, state.store.todo_exists(id), &missing).await);
    }

    log::info!("Replaced todo {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_todo<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_todo(id).await? {
        return Err(todo_not_found(id));
    }
    log::info!("Deleted todo {}", id);
    Ok(StatusCode::NO_CONTENT)
}
