use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{ApiError, AppState};
use crate::insights;
use crate::models::{Acknowledgement, PrioritizeOutcome, Task, TaskDraft, TaskPatch, TaskStatus};

pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state
        .with_db("Error fetching tasks", |db| db.get_all_tasks(None))
        .await?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TaskDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    const CONTEXT: &str = "Error creating task";
    let Json(draft) = payload.map_err(ApiError::rejected(CONTEXT))?;
    draft.validate().map_err(ApiError::invalid(CONTEXT))?;

    let task = state.with_db(CONTEXT, move |db| db.create_task(draft)).await?;
    tracing::debug!(id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    const CONTEXT: &str = "Error updating task";
    let Json(patch) = payload.map_err(ApiError::rejected(CONTEXT))?;
    patch.validate().map_err(ApiError::invalid(CONTEXT))?;

    let task = state
        .with_db(CONTEXT, move |db| db.update_task(&id, patch))
        .await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Acknowledgement>, ApiError> {
    state
        .with_db("Error deleting task", move |db| db.delete_task(&id))
        .await?;
    Ok(Json(Acknowledgement {
        message: "Task deleted successfully".to_string(),
    }))
}

/// Attach a suggestion to every pending task that lacks one, then write the
/// suggestion of every pending task. Storage order is left alone.
pub async fn prioritize_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrioritizeOutcome>, ApiError> {
    const CONTEXT: &str = "Error prioritizing tasks";
    let mut pending = state
        .with_db(CONTEXT, |db| db.get_all_tasks(Some(TaskStatus::Pending)))
        .await?;

    state.with_rng_mut(|rng| insights::assign_suggestions(&mut pending, rng))?;
    let updates: Vec<(String, String)> = pending
        .into_iter()
        .filter_map(|task| task.ai_suggestion.map(|s| (task.id, s)))
        .collect();

    let count = state
        .with_db(CONTEXT, move |db| db.set_task_suggestions(&updates))
        .await?;
    tracing::info!(count, "tasks prioritized");

    Ok(Json(PrioritizeOutcome {
        message: "Tasks prioritized successfully".to_string(),
        count,
    }))
}
