use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{ApiError, AppState};
use crate::models::{Acknowledgement, Note, NoteDraft, NotePatch, SummarizedNote};

pub async fn list_notes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state
        .with_db("Error fetching notes", |db| db.get_all_notes())
        .await?;
    Ok(Json(notes))
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NoteDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    const CONTEXT: &str = "Error creating note";
    let Json(draft) = payload.map_err(ApiError::rejected(CONTEXT))?;
    draft.validate().map_err(ApiError::invalid(CONTEXT))?;

    let note = state.with_db(CONTEXT, move |db| db.create_note(draft)).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<NotePatch>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    const CONTEXT: &str = "Error updating note";
    let Json(patch) = payload.map_err(ApiError::rejected(CONTEXT))?;
    patch.validate().map_err(ApiError::invalid(CONTEXT))?;

    let note = state
        .with_db(CONTEXT, move |db| db.update_note(&id, patch))
        .await?;
    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Acknowledgement>, ApiError> {
    state
        .with_db("Error deleting note", move |db| db.delete_note(&id))
        .await?;
    Ok(Json(Acknowledgement {
        message: "Note deleted successfully".to_string(),
    }))
}

pub async fn summarize_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SummarizedNote>, ApiError> {
    let (note, analysis) = state
        .with_db("Error summarizing note", move |db| db.summarize_note(&id))
        .await?;
    Ok(Json(SummarizedNote { note, analysis }))
}
