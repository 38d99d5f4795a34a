use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::{ApiError, AppState, DEFAULT_WELLNESS_LIMIT, LimitQuery};
use crate::models::{WellnessDraft, WellnessEntry};

pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<WellnessEntry>>, ApiError> {
    let limit = query.or(DEFAULT_WELLNESS_LIMIT);
    let entries = state
        .with_db("Error fetching wellness data", move |db| db.get_wellness(limit))
        .await?;
    Ok(Json(entries))
}

pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WellnessDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<WellnessEntry>), ApiError> {
    const CONTEXT: &str = "Error creating wellness entry";
    let Json(draft) = payload.map_err(ApiError::rejected(CONTEXT))?;
    draft.validate().map_err(ApiError::invalid(CONTEXT))?;

    let entry = state.with_db(CONTEXT, move |db| db.create_wellness(draft)).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
