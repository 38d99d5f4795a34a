use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use super::{ApiError, AppState};
use crate::insights::{self, ProductivityReport, ANALYTICS_WELLNESS_WINDOW};
use crate::models::{User, UserPatch};

pub async fn get_user(State(state): State<Arc<AppState>>) -> Result<Json<User>, ApiError> {
    let user = state
        .with_db("Error fetching user", |db| db.get_or_create_user())
        .await?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    const CONTEXT: &str = "Error updating user";
    let Json(patch) = payload.map_err(ApiError::rejected(CONTEXT))?;
    patch.validate().map_err(ApiError::invalid(CONTEXT))?;

    let user = state.with_db(CONTEXT, move |db| db.update_user(patch)).await?;
    Ok(Json(user))
}

pub async fn productivity(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProductivityReport>, ApiError> {
    const CONTEXT: &str = "Error generating analytics";
    let (tasks, wellness) = state
        .with_db(CONTEXT, |db| {
            Ok((db.get_all_tasks(None)?, db.get_wellness(ANALYTICS_WELLNESS_WINDOW)?))
        })
        .await?;
    Ok(Json(insights::productivity_report(&tasks, &wellness)))
}
