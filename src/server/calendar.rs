use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveTime, Utc};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::database::TimeRange;
use crate::models::{Acknowledgement, CalendarEvent, EventDraft, EventPatch};
use crate::utils::parse_date;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Accepts RFC 3339 or a bare date. A bare end date covers the whole day.
fn parse_bound(raw: &str, is_end: bool) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = parse_date(raw).ok()?;
    let time = if is_end {
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)?
    } else {
        NaiveTime::MIN
    };
    Some(date.and_time(time).and_utc())
}

impl EventsQuery {
    /// The filter only applies when both ends are given
    pub fn range(&self) -> Result<Option<TimeRange>, String> {
        let (Some(start), Some(end)) = (self.start_date.as_deref(), self.end_date.as_deref()) else {
            return Ok(None);
        };
        let start = parse_bound(start, false).ok_or_else(|| format!("invalid startDate '{}'", start))?;
        let end = parse_bound(end, true).ok_or_else(|| format!("invalid endDate '{}'", end))?;
        Ok(Some(TimeRange { start, end }))
    }
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
    const CONTEXT: &str = "Error fetching events";
    let range = query
        .range()
        .map_err(|detail| ApiError::BadRequest { context: CONTEXT, detail })?;
    let events = state.with_db(CONTEXT, move |db| db.get_events(range)).await?;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EventDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<CalendarEvent>), ApiError> {
    const CONTEXT: &str = "Error creating event";
    let Json(draft) = payload.map_err(ApiError::rejected(CONTEXT))?;
    draft.validate().map_err(ApiError::invalid(CONTEXT))?;

    let event = state.with_db(CONTEXT, move |db| db.create_event(draft)).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<EventPatch>, JsonRejection>,
) -> Result<Json<CalendarEvent>, ApiError> {
    const CONTEXT: &str = "Error updating event";
    let Json(patch) = payload.map_err(ApiError::rejected(CONTEXT))?;
    patch.validate().map_err(ApiError::invalid(CONTEXT))?;

    let event = state
        .with_db(CONTEXT, move |db| db.update_event(&id, patch))
        .await?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Acknowledgement>, ApiError> {
    state
        .with_db("Error deleting event", move |db| db.delete_event(&id))
        .await?;
    Ok(Json(Acknowledgement {
        message: "Event deleted successfully".to_string(),
    }))
}
