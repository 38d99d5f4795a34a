//! REST backend.
//!
//! Handlers are stateless apart from the shared [`AppState`]; every request
//! locks the database for the duration of one operation.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::database::{Database, DatabaseError};

mod calendar;
mod chat;
pub mod error;
mod notes;
mod profile;
mod tasks;
mod wellness;

pub use error::ApiError;

pub const DEFAULT_CHAT_LIMIT: usize = 20;
pub const DEFAULT_WELLNESS_LIMIT: usize = 7;

pub struct AppState {
    pub db: Database,
    rng: Mutex<StdRng>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self::with_rng(db, StdRng::from_os_rng())
    }

    /// Fixed random source, so canned replies and suggestions are repeatable
    pub fn with_rng(db: Database, rng: StdRng) -> Self {
        Self {
            db,
            rng: Mutex::new(rng),
        }
    }

    /// Run one database call on the blocking pool so rusqlite never stalls
    /// the async workers
    pub async fn with_db<T, F>(self: &Arc<Self>, context: &'static str, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, DatabaseError> + Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || f(&state.db))
            .await
            .map_err(|e| ApiError::Internal {
                context,
                detail: e.to_string(),
            })?
            .map_err(ApiError::storage(context))
    }

    fn with_rng_mut<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> Result<T, ApiError> {
        let mut rng = self.rng.lock().map_err(|_| ApiError::Internal {
            context: "Random source unavailable",
            detail: "rng lock poisoned".to_string(),
        })?;
        Ok(f(&mut *rng))
    }
}

/// `?limit=N` query; anything unusable falls back to the route default
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

impl LimitQuery {
    pub fn or(&self, default: usize) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(default)
    }
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/api/tasks/prioritize", post(tasks::prioritize_tasks))
        .route(
            "/api/tasks/:id",
            patch(tasks::update_task).delete(tasks::delete_task),
        )
        .route("/api/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/api/notes/:id",
            patch(notes::update_note).delete(notes::delete_note),
        )
        .route("/api/notes/:id/summarize", post(notes::summarize_note))
        .route(
            "/api/chat/messages",
            get(chat::list_messages).post(chat::send_message),
        )
        .route(
            "/api/calendar/events",
            get(calendar::list_events).post(calendar::create_event),
        )
        .route(
            "/api/calendar/events/:id",
            patch(calendar::update_event).delete(calendar::delete_event),
        )
        .route(
            "/api/wellness",
            get(wellness::list_entries).post(wellness::create_entry),
        )
        .route("/api/analytics/productivity", get(profile::productivity))
        .route("/api/user", get(profile::get_user).patch(profile::update_user))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "LifeOS API listening");
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(raw: Option<&str>) -> usize {
        LimitQuery {
            limit: raw.map(str::to_string),
        }
        .or(DEFAULT_CHAT_LIMIT)
    }

    #[test]
    fn unusable_limits_use_the_default() {
        assert_eq!(limit(None), 20);
        assert_eq!(limit(Some("abc")), 20);
        assert_eq!(limit(Some("0")), 20);
        assert_eq!(limit(Some("-3")), 20);
        assert_eq!(limit(Some("5")), 5);
    }
}
