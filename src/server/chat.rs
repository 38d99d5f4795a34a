use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;

use super::{ApiError, AppState, DEFAULT_CHAT_LIMIT, LimitQuery};
use crate::assistant;
use crate::models::{ChatDraft, ChatExchange, ChatMessage, ChatRequest, Role};

pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let limit = query.or(DEFAULT_CHAT_LIMIT);
    let messages = state
        .with_db("Error fetching messages", move |db| db.get_chat_messages(limit))
        .await?;
    Ok(Json(messages))
}

/// Store the user's message, then exactly one canned assistant reply
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatExchange>, ApiError> {
    const CONTEXT: &str = "Error processing chat message";
    let Json(request) = payload.map_err(ApiError::rejected(CONTEXT))?;
    request.validate().map_err(ApiError::invalid(CONTEXT))?;

    let (user, user_message) = state
        .with_db(CONTEXT, move |db| {
            let user = db.get_or_create_user()?;
            let message = db.insert_chat_message(ChatDraft {
                role: Role::User,
                content: request.content,
            })?;
            Ok((user, message))
        })
        .await?;

    let reply = state.with_rng_mut(|rng| assistant::reply_to(&user_message.content, &user.name, rng))?;
    let ai_message = state
        .with_db(CONTEXT, move |db| {
            db.insert_chat_message(ChatDraft {
                role: Role::Assistant,
                content: reply,
            })
        })
        .await?;

    Ok(Json(ChatExchange {
        user_message,
        ai_message,
    }))
}
