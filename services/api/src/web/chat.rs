//! services/api/src/web/chat.rs
//!
//! The chat endpoints: post a message, read the history, delete one turn by
//! its timestamp key, or wipe the whole conversation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use moodlog_core::domain::{ChatRole, ChatTurn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::chat::ChatError;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatTurnDto {
    pub role: String,
    pub content: String,
    pub posted_at: DateTime<Utc>,
}

impl From<&ChatTurn> for ChatTurnDto {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            role: match turn.role {
                ChatRole::User => "user".to_string(),
                ChatRole::Assistant => "assistant".to_string(),
            },
            content: turn.content.clone(),
            posted_at: turn.posted_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    pub history: Vec<ChatTurnDto>,
}

#[derive(Serialize, ToSchema)]
pub struct ChatHistoryResponse {
    pub turns: Vec<ChatTurnDto>,
    /// Completed user/assistant exchanges.
    pub exchanges: usize,
}

fn map_chat_error(e: ChatError) -> (StatusCode, String) {
    match e {
        ChatError::EmptyMessage | ChatError::MessageTooLong => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        ChatError::InvalidTurnKey(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        ChatError::TurnNotFound => (StatusCode::NOT_FOUND, e.to_string()),
        ChatError::Port(e) => {
            error!("Chat store failure: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Chat is unavailable".to_string(),
            )
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /chat - Send a message and get the coach's reply
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Reply generated", body = ChatResponse),
        (status = 400, description = "Empty or oversized message"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let profile = state.store.get_profile(user_id).await.map_err(|e| {
        error!("Failed to load profile: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load profile".to_string(),
        )
    })?;

    let reply = state
        .chat
        .handle_turn(&profile, &req.message)
        .await
        .map_err(map_chat_error)?;

    Ok(Json(ChatResponse {
        answer: reply.answer,
        extra: reply.extra,
        history: reply.turns.iter().map(ChatTurnDto::from).collect(),
    }))
}

/// GET /chat/history - The stored conversation
#[utoipa::path(
    get,
    path = "/chat/history",
    responses(
        (status = 200, description = "Conversation history", body = ChatHistoryResponse),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn chat_history_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (turns, exchanges) = state.chat.history(user_id).await.map_err(map_chat_error)?;
    Ok(Json(ChatHistoryResponse {
        turns: turns.iter().map(ChatTurnDto::from).collect(),
        exchanges,
    }))
}

/// DELETE /chat/{posted_at} - Remove one turn by its timestamp key
#[utoipa::path(
    delete,
    path = "/chat/{posted_at}",
    responses(
        (status = 200, description = "Turn deleted"),
        (status = 404, description = "No turn with that timestamp"),
        (status = 401, description = "Not authenticated")
    ),
    params(
        ("posted_at" = String, Path, description = "RFC 3339 timestamp of the turn to delete")
    )
)]
pub async fn chat_delete_turn_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(posted_at): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .chat
        .delete_turn(user_id, &posted_at)
        .await
        .map_err(map_chat_error)?;
    Ok(StatusCode::OK)
}

/// DELETE /chat - Clear the conversation
#[utoipa::path(
    delete,
    path = "/chat",
    responses(
        (status = 200, description = "History cleared"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn chat_clear_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .chat
        .clear_history(user_id)
        .await
        .map_err(map_chat_error)?;
    Ok(StatusCode::OK)
}
