/*
 * Responsibility
 * - GET /messages (read:messages), POST /messages (write:messages)
 * - Permission checks happen in middleware::auth::permission, not here
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::messages::{CreateMessageRequest, MessageResponse},
        extractors::UserClaims,
    },
    error::AppError,
    state::AppState,
};

pub async fn list_messages(State(state): State<AppState>) -> Json<Vec<MessageResponse>> {
    Json(state.messages.read().await.clone())
}

pub async fn create_message(
    State(state): State<AppState>,
    UserClaims(claims): UserClaims,
    Json(req): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_MESSAGE", msg))?;

    let mut messages = state.messages.write().await;
    let message = MessageResponse {
        id: messages.len() + 1,
        text: req.text.trim().to_string(),
        author: claims.subject().map(str::to_string),
        created_at: chrono::Utc::now(),
    };
    messages.push(message.clone());

    tracing::info!(id = message.id, author = ?message.author, "message created");
    Ok((StatusCode::CREATED, Json(message)))
}
