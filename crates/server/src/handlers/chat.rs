use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use twin_core::ErrorKind;
use twin_knowledge::{ChatReply, INVALID_QUESTION_MESSAGE};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
}

/// Answer a visitor's question. Failures, including unreadable bodies,
/// are reported in the reply.
pub async fn chat_handler(State(state): State<AppState>, body: Bytes) -> Json<ChatReply> {
    let req: ChatRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(err) => {
            tracing::warn!("rejected chat request body: {}", err);
            return Json(ChatReply::Failed {
                kind: ErrorKind::InvalidInput,
                message: INVALID_QUESTION_MESSAGE.to_string(),
            });
        }
    };

    Json(state.twin.reply(&req.question).await)
}
