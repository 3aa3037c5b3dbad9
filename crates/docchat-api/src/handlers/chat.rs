//! Streaming chat endpoint

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;
use docchat_rag::prompt;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// User prompt, may be empty
    #[serde(default)]
    pub prompt: String,
}

/// Stream a chat completion as plain text
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Streamed completion text"),
        (status = 500, description = "Completion failed", body = ErrorBody)
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();
    tracing::debug!(prompt_len = request.prompt.len(), "chat request");

    let messages = prompt::chat_messages(&request.prompt);
    let stream = state.engine.llm().complete_stream(&messages).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    ))
}
