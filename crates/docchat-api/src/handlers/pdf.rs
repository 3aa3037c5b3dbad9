//! PDF upload and question answering

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;
use docchat_core::DocChatError;
use docchat_index::VectorIndex;
use docchat_ingest::split_fixed;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AskRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerResponse {
    pub answer: String,
}

/// Upload a PDF and index its text
#[utoipa::path(
    post,
    path = "/upload_pdf",
    responses(
        (status = 200, description = "PDF indexed", body = UploadResponse),
        (status = 400, description = "No file in upload", body = ErrorBody),
        (status = 500, description = "Extraction or embedding failed", body = ErrorBody)
    ),
    tag = "pdf"
)]
pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    state.increment_requests();

    let mut file_bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;
            file_bytes = Some(bytes);
            break;
        }
    }

    let bytes = file_bytes
        .ok_or_else(|| AppError::BadRequest("no file field in upload".to_string()))?;
    tracing::info!(size = bytes.len(), "received PDF upload");

    let text = state
        .extractor
        .extract(&bytes)
        .map_err(DocChatError::from)?;
    let chunks = split_fixed(&text, &state.splitter_config());
    if chunks.is_empty() {
        return Err(AppError::BadRequest(
            "document contained no extractable text".to_string(),
        ));
    }

    let chunk_count = chunks.len();
    let index = VectorIndex::build(chunks, state.engine.embedder().as_ref()).await?;
    state.pdf_index.replace(index).await;
    tracing::info!(chunks = chunk_count, "PDF indexed");

    Ok(Json(UploadResponse {
        status: "uploaded".to_string(),
    }))
}

/// Answer a question against the uploaded PDF
#[utoipa::path(
    post,
    path = "/ask_pdf",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Grounded answer", body = AnswerResponse),
        (status = 400, description = "No PDF uploaded yet", body = ErrorBody),
        (status = 500, description = "Retrieval or completion failed", body = ErrorBody)
    ),
    tag = "pdf"
)]
pub async fn ask_pdf(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    state.increment_requests();

    let index = state
        .pdf_index
        .snapshot()
        .await
        .ok_or_else(|| AppError::BadRequest("no PDF has been uploaded yet".to_string()))?;

    let answer = state.engine.answer_pdf(&index, &request.query).await?;
    Ok(Json(AnswerResponse { answer }))
}
