//! Article loading and question answering

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::handlers::pdf::AnswerResponse;
use crate::state::AppState;
use docchat_index::VectorIndex;
use docchat_ingest::{extract_url, split_boundary};
use docchat_rag::{plan_article_query, ArticleQueryPlan, DEFAULT_ARTICLE_QUESTION};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoadArticleRequest {
    /// Missing field deserializes as empty and fails URL validation
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoadArticleResponse {
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AskArticleRequest {
    #[serde(default)]
    pub question: String,
}

/// Fetch an article, split it and swap it into the session slot
async fn load_and_index(state: &AppState, url: &str) -> Result<(), AppError> {
    let text = state
        .fetcher
        .fetch(url)
        .await
        .map_err(|e| AppError::BadRequest(format!("could not load the article: {e}")))?;

    let chunks = split_boundary(&text, &state.splitter_config());
    if chunks.is_empty() {
        return Err(AppError::BadRequest(
            "could not load the article: document contained no extractable text".to_string(),
        ));
    }

    let chunk_count = chunks.len();
    let index = VectorIndex::build(chunks, state.engine.embedder().as_ref()).await?;
    state.article_index.replace(index).await;
    tracing::info!(url, chunks = chunk_count, "article indexed");
    Ok(())
}

/// Load an article from a URL and index it
#[utoipa::path(
    post,
    path = "/load_article",
    request_body = LoadArticleRequest,
    responses(
        (status = 200, description = "Article indexed", body = LoadArticleResponse),
        (status = 400, description = "Invalid URL or unreadable article", body = ErrorBody),
        (status = 500, description = "Embedding failed", body = ErrorBody)
    ),
    tag = "article"
)]
pub async fn load_article(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoadArticleRequest>,
) -> Result<Json<LoadArticleResponse>, AppError> {
    state.increment_requests();

    let url = extract_url(&request.url)
        .ok_or_else(|| AppError::BadRequest("no valid URL found in input".to_string()))?;
    load_and_index(&state, url).await?;

    Ok(Json(LoadArticleResponse {
        message: "article loaded and indexed".to_string(),
    }))
}

/// Answer a question against the loaded article
///
/// If no article is loaded and the question itself contains a URL, that
/// article is loaded first and a default summarization question is used.
#[utoipa::path(
    post,
    path = "/ask_article",
    request_body = AskArticleRequest,
    responses(
        (status = 200, description = "Grounded answer", body = AnswerResponse),
        (status = 400, description = "No article loaded and no URL in question", body = ErrorBody),
        (status = 500, description = "Retrieval or completion failed", body = ErrorBody)
    ),
    tag = "article"
)]
pub async fn ask_article(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskArticleRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    state.increment_requests();

    let loaded = state.article_index.is_loaded().await;
    let question = match plan_article_query(loaded, &request.question) {
        ArticleQueryPlan::UseExisting => request.question.clone(),
        ArticleQueryPlan::AutoLoad { url } => {
            tracing::info!(url, "auto-loading article from question");
            load_and_index(&state, url).await?;
            DEFAULT_ARTICLE_QUESTION.to_string()
        }
        ArticleQueryPlan::Reject => {
            return Err(AppError::BadRequest(
                "article not loaded or invalid".to_string(),
            ));
        }
    };

    let index = state
        .article_index
        .snapshot()
        .await
        .ok_or_else(|| AppError::BadRequest("article not loaded or invalid".to_string()))?;

    let answer = state.engine.answer_article(&index, &question).await?;
    Ok(Json(AnswerResponse { answer }))
}
