//! HTTP API for document-grounded chat
//!
//! Exposes streamed chat, PDF upload and question answering, and
//! article loading and question answering over a shared retrieval flow.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::chat::chat,
        handlers::pdf::upload_pdf,
        handlers::pdf::ask_pdf,
        handlers::article::load_article,
        handlers::article::ask_article,
        handlers::health::health_check,
        handlers::health::metrics,
    ),
    components(schemas(
        handlers::chat::ChatRequest,
        handlers::pdf::UploadResponse,
        handlers::pdf::AskRequest,
        handlers::pdf::AnswerResponse,
        handlers::article::LoadArticleRequest,
        handlers::article::LoadArticleResponse,
        handlers::article::AskArticleRequest,
        handlers::health::HealthResponse,
        handlers::health::MetricsResponse,
        error::ErrorBody,
    )),
    tags(
        (name = "chat", description = "Streamed chat completions"),
        (name = "pdf", description = "PDF upload and question answering"),
        (name = "article", description = "Article loading and question answering"),
        (name = "health", description = "Health and metrics")
    ),
    info(
        title = "DocChat API",
        description = "Document-grounded chat over PDFs and web articles"
    )
)]
pub struct ApiDoc;

/// Browser origin allowed to call the API with credentials.
///
/// Credentialed CORS cannot use a wildcard origin, so methods and
/// headers mirror the request instead.
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!(origin, "invalid CORS origin, browser requests will be refused");
            layer
        }
    }
}

/// Assemble the full application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);
    let body_limit = state.config.server.max_body_size;

    Router::new()
        .merge(routes::api_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
