//! Route table

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/upload_pdf", post(handlers::pdf::upload_pdf))
        .route("/ask_pdf", post(handlers::pdf::ask_pdf))
        .route("/load_article", post(handlers::article::load_article))
        .route("/ask_article", post(handlers::article::ask_article))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::health::metrics))
}
