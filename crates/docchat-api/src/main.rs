//! DocChat API Server
//!
//! HTTP server for document-grounded chat over PDFs and web articles.

use docchat_api::{create_router, state::AppState};
use docchat_core::config::AppConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env().unwrap_or_default();

    // Initialize tracing; RUST_LOG wins, then the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    if config.logging.json_format {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = Arc::new(AppState::from_config(config)?);

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("DocChat API Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
