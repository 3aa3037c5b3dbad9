//! API Integration Tests
//!
//! All tests run against the full router with mock completion,
//! embedding, extraction, and fetching collaborators, so no network
//! or model access is needed.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use futures::stream::{self, StreamExt};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use docchat_api::{create_router, state::AppState};
use docchat_core::config::AppConfig;
use docchat_core::{ChatMessage, EmbeddingClient, LlmClient};
use docchat_ingest::{ArticleSource, DocumentExtractor, IngestError};

// =============================================================================
// Mock Collaborators
// =============================================================================

/// Records every completion call and returns a fixed answer.
#[derive(Default)]
struct MockLlm {
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockLlm {
    fn last_user_content(&self) -> Option<String> {
        let calls = self.calls.lock().unwrap();
        let messages = calls.last()?;
        messages.last().map(|m| m.content.clone())
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, messages: &[ChatMessage]) -> docchat_core::Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        Ok("mock answer".to_string())
    }

    async fn complete_stream(
        &self,
        messages: &[ChatMessage],
    ) -> docchat_core::Result<futures::stream::BoxStream<'static, docchat_core::Result<String>>>
    {
        self.calls.lock().unwrap().push(messages.to_vec());
        let fragments = vec![Ok("Hello ".to_string()), Ok("world".to_string())];
        Ok(stream::iter(fragments).boxed())
    }
}

/// Deterministic embedder: 26-dimensional letter frequency vectors.
/// Similar texts get similar vectors, which is all retrieval needs.
struct MockEmbedder;

fn letter_frequencies(text: &str) -> Vec<f32> {
    let mut counts = vec![0.0f32; 26];
    for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
        let idx = (c.to_ascii_lowercase() as u8 - b'a') as usize;
        counts[idx] += 1.0;
    }
    counts
}

#[async_trait::async_trait]
impl EmbeddingClient for MockEmbedder {
    async fn embed(&self, text: &str) -> docchat_core::Result<Vec<f32>> {
        Ok(letter_frequencies(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> docchat_core::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| letter_frequencies(t)).collect())
    }

    fn dimension(&self) -> usize {
        26
    }
}

/// Treats the uploaded bytes as UTF-8 text instead of parsing a real PDF.
struct MockExtractor;

impl DocumentExtractor for MockExtractor {
    fn extract(&self, bytes: &[u8]) -> docchat_ingest::Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Serves canned article bodies and records every fetched URL.
#[derive(Default)]
struct MockFetcher {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    fn with_page(url: &str, body: &str) -> Self {
        let mut pages = HashMap::new();
        pages.insert(url.to_string(), body.to_string());
        Self {
            pages,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn fetched_urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ArticleSource for MockFetcher {
    async fn fetch(&self, url: &str) -> docchat_ingest::Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| IngestError::Fetch(format!("no route to {url}")))
    }
}

// =============================================================================
// Test Harness
// =============================================================================

struct TestApp {
    router: axum::Router,
    llm: Arc<MockLlm>,
    fetcher: Arc<MockFetcher>,
}

fn build_app(config: AppConfig, fetcher: MockFetcher) -> TestApp {
    let llm = Arc::new(MockLlm::default());
    let fetcher = Arc::new(fetcher);
    let state = Arc::new(AppState::new(
        config,
        llm.clone(),
        Arc::new(MockEmbedder),
        Arc::new(MockExtractor),
        fetcher.clone(),
    ));

    TestApp {
        router: create_router(state),
        llm,
        fetcher,
    }
}

fn default_app() -> TestApp {
    build_app(AppConfig::default(), MockFetcher::default())
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Build a multipart upload with a single field.
fn multipart_request(uri: &str, field_name: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field_name}\"; filename=\"doc.pdf\"\r\n\
         Content-Type: application/pdf\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Health and Metrics
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = default_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_metrics_reports_empty_slots() {
    let app = default_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pdf_loaded"], false);
    assert_eq!(json["article_loaded"], false);
    assert!(json["total_requests"].is_u64());
}

// =============================================================================
// Chat Streaming
// =============================================================================

#[tokio::test]
async fn test_chat_streams_plain_text() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request("/chat", json!({"prompt": "hello there"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Hello world");
}

#[tokio::test]
async fn test_chat_sends_system_instruction() {
    let app = default_app();

    app.router
        .oneshot(json_request("/chat", json!({"prompt": "explain lifetimes"})))
        .await
        .unwrap();

    let calls = app.llm.calls.lock().unwrap();
    let messages = calls.last().unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].content.contains("smart AI assistant"));
    assert_eq!(messages[1].content, "explain lifetimes");
}

#[tokio::test]
async fn test_chat_accepts_missing_prompt() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request("/chat", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// PDF Upload and Q&A
// =============================================================================

#[tokio::test]
async fn test_upload_pdf_returns_uploaded_status() {
    let app = default_app();

    let response = app
        .router
        .oneshot(multipart_request(
            "/upload_pdf",
            "file",
            "The quick brown fox jumps over the lazy dog.",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "uploaded");
}

#[tokio::test]
async fn test_upload_pdf_without_file_field_is_rejected() {
    let app = default_app();

    let response = app
        .router
        .oneshot(multipart_request("/upload_pdf", "attachment", "some text"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("no file field"));
}

#[tokio::test]
async fn test_ask_pdf_before_upload_is_rejected() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request("/ask_pdf", json!({"query": "what is this?"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("no PDF"));
}

#[tokio::test]
async fn test_ask_pdf_grounds_answer_in_top_chunks() {
    // Small chunks without overlap so the document splits into many
    // distinct pieces and retrieval has real work to do.
    let mut config = AppConfig::default();
    config.rag.chunk_size = 50;
    config.rag.chunk_overlap = 0;
    config.rag.top_k = 3;
    let app = build_app(config, MockFetcher::default());

    // Eight 50-char runs, each a different letter.
    let document: String = ('a'..='h').map(|c| c.to_string().repeat(50)).collect();

    let response = app
        .router
        .clone()
        .oneshot(multipart_request("/upload_pdf", "file", &document))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(json_request("/ask_pdf", json!({"query": "cccc"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["answer"], "mock answer");

    // The grounding prompt carries at most top_k chunks plus the question.
    let prompt = app.llm.last_user_content().unwrap();
    assert!(prompt.contains("Question: cccc"));
    let context = prompt
        .split("\n\n")
        .nth(1)
        .expect("prompt should have a context section");
    assert_eq!(context.lines().count(), 3);
    assert!(context.contains(&"c".repeat(50)));
}

// =============================================================================
// Article Loading and Q&A
// =============================================================================

#[tokio::test]
async fn test_load_article_extracts_url_from_noisy_input() {
    let app = build_app(
        AppConfig::default(),
        MockFetcher::with_page(
            "https://news.example/story",
            "A very informative article about rust programming. It goes on.",
        ),
    );

    let response = app
        .router
        .oneshot(json_request(
            "/load_article",
            json!({"url": "please load https://news.example/story for me"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "article loaded and indexed");
    assert_eq!(
        app.fetcher.fetched_urls(),
        vec!["https://news.example/story".to_string()]
    );
}

#[tokio::test]
async fn test_load_article_without_url_is_rejected() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request(
            "/load_article",
            json!({"url": "not a link at all"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("no valid URL"));
    assert!(app.fetcher.fetched_urls().is_empty());
}

#[tokio::test]
async fn test_load_article_fetch_failure_is_client_error() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request(
            "/load_article",
            json!({"url": "https://unreachable.example/x"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("could not load the article"));
}

#[tokio::test]
async fn test_ask_article_uses_loaded_index() {
    let app = build_app(
        AppConfig::default(),
        MockFetcher::with_page(
            "https://news.example/story",
            "Ferris the crab is the unofficial mascot. Crabs are crustaceans.",
        ),
    );

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "/load_article",
            json!({"url": "https://news.example/story"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(json_request(
            "/ask_article",
            json!({"question": "who is the mascot?"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["answer"], "mock answer");

    let prompt = app.llm.last_user_content().unwrap();
    assert!(prompt.contains("who is the mascot?"));
    assert!(prompt.contains("article content"));

    // The existing index answers the question; no second fetch happens.
    assert_eq!(app.fetcher.fetched_urls().len(), 1);
}

#[tokio::test]
async fn test_ask_article_auto_loads_url_in_question() {
    let app = build_app(
        AppConfig::default(),
        MockFetcher::with_page(
            "https://news.example/fresh",
            "Breaking news about something genuinely important happening.",
        ),
    );

    let response = app
        .router
        .oneshot(json_request(
            "/ask_article",
            json!({"question": "check https://news.example/fresh please"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["answer"], "mock answer");
    assert_eq!(
        app.fetcher.fetched_urls(),
        vec!["https://news.example/fresh".to_string()]
    );

    // Auto-load replaces the question with the default summarization one.
    let prompt = app.llm.last_user_content().unwrap();
    assert!(prompt.contains("Summarize the article's content"));
}

#[tokio::test]
async fn test_ask_article_without_index_or_url_is_rejected() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request(
            "/ask_article",
            json!({"question": "summarize it"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "article not loaded or invalid");
}

#[tokio::test]
async fn test_empty_json_bodies_get_structured_errors() {
    // A body without the expected field must produce the JSON error
    // shape, not the extractor's stock plain-text rejection.
    let app = default_app();

    let response = app
        .router
        .clone()
        .oneshot(json_request("/load_article", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("no valid URL"));

    let response = app
        .router
        .clone()
        .oneshot(json_request("/ask_article", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "article not loaded or invalid");

    let response = app
        .router
        .oneshot(json_request("/ask_pdf", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("no PDF"));
}

#[tokio::test]
async fn test_second_load_replaces_article_index() {
    let mut fetcher = MockFetcher::with_page(
        "https://news.example/first",
        "The first article talks about gardening and tomato plants.",
    );
    fetcher.pages.insert(
        "https://news.example/second".to_string(),
        "The second article covers deep sea exploration and submarines.".to_string(),
    );
    let app = build_app(AppConfig::default(), fetcher);

    for url in ["https://news.example/first", "https://news.example/second"] {
        let response = app
            .router
            .clone()
            .oneshot(json_request("/load_article", json!({"url": url})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .router
        .oneshot(json_request(
            "/ask_article",
            json!({"question": "what is it about?"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Only the replacement index is consulted.
    let prompt = app.llm.last_user_content().unwrap();
    assert!(prompt.contains("deep sea"));
    assert!(!prompt.contains("tomato"));
}
