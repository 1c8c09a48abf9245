//! Test utilities for billscan-core
//!
//! Provides a mock AI provider server speaking just enough of the Gemini,
//! Ollama, and OpenAI wire formats for integration tests: backends built
//! with `with_base_url`/`OllamaBackend::new` against [`MockProviderServer`]
//! exercise the full request/parse path without network access.

use axum::{
    extract::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::ai::sample_raw_response;

/// Mock AI provider server for testing and development
pub struct MockProviderServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockProviderServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .route("/v1beta/models/:call", post(handle_generate_content));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockProviderServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ollama tags endpoint: one multimodal model, one text-only model
async fn handle_tags() -> Json<serde_json::Value> {
    Json(json!({
        "models": [
            {
                "name": "llava:latest",
                "details": { "family": "llama", "families": ["llama", "clip"] }
            },
            {
                "name": "llama3.2:latest",
                "details": { "family": "llama", "families": ["llama"] }
            }
        ]
    }))
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    #[serde(default)]
    #[allow(dead_code)]
    prompt: String,
    #[serde(default)]
    images: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}

/// Ollama generate endpoint: returns the sample bill when an image rides
/// along, an empty response otherwise (mimicking a text-only model)
async fn handle_generate(Json(request): Json<GenerateRequest>) -> Json<GenerateResponse> {
    let response = if request.images.is_empty() {
        String::new()
    } else {
        sample_raw_response().to_string()
    };

    Json(GenerateResponse {
        model: request.model,
        response,
        done: true,
    })
}

/// OpenAI chat completions endpoint
async fn handle_chat_completions(
    Json(_request): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    Json(json!({
        "choices": [
            {
                "message": {
                    "role": "assistant",
                    "content": sample_raw_response().to_string()
                }
            }
        ]
    }))
}

/// Gemini generateContent endpoint
async fn handle_generate_content(
    Json(_request): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    Json(json!({
        "candidates": [
            {
                "content": {
                    "parts": [
                        { "text": sample_raw_response().to_string() }
                    ]
                }
            }
        ]
    }))
}
