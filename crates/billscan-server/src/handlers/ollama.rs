//! Ollama discovery handlers
//!
//! The settings UI probes an Ollama server through these endpoints instead
//! of calling it directly, avoiding browser CORS restrictions.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct OllamaProbeRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct OllamaTestResponse {
    pub success: bool,
}

/// POST /api/ollama/test - Check whether an Ollama server is reachable
pub async fn ollama_test(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<OllamaProbeRequest>,
) -> Json<OllamaTestResponse> {
    let client = reqwest::Client::new();
    let success = billscan_core::ai::test_connection(&client, &request.url).await;
    Json(OllamaTestResponse { success })
}

#[derive(Debug, Serialize)]
pub struct OllamaTagsResponse {
    pub models: Vec<String>,
}

/// POST /api/ollama/tags - List models that look multimodal
pub async fn ollama_tags(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<OllamaProbeRequest>,
) -> Result<Json<OllamaTagsResponse>, AppError> {
    let client = reqwest::Client::new();
    let models = billscan_core::ai::list_multimodal_models(&client, &request.url).await?;
    Ok(Json(OllamaTagsResponse { models }))
}
