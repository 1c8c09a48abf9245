//! Ollama backend implementation
//!
//! HTTP client for a local Ollama server. The image rides in the `images`
//! array of a `/api/generate` request and `format: "json"` puts the model in
//! JSON mode; the schema expectations are carried in the prompt text since
//! Ollama has no structured-output contract.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::image::BillImage;
use crate::models::AiProvider;
use crate::prompts::{schema_instruction, SYSTEM_PROMPT, USER_PROMPT};

use super::AiBackend;

#[derive(Debug, Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

/// Request to the Ollama generate API with an image attached
#[derive(Debug, Serialize)]
struct OllamaVisionRequest {
    model: String,
    system: String,
    prompt: String,
    images: Vec<String>,
    format: String,
    stream: bool,
}

/// Response from the Ollama generate API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl AiBackend for OllamaBackend {
    async fn analyze_bill(&self, image: &BillImage) -> Result<Value> {
        let request = OllamaVisionRequest {
            model: self.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            prompt: format!("{}\n\n{}", USER_PROMPT, schema_instruction()),
            images: vec![image.base64()],
            format: "json".to_string(),
            stream: false,
        };

        debug!(model = %self.model, url = %self.base_url, "Ollama request");

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                Error::Transport(format!(
                    "Ollama request to {} failed: {e}. Is the server running?",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "Ollama request failed ({status}): {detail}"
            )));
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| Error::Format(format!("Ollama response was not valid JSON: {e}")))?;

        if ollama_response.response.trim().is_empty() {
            return Err(Error::EmptyResponse(
                "Ollama returned no content for the image; ensure a multimodal model is selected."
                    .into(),
            ));
        }

        serde_json::from_str(&ollama_response.response).map_err(|e| {
            Error::Format(format!(
                "Ollama returned an invalid JSON document: {e}. \
                 Ensure a multimodal model is selected."
            ))
        })
    }

    async fn health_check(&self) -> bool {
        test_connection(&self.http_client, &self.base_url).await
    }

    fn provider(&self) -> AiProvider {
        AiProvider::Ollama
    }
}

/// Model listing from the Ollama tags API
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
    #[serde(default)]
    details: ModelDetails,
}

#[derive(Debug, Default, Deserialize)]
struct ModelDetails {
    #[serde(default)]
    family: String,
    #[serde(default)]
    families: Option<Vec<String>>,
}

/// Check whether an Ollama server is reachable at `url`.
pub async fn test_connection(client: &Client, url: &str) -> bool {
    let url = format!("{}/api/tags", url.trim_end_matches('/'));
    match client.get(&url).send().await {
        Ok(resp) => resp.status().is_success(),
        Err(_) => false,
    }
}

/// List installed models that look multimodal.
///
/// Heuristics: a CLIP family marker, or a name like llava/moondream. Same
/// filter the settings UI uses to populate its model picker.
pub async fn list_multimodal_models(client: &Client, url: &str) -> Result<Vec<String>> {
    let url = format!("{}/api/tags", url.trim_end_matches('/'));
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::Transport(format!("Ollama request to {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Transport(format!(
            "Ollama model listing failed ({status})"
        )));
    }

    let tags: TagsResponse = response
        .json()
        .await
        .map_err(|e| Error::Format(format!("Ollama tags response was not valid JSON: {e}")))?;

    Ok(tags
        .models
        .into_iter()
        .filter(|m| {
            let family = m.details.family.to_lowercase();
            let families: Vec<String> = m
                .details
                .families
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|f| f.to_lowercase())
                .collect();
            family.contains("clip")
                || families.iter().any(|f| f == "clip")
                || m.name.contains("llava")
                || m.name.contains("moondream")
        })
        .map(|m| m.name)
        .collect())
}
