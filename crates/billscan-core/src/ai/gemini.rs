//! Gemini backend implementation
//!
//! Uses the generative language REST API with schema-constrained structured
//! generation: the response schema rides in `generationConfig`, so the model
//! returns raw JSON matching the target shape with no prose or fencing.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::image::BillImage;
use crate::models::AiProvider;
use crate::prompts::{response_schema, SYSTEM_PROMPT, USER_PROMPT};

use super::AiBackend;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Point at a different endpoint (used by tests against a mock server)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl AiBackend for GeminiBackend {
    async fn analyze_bill(&self, image: &BillImage) -> Result<Value> {
        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_PROMPT }]
            },
            "contents": [{
                "parts": [
                    { "text": USER_PROMPT },
                    {
                        "inlineData": {
                            "mimeType": image.mime.as_str(),
                            "data": image.base64(),
                        }
                    }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!(model = %self.model, "Gemini request");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "Gemini request failed ({status}): {detail}"
            )));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| Error::Format(format!("Gemini response was not valid JSON: {e}")))?;

        let text = envelope
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                Error::EmptyResponse("Gemini returned no content for the image.".into())
            })?;

        serde_json::from_str(text).map_err(|e| {
            Error::Format(format!("Gemini returned an invalid JSON document: {e}"))
        })
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/v1beta/models", self.base_url);
        match self
            .http_client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn provider(&self) -> AiProvider {
        AiProvider::Gemini
    }
}
