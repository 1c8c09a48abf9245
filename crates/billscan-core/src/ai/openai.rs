//! OpenAI backend implementation
//!
//! Uses the chat completions API with `response_format: json_object` and the
//! image delivered as a data-URI `image_url` part. JSON mode keeps the model
//! from fencing its output, but the content still arrives as a string to be
//! parsed manually.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::image::BillImage;
use crate::models::AiProvider;
use crate::prompts::{schema_instruction, SYSTEM_PROMPT, USER_PROMPT};

use super::AiBackend;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
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
impl AiBackend for OpenAiBackend {
    async fn analyze_bill(&self, image: &BillImage) -> Result<Value> {
        let body = json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                {
                    "role": "system",
                    "content": format!("{}\n\n{}", SYSTEM_PROMPT, schema_instruction()),
                },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": USER_PROMPT },
                        { "type": "image_url", "image_url": { "url": image.to_data_uri() } }
                    ]
                }
            ]
        });

        debug!(model = %self.model, "OpenAI request");

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail: Value = response.json().await.unwrap_or_default();
            let message = detail
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string());
            return Err(Error::Transport(format!(
                "OpenAI request failed: {message}"
            )));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| Error::Format(format!("OpenAI response was not valid JSON: {e}")))?;

        let content = envelope
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                Error::EmptyResponse("OpenAI returned no content for the image.".into())
            })?;

        serde_json::from_str(content).map_err(|e| {
            Error::Format(format!("OpenAI returned an invalid JSON document: {e}"))
        })
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/v1/models", self.base_url);
        match self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn provider(&self) -> AiProvider {
        AiProvider::Openai
    }
}
