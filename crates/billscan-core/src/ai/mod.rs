//! Pluggable AI vision backend abstraction
//!
//! This module isolates provider wire-format differences from the coercion
//! core. Each backend turns a canonical request (image bytes + the shared
//! extraction instruction) into its provider's format and returns the raw,
//! untrusted JSON value the provider produced. Nothing here interprets that
//! value; `crate::coerce` is the single trust boundary.
//!
//! # Architecture
//!
//! - `AiBackend` trait: the capability interface (`analyze_bill`)
//! - `AiClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OllamaBackend`,
//!   `OpenAiBackend`, `MockBackend`
//!
//! No retries happen at this layer; a single failed attempt is reported
//! upward immediately. Retry policy, if any, belongs to the caller.

mod gemini;
mod mock;
mod ollama;
mod openai;

pub use gemini::GeminiBackend;
pub use mock::{sample_raw_response, MockBackend};
pub use ollama::{list_multimodal_models, test_connection, OllamaBackend};
pub use openai::OpenAiBackend;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::coerce::coerce_bill_data;
use crate::error::{Error, Result};
use crate::image::BillImage;
use crate::models::{AiProvider, AiSettings, BillData};

/// Trait defining the interface for all AI vision backends
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Send a bill image for analysis and return the provider's raw JSON
    /// response, untouched by coercion.
    async fn analyze_bill(&self, image: &BillImage) -> Result<Value>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Which provider this backend talks to (for diagnostics)
    fn provider(&self) -> AiProvider;
}

/// A completed analysis: the canonical bill plus the raw provider response,
/// retained unmodified for diagnostics. User edits apply to `data` only.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub data: BillData,
    pub raw: Value,
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Debug, Clone)]
pub enum AiClient {
    Gemini(GeminiBackend),
    Ollama(OllamaBackend),
    OpenAi(OpenAiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AiClient {
    /// Build a client for the provider selected in `settings`.
    ///
    /// Fails with a configuration error before any network call when the
    /// selected provider's credentials or server details are missing.
    pub fn from_settings(settings: &AiSettings) -> Result<Self> {
        match settings.provider {
            AiProvider::Gemini => {
                if settings.gemini.api_key.trim().is_empty() {
                    return Err(Error::Configuration(
                        "Gemini API key is not set. Add one in settings before analyzing.".into(),
                    ));
                }
                Ok(AiClient::Gemini(GeminiBackend::new(&settings.gemini.api_key)))
            }
            AiProvider::Ollama => {
                if settings.ollama.server_url.trim().is_empty()
                    || settings.ollama.model.trim().is_empty()
                {
                    return Err(Error::Configuration(
                        "Ollama server URL or model is not configured.".into(),
                    ));
                }
                Ok(AiClient::Ollama(OllamaBackend::new(
                    &settings.ollama.server_url,
                    &settings.ollama.model,
                )))
            }
            AiProvider::Openai => {
                if settings.openai.api_key.trim().is_empty() {
                    return Err(Error::Configuration(
                        "OpenAI API key is not set. Add one in settings before analyzing.".into(),
                    ));
                }
                Ok(AiClient::OpenAi(OpenAiBackend::new(&settings.openai.api_key)))
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AiClient::Mock(MockBackend::new())
    }

    /// Full analysis pipeline: provider call, then schema coercion.
    ///
    /// The coercion layer is the only consumer of the raw response; the
    /// original value is carried along in the result for diagnostics.
    pub async fn analyze(&self, image: &BillImage) -> Result<Analysis> {
        debug!(provider = self.provider().name(), "sending bill image for analysis");
        let raw = self.analyze_bill(image).await?;
        debug!(provider = self.provider().name(), "coercing provider response");
        let data = coerce_bill_data(&raw)?;
        Ok(Analysis { data, raw })
    }
}

#[async_trait]
impl AiBackend for AiClient {
    async fn analyze_bill(&self, image: &BillImage) -> Result<Value> {
        match self {
            AiClient::Gemini(b) => b.analyze_bill(image).await,
            AiClient::Ollama(b) => b.analyze_bill(image).await,
            AiClient::OpenAi(b) => b.analyze_bill(image).await,
            AiClient::Mock(b) => b.analyze_bill(image).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AiClient::Gemini(b) => b.health_check().await,
            AiClient::Ollama(b) => b.health_check().await,
            AiClient::OpenAi(b) => b.health_check().await,
            AiClient::Mock(b) => b.health_check().await,
        }
    }

    fn provider(&self) -> AiProvider {
        match self {
            AiClient::Gemini(b) => b.provider(),
            AiClient::Ollama(b) => b.provider(),
            AiClient::OpenAi(b) => b.provider(),
            AiClient::Mock(b) => b.provider(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiSettings, OllamaConfig};

    #[test]
    fn test_factory_rejects_unconfigured_gemini() {
        let settings = AiSettings::default();
        let err = AiClient::from_settings(&settings).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("Gemini"));
    }

    #[test]
    fn test_factory_rejects_ollama_without_model() {
        let settings = AiSettings {
            provider: AiProvider::Ollama,
            ollama: OllamaConfig {
                server_url: "http://localhost:11434".into(),
                model: String::new(),
            },
            ..AiSettings::default()
        };
        let err = AiClient::from_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("Ollama"));
    }

    #[tokio::test]
    async fn test_pipeline_surfaces_coercion_failure() {
        // a schema-shaped but incomplete response must fail at the trust
        // boundary, naming the missing field
        let raw = serde_json::json!({
            "totalCurrentCharges": 10.0,
            "dueDate": "2024-02-01",
            "confidenceScores": {
                "overall": 0.9,
                "accountNumber": 0.9,
                "totalCurrentCharges": 0.9,
                "dueDate": 0.9
            }
        });
        let client = AiClient::Mock(MockBackend::with_response(raw));
        let image = BillImage::from_bytes(vec![0u8; 4]);
        let err = client.analyze(&image).await.unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(err.to_string().contains("accountNumber"));
    }

    #[tokio::test]
    async fn test_mock_analysis_pipeline() {
        let client = AiClient::mock();
        let image = BillImage::from_bytes(vec![0u8; 8]);
        let analysis = client.analyze(&image).await.unwrap();
        assert!(!analysis.data.account_number.is_empty());
        // the raw response is retained unmodified
        assert!(analysis.raw.get("accountNumber").is_some());
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        assert!(AiClient::mock().health_check().await);
    }
}
