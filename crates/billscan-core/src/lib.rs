//! Billscan Core Library
//!
//! Shared functionality for the billscan utility bill analyzer:
//! - Canonical bill data model, provider-agnostic
//! - Pluggable AI vision backends (Gemini, Ollama, OpenAI)
//! - Schema coercion: the trust boundary for untrusted provider JSON
//! - Confidence score semantics and the review threshold
//! - Reconciliation of user edits into analyzed data
//! - CSV export projection
//! - History store (flat JSON file + stored images)
//! - Settings persistence
//!
//! The core operations (coercion, edit merge, export) are synchronous and
//! pure; the only async boundary is the provider network call, which the
//! caller awaits. There is no shared mutable state inside the core.

pub mod ai;
pub mod coerce;
pub mod confidence;
pub mod edit;
pub mod error;
pub mod export;
pub mod history;
pub mod image;
pub mod models;
pub mod prompts;
pub mod settings;

/// Test utilities including the mock AI provider server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AiBackend, AiClient, Analysis, GeminiBackend, MockBackend, OllamaBackend, OpenAiBackend};
pub use coerce::coerce_bill_data;
pub use confidence::{needs_review, FULL_CONFIDENCE, REVIEW_THRESHOLD};
pub use edit::{apply_month_edit, apply_scalar_edit, apply_usage_edit, ScalarField};
pub use error::{Error, Result};
pub use export::{bill_to_csv, save_csv, suggested_csv_filename};
pub use history::{HistoryStore, MAX_RECORDS};
pub use image::{BillImage, ImageMime};
pub use models::{
    AiProvider, AiSettings, AnalysisRecord, BillData, ConfidenceScores, LineItem, UsageChart,
    UsageChartDataPoint, UsageChartDataPointValue,
};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::test_utils::MockProviderServer;

    #[tokio::test]
    async fn test_ollama_backend_against_mock_server() {
        let server = MockProviderServer::start().await;
        let backend = OllamaBackend::new(&server.url(), "llava");

        assert!(backend.health_check().await);

        let image = BillImage::from_bytes(vec![0x89, b'P', b'N', b'G']);
        let raw = backend.analyze_bill(&image).await.unwrap();
        let bill = coerce_bill_data(&raw).unwrap();
        assert_eq!(bill.account_number, "1234-5678-90");
    }

    #[tokio::test]
    async fn test_openai_backend_against_mock_server() {
        let server = MockProviderServer::start().await;
        let backend = OpenAiBackend::new("test-key").with_base_url(&server.url());

        let image = BillImage::from_bytes(vec![0xFF, 0xD8, 0xFF]);
        let raw = backend.analyze_bill(&image).await.unwrap();
        assert_eq!(raw["dueDate"], "2024-02-01");
    }

    #[tokio::test]
    async fn test_gemini_backend_against_mock_server() {
        let server = MockProviderServer::start().await;
        let backend = GeminiBackend::new("test-key").with_base_url(&server.url());

        let image = BillImage::from_bytes(vec![0u8; 16]);
        let raw = backend.analyze_bill(&image).await.unwrap();
        let bill = coerce_bill_data(&raw).unwrap();
        assert_eq!(bill.total_current_charges, 123.45);
    }

    #[tokio::test]
    async fn test_multimodal_model_listing_against_mock_server() {
        let server = MockProviderServer::start().await;
        let client = reqwest::Client::new();

        assert!(ai::test_connection(&client, &server.url()).await);
        let models = ai::list_multimodal_models(&client, &server.url())
            .await
            .unwrap();
        assert_eq!(models, vec!["llava:latest".to_string()]);
    }

    #[tokio::test]
    async fn test_analyze_then_edit_then_export() {
        // end to end: analysis, a correction, then the CSV projection
        let client = AiClient::mock();
        let image = BillImage::from_bytes(vec![1, 2, 3]);
        let mut analysis = client.analyze(&image).await.unwrap();

        apply_usage_edit(&mut analysis.data, 0, 0, 0, 999.0).unwrap();
        assert_eq!(analysis.data.usage_charts[0].data[0].usage[0].confidence, 1.0);
        // the raw response still holds the provider's original value
        assert_eq!(analysis.raw["usageCharts"][0]["data"][0]["usage"][0]["value"], 380.0);

        let csv = bill_to_csv(&analysis.data);
        assert!(csv.contains(",Nov,2022,999"));
    }
}
