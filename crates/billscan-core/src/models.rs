//! Canonical data model for analyzed utility bills
//!
//! `BillData` is the single normalized representation of an analyzed bill,
//! independent of which AI provider produced it. All provider responses pass
//! through the coercion layer (`crate::coerce`) before becoming one of these.
//!
//! Field names serialize as camelCase to match the JSON shape requested from
//! the providers, so a canonical `BillData` round-trips through the coercion
//! layer unchanged.

use serde::{Deserialize, Serialize};

/// Which AI vision backend to use for analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Gemini,
    Ollama,
    Openai,
}

impl AiProvider {
    /// Display name used in diagnostics and error messages
    pub fn name(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "Gemini",
            AiProvider::Ollama => "Ollama",
            AiProvider::Openai => "OpenAI",
        }
    }
}

impl std::str::FromStr for AiProvider {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(AiProvider::Gemini),
            "ollama" => Ok(AiProvider::Ollama),
            "openai" => Ok(AiProvider::Openai),
            other => Err(crate::error::Error::InvalidData(format!(
                "Unknown AI provider: {other} (expected gemini, ollama, or openai)"
            ))),
        }
    }
}

/// Gemini provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OllamaConfig {
    #[serde(default)]
    pub server_url: String,
    #[serde(default)]
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:11434".to_string(),
            model: String::new(),
        }
    }
}

/// OpenAI provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
}

/// User-facing AI configuration: provider selection plus one config
/// sub-object per provider and a verbosity flag.
///
/// Threaded explicitly into every analysis call; persistence happens at
/// process boundaries only (see `crate::settings`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub provider: AiProvider,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub verbose_logging: bool,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: AiProvider::Gemini,
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
            openai: OpenAiConfig::default(),
            verbose_logging: false,
        }
    }
}

/// Per-field confidence scores reported by the AI, each in [0.0, 1.0].
///
/// `overall`, `account_number`, `total_current_charges`, and `due_date` are
/// mandatory; for the rest, absence means "no confidence signal available",
/// which is distinct from zero confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceScores {
    pub overall: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<f64>,
    pub account_number: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_address: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_date: Option<f64>,
    pub total_current_charges: f64,
    pub due_date: f64,
}

/// A single usage value within a data point: one bar in a grouped bar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageChartDataPointValue {
    pub year: String,
    pub value: f64,
    pub confidence: f64,
}

/// One month on a usage chart, holding one value per year series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageChartDataPoint {
    pub month: String,
    pub usage: Vec<UsageChartDataPointValue>,
}

/// A usage chart extracted from the bill (e.g. monthly kWh history)
///
/// Data points within one chart should reference a consistent set of year
/// labels, but providers emit sparse output often enough that consumers must
/// handle missing years per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageChart {
    pub title: String,
    pub unit: String,
    pub data: Vec<UsageChartDataPoint>,
}

/// A charge or credit on the bill. Amounts are signed; credits arrive
/// negative or however the provider represents them (no sign invariant here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub amount: f64,
}

/// Canonical, provider-agnostic representation of an analyzed bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_period_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_period_end: Option<String>,
    pub total_current_charges: f64,
    pub due_date: String,
    pub confidence_scores: ConfidenceScores,
    #[serde(default)]
    pub usage_charts: Vec<UsageChart>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

/// One completed analysis in the history store
///
/// Created when an analysis completes successfully; immutable afterwards
/// except for wholesale deletion when the history is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    /// Human-readable local timestamp for display
    pub timestamp: String,
    /// Machine-sortable RFC 3339 timestamp
    pub raw_timestamp: String,
    pub data: BillData,
    /// Path to the stored source image, relative to the server root
    /// (e.g. "/uploads/abc123.png")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("gemini".parse::<AiProvider>().unwrap(), AiProvider::Gemini);
        assert_eq!("OpenAI".parse::<AiProvider>().unwrap(), AiProvider::Openai);
        assert!("claude".parse::<AiProvider>().is_err());
    }

    #[test]
    fn test_settings_wire_shape() {
        let settings = AiSettings::default();
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["provider"], "gemini");
        assert_eq!(json["ollama"]["serverUrl"], "http://localhost:11434");
        assert_eq!(json["verboseLogging"], false);
    }

    #[test]
    fn test_bill_data_omits_absent_optionals() {
        let bill = BillData {
            account_name: None,
            account_number: "123".into(),
            service_address: None,
            statement_date: None,
            service_period_start: None,
            service_period_end: None,
            total_current_charges: 10.0,
            due_date: "2024-02-01".into(),
            confidence_scores: ConfidenceScores {
                overall: 0.9,
                account_name: None,
                account_number: 0.9,
                service_address: None,
                statement_date: None,
                total_current_charges: 0.9,
                due_date: 0.9,
            },
            usage_charts: vec![],
            line_items: vec![],
        };
        let json = serde_json::to_value(&bill).unwrap();
        assert!(json.get("accountName").is_none());
        assert_eq!(json["accountNumber"], "123");
        assert!(json["confidenceScores"].get("serviceAddress").is_none());
    }
}
