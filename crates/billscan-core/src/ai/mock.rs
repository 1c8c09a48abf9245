//! Mock backend for testing
//!
//! Returns a canned raw response without any network traffic, so the
//! analysis pipeline (provider call, coercion, history append) can be
//! exercised in tests and local development.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;
use crate::image::BillImage;
use crate::models::AiProvider;

use super::AiBackend;

#[derive(Debug, Clone)]
pub struct MockBackend {
    response: Value,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            response: sample_raw_response(),
        }
    }

    /// Use a specific canned response (e.g. malformed JSON shapes in tests)
    pub fn with_response(response: Value) -> Self {
        Self { response }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiBackend for MockBackend {
    async fn analyze_bill(&self, _image: &BillImage) -> Result<Value> {
        Ok(self.response.clone())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn provider(&self) -> AiProvider {
        // Mock stands in for whichever provider a test configures; Gemini is
        // an arbitrary but stable answer for diagnostics.
        AiProvider::Gemini
    }
}

/// A plausible raw provider response for a small electric bill
pub fn sample_raw_response() -> Value {
    json!({
        "accountName": "Jane Doe",
        "accountNumber": "1234-5678-90",
        "serviceAddress": "42 Main St, Springfield",
        "statementDate": "2024-01-15",
        "servicePeriodStart": "2023-12-12",
        "servicePeriodEnd": "2024-01-12",
        "totalCurrentCharges": 123.45,
        "dueDate": "2024-02-01",
        "confidenceScores": {
            "overall": 0.92,
            "accountName": 0.88,
            "accountNumber": 0.95,
            "serviceAddress": 0.81,
            "statementDate": 0.9,
            "totalCurrentCharges": 0.97,
            "dueDate": 0.93
        },
        "usageCharts": [
            {
                "title": "Electricity Usage",
                "unit": "kWh",
                "data": [
                    {
                        "month": "Nov",
                        "usage": [
                            {"year": "2022", "value": 380.0, "confidence": 0.7},
                            {"year": "2023", "value": 402.0, "confidence": 0.85}
                        ]
                    },
                    {
                        "month": "Dec",
                        "usage": [
                            {"year": "2022", "value": 415.0, "confidence": 0.72},
                            {"year": "2023", "value": 441.0}
                        ]
                    }
                ]
            }
        ],
        "lineItems": [
            {"description": "Electric service", "amount": 110.20},
            {"description": "Delivery charge", "amount": 18.25},
            {"description": "State energy credit", "amount": -5.00}
        ]
    })
}
