//! Extraction prompt and response schema shared by all providers
//!
//! Every provider receives the same system instruction; they differ only in
//! how the JSON shape is enforced (Gemini gets a structured response schema,
//! Ollama runs in JSON mode, OpenAI gets `json_object` response format).

use serde_json::{json, Value};

/// System instruction describing the extraction task and output contract
pub const SYSTEM_PROMPT: &str = "You are an expert OCR system specializing in utility bills from ANY provider. Your primary goal is to analyze the provided image, even if it is of low quality or at an angle, and extract the required information with high accuracy.\n\n\
Instructions:\n\
- Analyze the provided utility bill image and extract the information below.\n\
- Format your response strictly as a JSON object that adheres to the provided schema. Do not include any introductory text, explanations, or markdown formatting. Your entire output must be the raw JSON object.\n\
- Data in Charts: Carefully estimate the values from the bar heights relative to the y-axis if exact numbers aren't present.\n\
- Confidence Score: For each field, provide a confidence score between 0.0 (not confident) and 1.0 (very confident) based on the clarity and unambiguity of the information in the image.\n\
- Final Check: Ensure every required field in the schema is present. If an optional field is not found, omit it from the final JSON.";

/// User-turn text accompanying the image for chat-style providers
pub const USER_PROMPT: &str =
    "Analyze this utility bill image and provide the specified JSON output.";

/// The target JSON shape, in the structured-output schema format the Gemini
/// API accepts (`generationConfig.responseSchema`).
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "accountName": { "type": "STRING", "description": "The name of the account holder." },
            "accountNumber": { "type": "STRING", "description": "The unique account identifier." },
            "serviceAddress": { "type": "STRING", "description": "The address where services are rendered." },
            "statementDate": { "type": "STRING", "description": "The date the bill was issued (YYYY-MM-DD)." },
            "servicePeriodStart": { "type": "STRING", "description": "Start date of the service period (YYYY-MM-DD)." },
            "servicePeriodEnd": { "type": "STRING", "description": "End date of the service period (YYYY-MM-DD)." },
            "totalCurrentCharges": { "type": "NUMBER", "description": "The total amount due for the current period." },
            "dueDate": { "type": "STRING", "description": "The date the payment is due (YYYY-MM-DD)." },
            "confidenceScores": {
                "type": "OBJECT",
                "description": "Confidence scores from 0.0 to 1.0 for each extracted field.",
                "properties": {
                    "overall": { "type": "NUMBER" },
                    "accountName": { "type": "NUMBER" },
                    "accountNumber": { "type": "NUMBER" },
                    "serviceAddress": { "type": "NUMBER" },
                    "statementDate": { "type": "NUMBER" },
                    "totalCurrentCharges": { "type": "NUMBER" },
                    "dueDate": { "type": "NUMBER" }
                },
                "required": ["overall", "accountNumber", "totalCurrentCharges", "dueDate"]
            },
            "usageCharts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING", "description": "The title of the usage chart (e.g., 'Electricity Usage')." },
                        "unit": { "type": "STRING", "description": "The unit of measurement (e.g., 'kWh', 'Therms')." },
                        "data": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "month": { "type": "STRING", "description": "The month for the data point (e.g., 'Jan', 'Feb')." },
                                    "usage": {
                                        "type": "ARRAY",
                                        "items": {
                                            "type": "OBJECT",
                                            "properties": {
                                                "year": { "type": "STRING", "description": "The year of the usage, e.g., '2023'." },
                                                "value": { "type": "NUMBER", "description": "The usage value for that year." }
                                            },
                                            "required": ["year", "value"]
                                        }
                                    }
                                },
                                "required": ["month", "usage"]
                            }
                        }
                    },
                    "required": ["title", "unit", "data"]
                }
            },
            "lineItems": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "description": { "type": "STRING", "description": "Description of the charge or credit." },
                        "amount": { "type": "NUMBER", "description": "The amount for the line item." }
                    },
                    "required": ["description", "amount"]
                }
            }
        },
        "required": ["accountNumber", "totalCurrentCharges", "dueDate", "confidenceScores", "usageCharts", "lineItems"]
    })
}

/// Plain-text rendering of the schema expectations, appended to the prompt
/// for providers without structured-output support.
pub fn schema_instruction() -> String {
    format!(
        "The JSON object must follow this schema:\n{}",
        serde_json::to_string_pretty(&response_schema()).unwrap_or_default()
    )
}
