//! Schema coercion: the single trust boundary for provider output
//!
//! AI providers return schema-shaped but semantically unreliable JSON. All
//! inbound responses are treated as untrusted and run through
//! [`coerce_bill_data`], which validates and repairs the raw value into a
//! canonical [`BillData`] or fails loudly naming the offending field. No
//! other code in this crate assumes anything about provider output shape.
//!
//! Repair rules:
//! - numeric fields arriving as strings are parsed
//! - `usageCharts` / `lineItems` default to empty when absent (a bill may
//!   legitimately have no extractable charts or line items)
//! - a usage value missing its `confidence` gets 1.0; top-level confidence
//!   keys have no such default (absence means "no signal")
//!
//! Coercion is idempotent: a canonical `BillData` re-serialized to JSON and
//! coerced again yields an equal `BillData`.

use serde_json::{Map, Value};

use crate::confidence::{in_range, FULL_CONFIDENCE};
use crate::error::{Error, Result};
use crate::models::{
    BillData, ConfidenceScores, LineItem, UsageChart, UsageChartDataPoint,
    UsageChartDataPointValue,
};

/// Coerce an untrusted raw JSON value into a canonical [`BillData`].
pub fn coerce_bill_data(raw: &Value) -> Result<BillData> {
    let obj = raw
        .as_object()
        .ok_or_else(|| Error::Format("AI response is not a JSON object".into()))?;

    let confidence_scores = coerce_confidence_scores(require(obj, "confidenceScores")?)?;

    Ok(BillData {
        account_name: optional_string(obj, "accountName")?,
        account_number: coerce_string(require(obj, "accountNumber")?, "accountNumber")?,
        service_address: optional_string(obj, "serviceAddress")?,
        statement_date: optional_string(obj, "statementDate")?,
        service_period_start: optional_string(obj, "servicePeriodStart")?,
        service_period_end: optional_string(obj, "servicePeriodEnd")?,
        total_current_charges: coerce_number(
            require(obj, "totalCurrentCharges")?,
            "totalCurrentCharges",
        )?,
        due_date: coerce_string(require(obj, "dueDate")?, "dueDate")?,
        confidence_scores,
        usage_charts: coerce_usage_charts(obj.get("usageCharts"))?,
        line_items: coerce_line_items(obj.get("lineItems"))?,
    })
}

/// Look up a required field; absence (or an explicit null) is a hard failure.
fn require<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Value> {
    match obj.get(field) {
        Some(Value::Null) | None => {
            Err(Error::Format(format!("Missing required field: {field}")))
        }
        Some(v) => Ok(v),
    }
}

/// Coerce a value to a number, accepting numeric strings.
fn coerce_number(value: &Value, field: &str) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            Error::Format(format!("Field {field} is not representable as a number: {n}"))
        }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            Error::Format(format!("Field {field} is not a number: {s:?}"))
        }),
        other => Err(Error::Format(format!(
            "Field {field} has wrong type (expected number, got {})",
            type_name(other)
        ))),
    }
}

/// Coerce a value to a string, accepting bare numbers (account numbers are
/// digits often enough that some models emit them unquoted).
fn coerce_string(value: &Value, field: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::Format(format!(
            "Field {field} has wrong type (expected string, got {})",
            type_name(other)
        ))),
    }
}

/// Optional string field: passed through if present, None otherwise.
/// Never defaulted to an empty string; display defaulting is a UI concern.
fn optional_string(obj: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match obj.get(field) {
        Some(Value::Null) | None => Ok(None),
        Some(v) => coerce_string(v, field).map(Some),
    }
}

/// A confidence score must be a number (or numeric string) in [0.0, 1.0].
fn coerce_confidence(value: &Value, field: &str) -> Result<f64> {
    let score = coerce_number(value, field)?;
    if !in_range(score) {
        return Err(Error::Format(format!(
            "Field {field} is out of range (expected 0.0-1.0, got {score})"
        )));
    }
    Ok(score)
}

fn coerce_confidence_scores(value: &Value) -> Result<ConfidenceScores> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::Format("Field confidenceScores is not an object".into()))?;

    let optional = |field: &str| -> Result<Option<f64>> {
        match obj.get(field) {
            Some(Value::Null) | None => Ok(None),
            Some(v) => coerce_confidence(v, &format!("confidenceScores.{field}")).map(Some),
        }
    };

    Ok(ConfidenceScores {
        overall: coerce_confidence(require(obj, "overall")?, "confidenceScores.overall")?,
        account_name: optional("accountName")?,
        account_number: coerce_confidence(
            require(obj, "accountNumber")?,
            "confidenceScores.accountNumber",
        )?,
        service_address: optional("serviceAddress")?,
        statement_date: optional("statementDate")?,
        total_current_charges: coerce_confidence(
            require(obj, "totalCurrentCharges")?,
            "confidenceScores.totalCurrentCharges",
        )?,
        due_date: coerce_confidence(require(obj, "dueDate")?, "confidenceScores.dueDate")?,
    })
}

fn coerce_usage_charts(value: Option<&Value>) -> Result<Vec<UsageChart>> {
    let items = match value {
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(Error::Format(format!(
                "Field usageCharts has wrong type (expected array, got {})",
                type_name(other)
            )))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, chart)| coerce_usage_chart(chart, i))
        .collect()
}

fn coerce_usage_chart(value: &Value, index: usize) -> Result<UsageChart> {
    let path = format!("usageCharts[{index}]");
    let obj = value
        .as_object()
        .ok_or_else(|| Error::Format(format!("Field {path} is not an object")))?;

    let data = match obj.get("data") {
        Some(Value::Null) | None => Vec::new(),
        Some(Value::Array(points)) => points
            .iter()
            .enumerate()
            .map(|(i, point)| coerce_data_point(point, &format!("{path}.data[{i}]")))
            .collect::<Result<_>>()?,
        Some(other) => {
            return Err(Error::Format(format!(
                "Field {path}.data has wrong type (expected array, got {})",
                type_name(other)
            )))
        }
    };

    Ok(UsageChart {
        title: coerce_string(require(obj, "title")?, &format!("{path}.title"))?,
        unit: coerce_string(require(obj, "unit")?, &format!("{path}.unit"))?,
        data,
    })
}

fn coerce_data_point(value: &Value, path: &str) -> Result<UsageChartDataPoint> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::Format(format!("Field {path} is not an object")))?;

    let usage = match obj.get("usage") {
        Some(Value::Null) | None => Vec::new(),
        Some(Value::Array(values)) => values
            .iter()
            .enumerate()
            .map(|(i, v)| coerce_usage_value(v, &format!("{path}.usage[{i}]")))
            .collect::<Result<_>>()?,
        Some(other) => {
            return Err(Error::Format(format!(
                "Field {path}.usage has wrong type (expected array, got {})",
                type_name(other)
            )))
        }
    };

    Ok(UsageChartDataPoint {
        month: coerce_string(require(obj, "month")?, &format!("{path}.month"))?,
        usage,
    })
}

fn coerce_usage_value(value: &Value, path: &str) -> Result<UsageChartDataPointValue> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::Format(format!("Field {path} is not an object")))?;

    // AI silence on a usage-point confidence defaults to full trust, unlike
    // top-level field confidence which has no default.
    let confidence = match obj.get("confidence") {
        Some(Value::Null) | None => FULL_CONFIDENCE,
        Some(v) => coerce_confidence(v, &format!("{path}.confidence"))?,
    };

    Ok(UsageChartDataPointValue {
        year: coerce_string(require(obj, "year")?, &format!("{path}.year"))?,
        value: coerce_number(require(obj, "value")?, &format!("{path}.value"))?,
        confidence,
    })
}

fn coerce_line_items(value: Option<&Value>) -> Result<Vec<LineItem>> {
    let items = match value {
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(Error::Format(format!(
                "Field lineItems has wrong type (expected array, got {})",
                type_name(other)
            )))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let path = format!("lineItems[{i}]");
            let obj = item
                .as_object()
                .ok_or_else(|| Error::Format(format!("Field {path} is not an object")))?;
            Ok(LineItem {
                description: coerce_string(
                    require(obj, "description")?,
                    &format!("{path}.description"),
                )?,
                amount: coerce_number(require(obj, "amount")?, &format!("{path}.amount"))?,
            })
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
