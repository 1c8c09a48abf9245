//! CSV export projection
//!
//! Flattens a canonical [`BillData`] (edited or not) into a tabular text
//! form, independent of any rendering concern. Three record categories:
//! `Account Info` (one row per scalar field), `Line Items`, and one
//! `Usage Chart` block per chart (one row per month/year/value triple).
//! Sections are separated by a blank row.
//!
//! The only encoding rule is standard CSV escaping: cells containing a
//! comma, double quote, or newline are wrapped in double quotes with inner
//! quotes doubled. Missing optional fields render as empty strings.

use std::path::{Path, PathBuf};

use chrono::Local;
use regex::Regex;

use crate::error::Result;
use crate::models::BillData;

/// Render a bill as CSV text.
pub fn bill_to_csv(data: &BillData) -> String {
    let mut rows: Vec<String> = Vec::new();

    rows.push("Category,Field,Value".to_string());
    let account_row = |field: &str, value: &str| {
        format!("\"Account Info\",\"{}\",{}", field, escape_csv_field(value))
    };
    rows.push(account_row("Account Name", data.account_name.as_deref().unwrap_or("")));
    rows.push(account_row("Account Number", &data.account_number));
    rows.push(account_row(
        "Service Address",
        data.service_address.as_deref().unwrap_or(""),
    ));
    rows.push(account_row(
        "Statement Date",
        data.statement_date.as_deref().unwrap_or(""),
    ));
    rows.push(account_row("Due Date", &data.due_date));
    rows.push(account_row(
        "Total Charges",
        &data.total_current_charges.to_string(),
    ));
    rows.push(String::new());

    if !data.line_items.is_empty() {
        rows.push("Line Items,Description,Amount".to_string());
        for item in &data.line_items {
            rows.push(format!(
                ",{},{}",
                escape_csv_field(&item.description),
                escape_csv_field(&item.amount.to_string())
            ));
        }
        rows.push(String::new());
    }

    for chart in &data.usage_charts {
        rows.push("Usage Chart,Title,Unit".to_string());
        rows.push(format!(
            ",{},{}",
            escape_csv_field(&chart.title),
            escape_csv_field(&chart.unit)
        ));
        rows.push(",Month,Year,Value".to_string());
        for point in &chart.data {
            for usage in &point.usage {
                rows.push(format!(
                    ",{},{},{}",
                    escape_csv_field(&point.month),
                    escape_csv_field(&usage.year),
                    escape_csv_field(&usage.value.to_string())
                ));
            }
        }
        rows.push(String::new());
    }

    rows.join("\n")
}

/// Suggested filename for a saved export:
/// `<timestamp>_<sanitized account name>_bill-data.csv`
pub fn suggested_csv_filename(data: &BillData) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let sanitizer = Regex::new(r"[^a-zA-Z0-9]+").unwrap();
    let name = data
        .account_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .map(|n| sanitizer.replace_all(n, "_").to_lowercase())
        .unwrap_or_else(|| "account".to_string());
    format!("{timestamp}_{name}_bill-data.csv")
}

/// Write a bill's CSV projection into `dir`, creating it if needed.
/// Returns the path of the written file.
pub fn save_csv(dir: &Path, data: &BillData) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(suggested_csv_filename(data));
    std::fs::write(&path, bill_to_csv(data))?;
    Ok(path)
}

/// Escape a single CSV cell: quote when it contains a comma, double quote,
/// or newline, doubling inner quotes.
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ConfidenceScores, LineItem, UsageChart, UsageChartDataPoint, UsageChartDataPointValue,
    };

    fn sample_bill() -> BillData {
        BillData {
            account_name: Some("Jane Doe".into()),
            account_number: "1234-5678".into(),
            service_address: None,
            statement_date: Some("2024-01-15".into()),
            service_period_start: None,
            service_period_end: None,
            total_current_charges: 123.45,
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
            usage_charts: vec![UsageChart {
                title: "Electricity Usage".into(),
                unit: "kWh".into(),
                data: vec![
                    UsageChartDataPoint {
                        month: "Jan".into(),
                        usage: vec![
                            UsageChartDataPointValue {
                                year: "2023".into(),
                                value: 410.0,
                                confidence: 1.0,
                            },
                            UsageChartDataPointValue {
                                year: "2024".into(),
                                value: 395.5,
                                confidence: 1.0,
                            },
                        ],
                    },
                    UsageChartDataPoint {
                        month: "Feb".into(),
                        usage: vec![UsageChartDataPointValue {
                            year: "2023".into(),
                            value: 388.0,
                            confidence: 1.0,
                        }],
                    },
                ],
            }],
            line_items: vec![LineItem {
                description: "Late Fee, Penalty".into(),
                amount: 12.5,
            }],
        }
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("simple"), "simple");
        assert_eq!(escape_csv_field("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv_field("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv_field("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_comma_in_description_is_quoted() {
        let csv = bill_to_csv(&sample_bill());
        assert!(csv.contains("\"Late Fee, Penalty\",12.5"));
    }

    #[test]
    fn test_missing_optionals_render_empty() {
        let csv = bill_to_csv(&sample_bill());
        assert!(csv.contains("\"Account Info\",\"Service Address\",\n"));
        assert!(!csv.contains("null"));
        assert!(!csv.contains("None"));
    }

    #[test]
    fn test_chart_emits_one_row_per_month_year_pair() {
        let csv = bill_to_csv(&sample_bill());
        assert!(csv.contains(",Jan,2023,410"));
        assert!(csv.contains(",Jan,2024,395.5"));
        assert!(csv.contains(",Feb,2023,388"));
    }

    #[test]
    fn test_sections_are_blank_line_separated() {
        let csv = bill_to_csv(&sample_bill());
        let lines: Vec<&str> = csv.lines().collect();
        // account info block (header + 6 rows) then a spacer
        assert_eq!(lines[0], "Category,Field,Value");
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "Line Items,Description,Amount");
    }

    #[test]
    fn test_empty_collections_emit_no_sections() {
        let mut bill = sample_bill();
        bill.line_items.clear();
        bill.usage_charts.clear();
        let csv = bill_to_csv(&bill);
        assert!(!csv.contains("Line Items"));
        assert!(!csv.contains("Usage Chart"));
    }

    #[test]
    fn test_suggested_filename_sanitizes_account_name() {
        let mut bill = sample_bill();
        bill.account_name = Some("ACME Power & Light Co.".into());
        let name = suggested_csv_filename(&bill);
        assert!(name.ends_with("_acme_power_light_co__bill-data.csv"));

        bill.account_name = None;
        assert!(suggested_csv_filename(&bill).ends_with("_account_bill-data.csv"));
    }
}
