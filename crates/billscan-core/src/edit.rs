//! Reconciliation of user edits into the canonical bill data
//!
//! Edits apply to an in-memory working copy (the `BillData` held by the
//! caller); the raw AI response is retained unmodified for diagnostics (see
//! [`crate::ai::Analysis`]).
//!
//! Confidence rules:
//! - a usage-chart cell edit sets that cell's confidence to 1.0 (human
//!   judgment fully supersedes the AI score)
//! - a top-level scalar edit does NOT touch `confidenceScores`, matching the
//!   shipped behavior of the app this replaces
//! - a month-label edit is a pure string replacement (axis labels carry no
//!   confidence)

use crate::confidence::FULL_CONFIDENCE;
use crate::error::{Error, Result};
use crate::models::{BillData, UsageChartDataPointValue};

/// Year label for a usage entry synthesized by an edit into a sparse slot
const PLACEHOLDER_YEAR: &str = "New";

/// Top-level scalar fields a user can edit in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    AccountName,
    AccountNumber,
    ServiceAddress,
    StatementDate,
    ServicePeriodStart,
    ServicePeriodEnd,
    TotalCurrentCharges,
    DueDate,
}

/// Replace a top-level scalar field's value.
///
/// `TotalCurrentCharges` parses the new value as a number; everything else is
/// a string replacement. Confidence scores are left untouched.
pub fn apply_scalar_edit(bill: &mut BillData, field: ScalarField, value: &str) -> Result<()> {
    match field {
        ScalarField::AccountName => bill.account_name = Some(value.to_string()),
        ScalarField::AccountNumber => bill.account_number = value.to_string(),
        ScalarField::ServiceAddress => bill.service_address = Some(value.to_string()),
        ScalarField::StatementDate => bill.statement_date = Some(value.to_string()),
        ScalarField::ServicePeriodStart => bill.service_period_start = Some(value.to_string()),
        ScalarField::ServicePeriodEnd => bill.service_period_end = Some(value.to_string()),
        ScalarField::TotalCurrentCharges => {
            bill.total_current_charges = value.trim().parse::<f64>().map_err(|_| {
                Error::InvalidData(format!("Not a valid amount: {value:?}"))
            })?;
        }
        ScalarField::DueDate => bill.due_date = value.to_string(),
    }
    Ok(())
}

/// Replace the numeric value at (chart, data point, year) and mark the cell
/// as human-verified.
///
/// If the addressed year slot does not exist at that data point (sparse
/// provider output), placeholder entries are synthesized up to the slot
/// before the edit lands.
pub fn apply_usage_edit(
    bill: &mut BillData,
    chart_index: usize,
    point_index: usize,
    year_index: usize,
    value: f64,
) -> Result<()> {
    let point = data_point_mut(bill, chart_index, point_index)?;

    while point.usage.len() <= year_index {
        point.usage.push(UsageChartDataPointValue {
            year: PLACEHOLDER_YEAR.to_string(),
            value: 0.0,
            confidence: FULL_CONFIDENCE,
        });
    }

    let cell = &mut point.usage[year_index];
    cell.value = value;
    cell.confidence = FULL_CONFIDENCE;
    Ok(())
}

/// Replace a data point's month label. Months are categorical axis labels,
/// not measured values, so no confidence is involved.
pub fn apply_month_edit(
    bill: &mut BillData,
    chart_index: usize,
    point_index: usize,
    month: &str,
) -> Result<()> {
    let point = data_point_mut(bill, chart_index, point_index)?;
    point.month = month.to_string();
    Ok(())
}

fn data_point_mut(
    bill: &mut BillData,
    chart_index: usize,
    point_index: usize,
) -> Result<&mut crate::models::UsageChartDataPoint> {
    let chart = bill
        .usage_charts
        .get_mut(chart_index)
        .ok_or_else(|| Error::NotFound(format!("No usage chart at index {chart_index}")))?;
    chart
        .data
        .get_mut(point_index)
        .ok_or_else(|| Error::NotFound(format!("No data point at index {point_index}")))
}
