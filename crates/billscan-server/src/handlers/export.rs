//! CSV export handler

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::handlers::history::MessageResponse;
use crate::{AppError, AppState};
use billscan_core::{save_csv, BillData};

/// POST /api/save-analysis - Write a CSV projection of the (possibly edited)
/// bill data to the server's export directory.
pub async fn save_analysis(
    State(state): State<Arc<AppState>>,
    Json(data): Json<BillData>,
) -> Result<Json<MessageResponse>, AppError> {
    let path = save_csv(&state.csv_dir, &data)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Json(MessageResponse {
        message: format!("CSV saved on server as {filename}"),
    }))
}
