//! History handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use billscan_core::{AnalysisRecord, BillData, BillImage};

/// GET /api/history - All records, newest first
pub async fn list_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AnalysisRecord>>, AppError> {
    Ok(Json(state.history.list()?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendHistoryRequest {
    pub data: BillData,
    /// Base64 data URI of the source image
    #[serde(default)]
    pub image_src: Option<String>,
}

/// POST /api/history - Append an analysis (e.g. after client-side edits)
pub async fn append_history(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AppendHistoryRequest>,
) -> Result<(axum::http::StatusCode, Json<AnalysisRecord>), AppError> {
    let image = request
        .image_src
        .as_deref()
        .map(BillImage::from_data_uri)
        .transpose()?;

    let record = state.history.append(&request.data, image.as_ref())?;
    Ok((axum::http::StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// DELETE /api/history - Clear all records and stored images
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, AppError> {
    state.history.clear()?;
    Ok(Json(MessageResponse {
        message: "History cleared successfully".to_string(),
    }))
}
