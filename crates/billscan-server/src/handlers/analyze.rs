//! Bill analysis handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState};
use billscan_core::{AiClient, AiProvider, AnalysisRecord, BillImage};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Base64 data URI of the bill image
    pub image_data: String,
    /// Override the configured provider for this request
    #[serde(default)]
    pub provider: Option<AiProvider>,
}

/// POST /api/analyze - Run a bill image through the configured AI provider
/// and append the result to history.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let mut settings = state.settings.clone();
    if let Some(provider) = request.provider {
        settings.provider = provider;
    }

    let client = AiClient::from_settings(&settings)?;
    let image = BillImage::from_data_uri(&request.image_data)?;

    info!(provider = settings.provider.name(), "analyzing bill image");
    let analysis = client.analyze(&image).await?;

    let record = state.history.append(&analysis.data, Some(&image))?;
    Ok(Json(record))
}
