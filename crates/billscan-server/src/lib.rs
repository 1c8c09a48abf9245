//! Billscan Web Server
//!
//! Axum-based REST API wrapping the billscan core: analyze a bill image,
//! browse and clear the analysis history, save CSV exports server-side, and
//! probe a local Ollama install for usable vision models. Stored bill images
//! are served statically under `/uploads`.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer,
};
use tracing::{error, info};

use billscan_core::{AiSettings, Error as CoreError, HistoryStore};

mod handlers;

/// Maximum request body size: base64 bill photos are large (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Shared application state
pub struct AppState {
    pub history: HistoryStore,
    /// AI configuration loaded at startup; persistence happens at process
    /// boundaries only
    pub settings: AiSettings,
    /// Directory for server-side CSV exports
    pub csv_dir: PathBuf,
}

/// Build the API router.
pub fn app(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(state.history.uploads_dir());

    Router::new()
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/history", get(handlers::list_history))
        .route("/api/history", post(handlers::append_history))
        .route("/api/history", delete(handlers::clear_history))
        .route("/api/save-analysis", post(handlers::save_analysis))
        .route("/api/ollama/test", post(handlers::ollama_test))
        .route("/api/ollama/tags", post(handlers::ollama_tags))
        .nest_service("/uploads", uploads)
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_SIZE))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn run(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    info!("billscan server listening on http://{host}:{port}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// API error envelope: a status code plus a JSON `{"error": ...}` body.
///
/// Provider failures keep their human-readable diagnostic (they name the
/// offending provider and field); infrastructure errors are sanitized.
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.message
        }));
        (self.status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let status = match &err {
            CoreError::Configuration(_) | CoreError::InvalidData(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Transport(_) | CoreError::EmptyResponse(_) | CoreError::Format(_) => {
                StatusCode::BAD_GATEWAY
            }
            CoreError::Io(_) | CoreError::Json(_) => {
                error!(error = %err, "Internal error");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "An internal error occurred".to_string(),
                };
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests;
