//! Serve command

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use billscan_core::HistoryStore;
use billscan_server::AppState;

use super::load_settings;

pub async fn cmd_serve(data_dir: &Path, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState {
        history: HistoryStore::open(data_dir)?,
        settings: load_settings(data_dir)?,
        csv_dir: data_dir.join("csv"),
    });

    billscan_server::run(host, port, state).await
}
