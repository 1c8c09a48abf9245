//! Command implementations

mod analyze;
mod history;
mod serve;

pub use analyze::{cmd_analyze, cmd_models};
pub use history::{cmd_export, cmd_history_clear, cmd_history_list, cmd_history_show};
pub use serve::cmd_serve;

use std::path::Path;

use anyhow::Result;

use billscan_core::settings::settings_path;
use billscan_core::AiSettings;

/// Load settings from the data dir with environment overrides applied.
pub(crate) fn load_settings(data_dir: &Path) -> Result<AiSettings> {
    let mut settings = AiSettings::load(&settings_path(data_dir))?;
    settings.apply_env();
    Ok(settings)
}
