//! Settings persistence
//!
//! `AiSettings` is threaded explicitly into every analysis call; this module
//! only loads and saves it at process boundaries. Environment variables can
//! overlay the file so credentials stay out of saved settings when desired.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::models::{AiProvider, AiSettings};

/// Default data directory: `~/.local/share/billscan` on Linux, the platform
/// equivalent elsewhere, falling back to the working directory.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("billscan")
}

/// Settings file path inside a data directory
pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

impl AiSettings {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Save settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Overlay environment variables onto these settings.
    ///
    /// Recognized: `BILLSCAN_PROVIDER`, `GEMINI_API_KEY`, `OPENAI_API_KEY`,
    /// `OLLAMA_HOST`, `OLLAMA_MODEL`.
    pub fn apply_env(&mut self) {
        if let Ok(provider) = std::env::var("BILLSCAN_PROVIDER") {
            if let Ok(provider) = provider.parse::<AiProvider>() {
                self.provider = provider;
            }
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.gemini.api_key = key;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai.api_key = key;
        }
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            self.ollama.server_url = host;
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            self.ollama.model = model;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AiSettings::load(&settings_path(dir.path())).unwrap();
        assert_eq!(settings.provider, AiProvider::Gemini);
        assert!(settings.gemini.api_key.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = settings_path(dir.path());

        let mut settings = AiSettings::default();
        settings.provider = AiProvider::Ollama;
        settings.ollama.model = "llava".into();
        settings.verbose_logging = true;
        settings.save(&path).unwrap();

        let reloaded = AiSettings::load(&path).unwrap();
        assert_eq!(reloaded.provider, AiProvider::Ollama);
        assert_eq!(reloaded.ollama.model, "llava");
        assert!(reloaded.verbose_logging);
    }
}
