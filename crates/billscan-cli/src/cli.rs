//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Billscan - Analyze utility bills with AI vision providers
#[derive(Parser)]
#[command(name = "billscan")]
#[command(about = "Extract structured data from utility bill photos", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory for history, settings, and exports
    /// (defaults to the platform data dir, e.g. ~/.local/share/billscan)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(billscan_core::settings::default_data_dir)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a bill image with the configured AI provider
    Analyze {
        /// Image file to analyze (JPEG, PNG, or WEBP)
        image: PathBuf,

        /// Provider override: gemini, ollama, or openai
        #[arg(short, long)]
        provider: Option<String>,

        /// Print the full result as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Skip appending the result to history
        #[arg(long)]
        no_save: bool,
    },

    /// Browse past analyses
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Export an analysis from history as CSV
    Export {
        /// Record id (see `billscan history list`)
        id: String,

        /// Output file (defaults to a timestamped file in the data dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List multimodal models installed on the configured Ollama server
    Models {
        /// Ollama server URL (defaults to the configured one)
        #[arg(long)]
        url: Option<String>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List all records, newest first
    List,
    /// Print one record as JSON
    Show { id: String },
    /// Delete all records and stored images
    Clear,
}
