//! Billscan CLI - Utility bill analyzer
//!
//! Usage:
//!   billscan analyze bill.jpg          Analyze a bill image
//!   billscan history list              Show past analyses
//!   billscan export <id> -o out.csv    Export an analysis as CSV
//!   billscan models                    List multimodal Ollama models
//!   billscan serve --port 4000         Start the web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let data_dir = cli.resolved_data_dir();

    match cli.command {
        Commands::Analyze {
            image,
            provider,
            json,
            no_save,
        } => {
            commands::cmd_analyze(&data_dir, &image, provider.as_deref(), json, no_save).await
        }
        Commands::History { action } => match action {
            HistoryAction::List => commands::cmd_history_list(&data_dir),
            HistoryAction::Show { id } => commands::cmd_history_show(&data_dir, &id),
            HistoryAction::Clear => commands::cmd_history_clear(&data_dir),
        },
        Commands::Export { id, output } => {
            commands::cmd_export(&data_dir, &id, output.as_deref())
        }
        Commands::Models { url } => commands::cmd_models(&data_dir, url.as_deref()).await,
        Commands::Serve { host, port } => commands::cmd_serve(&data_dir, &host, port).await,
    }
}
