//! CLI argument parsing tests

use clap::Parser;

use crate::cli::{Cli, Commands, HistoryAction};

#[test]
fn test_analyze_args() {
    let cli = Cli::parse_from(["billscan", "analyze", "bill.jpg", "--provider", "ollama"]);
    match cli.command {
        Commands::Analyze {
            image,
            provider,
            json,
            no_save,
        } => {
            assert_eq!(image.to_str(), Some("bill.jpg"));
            assert_eq!(provider.as_deref(), Some("ollama"));
            assert!(!json);
            assert!(!no_save);
        }
        _ => panic!("expected analyze command"),
    }
}

#[test]
fn test_history_subcommands() {
    let cli = Cli::parse_from(["billscan", "history", "show", "123-abc"]);
    match cli.command {
        Commands::History {
            action: HistoryAction::Show { id },
        } => assert_eq!(id, "123-abc"),
        _ => panic!("expected history show"),
    }
}

#[test]
fn test_serve_defaults() {
    let cli = Cli::parse_from(["billscan", "serve"]);
    match cli.command {
        Commands::Serve { host, port } => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(port, 4000);
        }
        _ => panic!("expected serve command"),
    }
}

#[test]
fn test_global_data_dir_flag() {
    let cli = Cli::parse_from(["billscan", "--data-dir", "/tmp/bs", "history", "list"]);
    assert_eq!(cli.resolved_data_dir().to_str(), Some("/tmp/bs"));
}
