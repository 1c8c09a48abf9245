//! History and export commands

use std::path::Path;

use anyhow::{bail, Result};

use billscan_core::{bill_to_csv, save_csv, HistoryStore};

pub fn cmd_history_list(data_dir: &Path) -> Result<()> {
    let store = HistoryStore::open(data_dir)?;
    let records = store.list()?;

    if records.is_empty() {
        println!("No analyses yet. Run `billscan analyze <image>` first.");
        return Ok(());
    }

    for record in records {
        println!(
            "{}  {}  {}  {:.2}",
            record.id,
            record.timestamp,
            record.data.account_number,
            record.data.total_current_charges
        );
    }
    Ok(())
}

pub fn cmd_history_show(data_dir: &Path, id: &str) -> Result<()> {
    let store = HistoryStore::open(data_dir)?;
    match store.get(id)? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        None => bail!("No analysis with id {id}"),
    }
}

pub fn cmd_history_clear(data_dir: &Path) -> Result<()> {
    let store = HistoryStore::open(data_dir)?;
    store.clear()?;
    println!("History cleared");
    Ok(())
}

pub fn cmd_export(data_dir: &Path, id: &str, output: Option<&Path>) -> Result<()> {
    let store = HistoryStore::open(data_dir)?;
    let Some(record) = store.get(id)? else {
        bail!("No analysis with id {id}");
    };

    let path = match output {
        Some(path) => {
            std::fs::write(path, bill_to_csv(&record.data))?;
            path.to_path_buf()
        }
        None => save_csv(&data_dir.join("csv"), &record.data)?,
    };

    println!("Exported to {}", path.display());
    Ok(())
}
