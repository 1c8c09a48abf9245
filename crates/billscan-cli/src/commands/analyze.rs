//! Analyze and model-discovery commands

use std::path::Path;

use anyhow::{Context, Result};

use billscan_core::{needs_review, AiClient, BillData, BillImage, HistoryStore};

use super::load_settings;

pub async fn cmd_analyze(
    data_dir: &Path,
    image_path: &Path,
    provider: Option<&str>,
    json: bool,
    no_save: bool,
) -> Result<()> {
    let mut settings = load_settings(data_dir)?;
    if let Some(provider) = provider {
        settings.provider = provider.parse()?;
    }

    let bytes = std::fs::read(image_path)
        .with_context(|| format!("Could not read image {}", image_path.display()))?;
    let image = BillImage::from_bytes(bytes);

    let client = AiClient::from_settings(&settings)?;
    let analysis = client.analyze(&image).await?;

    if !no_save {
        let store = HistoryStore::open(data_dir)?;
        let record = store.append(&analysis.data, Some(&image))?;
        tracing::debug!(id = %record.id, "saved analysis to history");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis.data)?);
    } else {
        print_summary(&analysis.data);
    }
    Ok(())
}

fn print_summary(bill: &BillData) {
    println!("Account:        {}", bill.account_name.as_deref().unwrap_or("-"));
    println!("Account number: {}", bill.account_number);
    if let Some(address) = &bill.service_address {
        println!("Address:        {address}");
    }
    println!("Total charges:  {:.2}", bill.total_current_charges);
    println!("Due date:       {}", bill.due_date);

    if !bill.line_items.is_empty() {
        println!("\nLine items:");
        for item in &bill.line_items {
            println!("  {:>10.2}  {}", item.amount, item.description);
        }
    }

    for chart in &bill.usage_charts {
        println!("\n{} ({})", chart.title, chart.unit);
        for point in &chart.data {
            let values: Vec<String> = point
                .usage
                .iter()
                .map(|u| format!("{}: {}", u.year, u.value))
                .collect();
            println!("  {:>4}  {}", point.month, values.join("  "));
        }
    }

    let flagged = review_flags(bill);
    if !flagged.is_empty() {
        println!("\nNeeds review (confidence below 0.75): {}", flagged.join(", "));
    }
}

/// Fields whose confidence falls below the review threshold
fn review_flags(bill: &BillData) -> Vec<&'static str> {
    let scores = &bill.confidence_scores;
    let mut flagged = Vec::new();

    let mut check = |name: &'static str, score: Option<f64>| {
        if let Some(score) = score {
            if needs_review(score) {
                flagged.push(name);
            }
        }
    };

    check("accountName", scores.account_name);
    check("accountNumber", Some(scores.account_number));
    check("serviceAddress", scores.service_address);
    check("statementDate", scores.statement_date);
    check("totalCurrentCharges", Some(scores.total_current_charges));
    check("dueDate", Some(scores.due_date));
    flagged
}

pub async fn cmd_models(data_dir: &Path, url: Option<&str>) -> Result<()> {
    let settings = load_settings(data_dir)?;
    let url = url.unwrap_or(&settings.ollama.server_url);

    let client = reqwest::Client::new();
    let models = billscan_core::ai::list_multimodal_models(&client, url).await?;

    if models.is_empty() {
        println!("No multimodal models found at {url}");
        println!("Install one with e.g.: ollama pull llava");
    } else {
        for model in models {
            println!("{model}");
        }
    }
    Ok(())
}
