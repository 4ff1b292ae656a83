use anyhow::Result;
use clap::Args;
use colored::*;

use fabric_deploy::api::{self, DatasetOperation};
use fabric_deploy::config::{RebindConfig, Settings};
use fabric_deploy::rebind;

#[derive(Args)]
pub struct RebindCommands {}

pub async fn handle_rebind_command(_args: RebindCommands, settings: &Settings) -> Result<()> {
    let config = RebindConfig::from_env()?;

    println!(
        "Rebinding datasets in workspace {} to connection {}{}",
        config.workspace_id.bright_green(),
        config.cloud_connection_id.cyan(),
        if config.only_update { " (binding only)".dimmed().to_string() } else { String::new() }
    );

    let http = api::http_client(settings.api.timeout())?;
    let summary = rebind::rebind_workspace(&http, &config, &settings.api).await?;

    for result in &summary.results {
        let label = match &result.operation {
            DatasetOperation::TakeOver { dataset_id } => format!("Take over {}", dataset_id),
            DatasetOperation::BindToGateway { dataset_id, .. } => {
                format!("Cloud connection on {}", dataset_id)
            }
        };

        if result.is_success() {
            println!("{} {}", "✓".green(), label);
        } else {
            let status = result
                .status_code
                .map(|s| s.to_string())
                .unwrap_or_else(|| "no response".to_string());
            println!(
                "{} {} ({}): {}",
                "✗".red(),
                label,
                status,
                result.error.as_deref().unwrap_or("unknown error").dimmed()
            );
        }
    }

    println!(
        "Processed {} datasets: {} calls succeeded, {} failed",
        summary.datasets.len(),
        summary.success_count(),
        summary.failure_count()
    );

    if !summary.is_success() {
        anyhow::bail!(
            "{} of {} dataset operations failed",
            summary.failure_count(),
            summary.results.len()
        );
    }
    Ok(())
}
