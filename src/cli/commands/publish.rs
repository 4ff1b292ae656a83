use anyhow::Result;
use clap::Args;
use colored::*;
use std::path::PathBuf;

use fabric_deploy::api;
use fabric_deploy::config::{PublishConfig, Settings};
use fabric_deploy::publish::{self, PublishAction, PublishOptions};

#[derive(Args)]
pub struct PublishCommands {
    /// Directory holding the item folders
    #[arg(long)]
    pub repository_dir: Option<PathBuf>,

    /// Item types to publish (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub item_types: Option<Vec<String>>,

    /// Publish only; keep remote items that have no local definition
    #[arg(long)]
    pub skip_unpublish: bool,
}

pub async fn handle_publish_command(args: PublishCommands, settings: &Settings) -> Result<()> {
    let config = PublishConfig::from_env()?;
    let options = PublishOptions {
        repository_directory: args
            .repository_dir
            .unwrap_or_else(|| settings.publish.repository_directory.clone()),
        item_types: args
            .item_types
            .unwrap_or_else(|| settings.publish.item_types.clone()),
        unpublish_orphans: !args.skip_unpublish,
    };

    println!(
        "Publishing {} to workspace {} ({})",
        options.repository_directory.display().to_string().cyan(),
        config.workspace_id.bright_green(),
        config.environment.bright_yellow()
    );

    let http = api::http_client(settings.api.timeout())?;
    let report = publish::publish_workspace(&http, &config, &settings.api, &options).await?;

    for item in &report.published {
        let action = match item.action {
            PublishAction::Created => "created".green(),
            PublishAction::Updated => "updated".green(),
            PublishAction::Unchanged => "unchanged".dimmed(),
        };
        println!("{} {} '{}' {}", "✓".green(), item.item_type, item.display_name, action);
    }
    for item in &report.unpublished {
        println!("{} {} '{}' {}", "✓".green(), item.item_type, item.display_name, "removed".yellow());
    }

    println!(
        "Published {} items, removed {} orphans",
        report.published.len(),
        report.unpublished.len()
    );
    Ok(())
}
