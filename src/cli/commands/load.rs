use anyhow::Result;
use clap::Args;
use colored::*;
use std::path::PathBuf;

use fabric_deploy::config::Settings;
use fabric_deploy::loader::{self, SqliteCatalog};

#[derive(Args)]
pub struct LoadTablesCommands {
    /// File store root the CSV paths are relative to
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Catalog database file
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

pub async fn handle_load_tables_command(args: LoadTablesCommands, settings: &Settings) -> Result<()> {
    let root = args.root.unwrap_or_else(|| settings.loader.root.clone());
    let catalog_path = args.catalog.unwrap_or_else(|| settings.loader.catalog.clone());

    let catalog = SqliteCatalog::open(&catalog_path).await?;
    let outcomes = loader::load_all(&catalog, &root, &settings.loader.tables).await;

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => println!(
                "{} {} ({} rows, {} columns)",
                "✓".green(),
                report.table.bright_green(),
                report.rows,
                report.columns.len()
            ),
            Err(e) => {
                failed += 1;
                println!("{} {}: {:#}", "✗".red(), outcome.mapping.table, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} tables failed to load", failed, outcomes.len());
    }
    Ok(())
}
