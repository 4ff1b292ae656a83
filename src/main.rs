use anyhow::Result;
use clap::Parser;
use log::{debug, info};

mod cli;

use cli::Cli;
use cli::app::Commands;
use fabric_deploy::config::{self, Settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_stderr {
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Stderr)
            .init();
    } else {
        // Log to file (truncate on each run)
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open("fabric-deploy.log")?;
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .init();
    }

    if cli.no_color {
        colored::control::set_override(false);
    }

    info!("Starting fabric-deploy");

    match &cli.env_file {
        Some(path) => config::load_env_file(path)?,
        None => {
            if let Ok(path) = dotenvy::dotenv() {
                debug!("Loaded environment from {}", path.display());
            }
        }
    }

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Publish(args) => {
            cli::commands::handle_publish_command(args, &settings).await?;
        }
        Commands::Rebind(args) => {
            cli::commands::handle_rebind_command(args, &settings).await?;
        }
        Commands::LoadTables(args) => {
            cli::commands::handle_load_tables_command(args, &settings).await?;
        }
    }

    Ok(())
}
