use super::commands::{LoadTablesCommands, PublishCommands, RebindCommands};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fabric-deploy")]
#[command(about = "Deployment automation for Microsoft Fabric workspaces")]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to ./fabric-deploy.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Write the log to stderr instead of fabric-deploy.log
    #[arg(long, global = true)]
    pub log_stderr: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish local item definitions and remove orphaned items
    Publish(PublishCommands),
    /// Take over datasets and bind them to a cloud connection
    Rebind(RebindCommands),
    /// Load the CSV files into managed catalog tables
    LoadTables(LoadTablesCommands),
}
