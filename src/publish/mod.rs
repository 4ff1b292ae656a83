//! Sync a local directory of item definitions to a Fabric workspace

pub mod parameters;
pub mod repository;
pub mod workspace;

pub use parameters::ParameterFile;
pub use repository::{LocalItem, scan_repository};
pub use workspace::{FabricWorkspace, PublishAction, PublishedItem};

use anyhow::Result;
use std::path::PathBuf;

use crate::api::{self, FabricClient, FabricItem, constants};
use crate::config::{ApiSettings, PublishConfig};

/// Item types published when none are configured
pub const DEFAULT_ITEM_TYPES: &[&str] = &[
    "Lakehouse",
    "Notebook",
    "Environment",
    "DataPipeline",
    "SemanticModel",
    "Report",
];

#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub repository_directory: PathBuf,
    pub item_types: Vec<String>,
    pub unpublish_orphans: bool,
}

#[derive(Debug, Default)]
pub struct PublishReport {
    pub published: Vec<PublishedItem>,
    pub unpublished: Vec<FabricItem>,
}

/// Authenticate, publish every local item, then remove orphans.
///
/// Any failure aborts the run.
pub async fn publish_workspace(
    http: &reqwest::Client,
    config: &PublishConfig,
    api_settings: &ApiSettings,
    options: &PublishOptions,
) -> Result<PublishReport> {
    let token = api::authenticate(
        http,
        &config.credentials,
        &api_settings.login_base,
        constants::FABRIC_SCOPE,
    )
    .await?;

    let client = FabricClient::new(&api_settings.fabric_base, token.access_token, http.clone());
    publish_with_client(client, config, options).await
}

pub async fn publish_with_client(
    client: FabricClient,
    config: &PublishConfig,
    options: &PublishOptions,
) -> Result<PublishReport> {
    let workspace = FabricWorkspace::new(
        &config.workspace_id,
        &config.environment,
        &options.repository_directory,
        options.item_types.clone(),
        client,
    )?;

    let published = workspace.publish_all_items().await?;
    let unpublished = if options.unpublish_orphans {
        workspace.unpublish_all_orphan_items().await?
    } else {
        Vec::new()
    };

    Ok(PublishReport {
        published,
        unpublished,
    })
}
