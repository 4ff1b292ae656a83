use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::info;
use std::collections::HashSet;
use std::path::PathBuf;

use super::parameters::ParameterFile;
use super::repository::{LocalItem, scan_repository};
use crate::api::models::{CreateItemRequest, DefinitionPart};
use crate::api::{FabricClient, FabricItem, ItemDefinition};

/// Order items are published in; unpublishing runs it backwards
const PUBLISH_ORDER: &[&str] = &[
    "Environment",
    "Lakehouse",
    "Notebook",
    "DataPipeline",
    "SemanticModel",
    "Report",
];

/// Item types whose definition Fabric does not accept
const DEFINITIONLESS_TYPES: &[&str] = &["Lakehouse"];

fn publish_rank(item_type: &str) -> usize {
    PUBLISH_ORDER
        .iter()
        .position(|t| *t == item_type)
        .unwrap_or(PUBLISH_ORDER.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishAction {
    Created,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct PublishedItem {
    pub item_type: String,
    pub display_name: String,
    pub action: PublishAction,
}

/// A target workspace paired with the local repository that defines it
pub struct FabricWorkspace {
    pub workspace_id: String,
    pub environment: String,
    pub repository_directory: PathBuf,
    pub item_types: Vec<String>,
    client: FabricClient,
    local_items: Vec<LocalItem>,
    parameters: ParameterFile,
}

impl FabricWorkspace {
    /// Scan the repository and load its parameter file. Nothing is sent yet.
    pub fn new(
        workspace_id: impl Into<String>,
        environment: impl Into<String>,
        repository_directory: impl Into<PathBuf>,
        item_types: Vec<String>,
        client: FabricClient,
    ) -> Result<Self> {
        let repository_directory = repository_directory.into();
        let mut local_items = scan_repository(&repository_directory, &item_types)?;
        local_items.sort_by(|a, b| {
            (publish_rank(&a.item_type), &a.display_name)
                .cmp(&(publish_rank(&b.item_type), &b.display_name))
        });
        let parameters = ParameterFile::load(&repository_directory)?;

        let workspace = Self {
            workspace_id: workspace_id.into(),
            environment: environment.into(),
            repository_directory,
            item_types,
            client,
            local_items,
            parameters,
        };

        info!(
            "Found {} local items in {} for environment {}",
            workspace.local_items.len(),
            workspace.repository_directory.display(),
            workspace.environment
        );
        Ok(workspace)
    }

    /// Create or update every local item in the remote workspace
    pub async fn publish_all_items(&self) -> Result<Vec<PublishedItem>> {
        let remote = self.client.list_items(&self.workspace_id).await?;
        let mut published = Vec::with_capacity(self.local_items.len());

        for item in &self.local_items {
            let existing = remote
                .iter()
                .find(|r| r.item_type == item.item_type && r.display_name == item.display_name);
            let definitionless = DEFINITIONLESS_TYPES.contains(&item.item_type.as_str());

            let action = match existing {
                Some(_) if definitionless => {
                    log::debug!("{} '{}' already exists", item.item_type, item.display_name);
                    PublishAction::Unchanged
                }
                Some(remote_item) => {
                    info!("Updating {} '{}'", item.item_type, item.display_name);
                    self.client
                        .update_item_definition(&self.workspace_id, &remote_item.id, self.definition(item))
                        .await?;
                    PublishAction::Updated
                }
                None => {
                    info!("Creating {} '{}'", item.item_type, item.display_name);
                    let request = CreateItemRequest {
                        display_name: item.display_name.clone(),
                        item_type: item.item_type.clone(),
                        definition: if definitionless {
                            None
                        } else {
                            Some(self.definition(item))
                        },
                    };
                    self.client.create_item(&self.workspace_id, &request).await?;
                    PublishAction::Created
                }
            };

            published.push(PublishedItem {
                item_type: item.item_type.clone(),
                display_name: item.display_name.clone(),
                action,
            });
        }

        Ok(published)
    }

    /// Delete remote items of in-scope types that have no local definition
    pub async fn unpublish_all_orphan_items(&self) -> Result<Vec<FabricItem>> {
        let local: HashSet<(&str, &str)> = self.local_items.iter().map(|i| i.key()).collect();
        let mut orphans: Vec<FabricItem> = self
            .client
            .list_items(&self.workspace_id)
            .await?
            .into_iter()
            .filter(|r| self.item_types.iter().any(|t| t == &r.item_type))
            .filter(|r| !local.contains(&(r.item_type.as_str(), r.display_name.as_str())))
            .collect();

        orphans.sort_by(|a, b| {
            (publish_rank(&b.item_type), &b.display_name)
                .cmp(&(publish_rank(&a.item_type), &a.display_name))
        });

        for orphan in &orphans {
            info!("Unpublishing orphan {} '{}'", orphan.item_type, orphan.display_name);
            self.client.delete_item(&self.workspace_id, &orphan.id).await?;
        }

        Ok(orphans)
    }

    /// Encode an item's files, applying environment parameters to text files
    pub fn definition(&self, item: &LocalItem) -> ItemDefinition {
        let parts = item
            .files
            .iter()
            .map(|file| {
                let payload = match std::str::from_utf8(&file.contents) {
                    Ok(text) if !self.parameters.is_empty() => {
                        STANDARD.encode(self.parameters.apply(&self.environment, text))
                    }
                    _ => STANDARD.encode(&file.contents),
                };
                DefinitionPart::inline_base64(&file.path, payload)
            })
            .collect();

        ItemDefinition { parts }
    }
}
