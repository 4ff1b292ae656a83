//! Dataset ownership take-over and cloud connection binding

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use crate::api::{self, OperationResult, PowerBiClient, constants};
use crate::config::{ApiSettings, RebindConfig};

/// Dataset calls the rebinder depends on
#[async_trait]
pub trait DatasetApi {
    async fn list_datasets_ids(&self, workspace_id: &str) -> Vec<String>;

    async fn take_over(&self, workspace_id: &str, dataset_id: &str) -> OperationResult;

    async fn bind_to_gateway(
        &self,
        workspace_id: &str,
        dataset_id: &str,
        cloud_connection_id: &str,
    ) -> OperationResult;
}

#[async_trait]
impl DatasetApi for PowerBiClient {
    async fn list_datasets_ids(&self, workspace_id: &str) -> Vec<String> {
        PowerBiClient::list_datasets_ids(self, workspace_id).await
    }

    async fn take_over(&self, workspace_id: &str, dataset_id: &str) -> OperationResult {
        PowerBiClient::take_over(self, workspace_id, dataset_id).await
    }

    async fn bind_to_gateway(
        &self,
        workspace_id: &str,
        dataset_id: &str,
        cloud_connection_id: &str,
    ) -> OperationResult {
        PowerBiClient::bind_to_gateway(self, workspace_id, dataset_id, cloud_connection_id).await
    }
}

/// Outcome of a rebind run, one entry per call made
#[derive(Debug, Clone, Default)]
pub struct RebindSummary {
    pub datasets: Vec<String>,
    pub results: Vec<OperationResult>,
}

impl RebindSummary {
    pub fn failures(&self) -> impl Iterator<Item = &OperationResult> {
        self.results.iter().filter(|r| r.is_error())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn success_count(&self) -> usize {
        self.results.len() - self.failure_count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

pub struct DatasetRebinder<A> {
    api: A,
    workspace_id: String,
    cloud_connection_id: String,
    only_update: bool,
}

impl<A: DatasetApi> DatasetRebinder<A> {
    pub fn new(
        api: A,
        workspace_id: impl Into<String>,
        cloud_connection_id: impl Into<String>,
        only_update: bool,
    ) -> Self {
        Self {
            api,
            workspace_id: workspace_id.into(),
            cloud_connection_id: cloud_connection_id.into(),
            only_update,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Walk the workspace's datasets one at a time: take ownership unless
    /// only updating, then bind the cloud connection. A failed call never
    /// stops the walk; it is recorded in the summary instead.
    pub async fn run(&self) -> RebindSummary {
        let datasets = self.api.list_datasets_ids(&self.workspace_id).await;
        let mut results = Vec::with_capacity(datasets.len() * 2);

        for dataset_id in &datasets {
            info!("Processing dataset {}", dataset_id);

            if !self.only_update {
                results.push(self.api.take_over(&self.workspace_id, dataset_id).await);
            }

            results.push(
                self.api
                    .bind_to_gateway(&self.workspace_id, dataset_id, &self.cloud_connection_id)
                    .await,
            );
        }

        RebindSummary { datasets, results }
    }
}

/// Authenticate once, then rebind every dataset of the configured workspace.
///
/// Only the token fetch is fatal.
pub async fn rebind_workspace(
    http: &reqwest::Client,
    config: &RebindConfig,
    api_settings: &ApiSettings,
) -> Result<RebindSummary> {
    let token = api::authenticate(
        http,
        &config.credentials,
        &api_settings.login_base,
        constants::POWERBI_SCOPE,
    )
    .await?;

    let client = PowerBiClient::new(&api_settings.powerbi_base, token.access_token, http.clone());
    let rebinder = DatasetRebinder::new(
        client,
        &config.workspace_id,
        &config.cloud_connection_id,
        config.only_update,
    );

    Ok(rebinder.run().await)
}
