//! Fabric REST client for workspace items
//!
//! Every call here is fatal on failure: a non-success status becomes an error
//! carrying the status and response body.

use anyhow::Context;
use reqwest::{Response, StatusCode};
use std::time::Duration;

use super::client::request_id;
use super::constants::{self, headers};
use super::models::{
    CreateItemRequest, FabricItem, ItemDefinition, ItemList, OperationState,
    UpdateDefinitionRequest,
};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_POLLS: u32 = 60;

#[derive(Clone)]
pub struct FabricClient {
    base_url: String,
    http_client: reqwest::Client,
    access_token: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl FabricClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
            access_token: access_token.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Override how long-running operations are awaited
    pub fn with_polling(mut self, poll_interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_polls = max_polls;
        self
    }

    /// List every item in a workspace, following continuation links
    pub async fn list_items(&self, workspace_id: &str) -> anyhow::Result<Vec<FabricItem>> {
        let mut items = Vec::new();
        let mut next = Some(constants::items_endpoint(&self.base_url, workspace_id));

        while let Some(url) = next {
            let response = self
                .send(self.http_client.get(&url), "GET", &url)
                .await?;
            let response = ensure_success(response, "list items").await?;
            let page: ItemList = response
                .json()
                .await
                .context("Failed to parse item listing")?;

            items.extend(page.value);
            next = page.continuation_uri;
        }

        log::info!("Workspace {} has {} items", workspace_id, items.len());
        Ok(items)
    }

    pub async fn create_item(&self, workspace_id: &str, request: &CreateItemRequest) -> anyhow::Result<()> {
        let url = constants::items_endpoint(&self.base_url, workspace_id);
        let response = self
            .send(self.http_client.post(&url).json(request), "POST", &url)
            .await?;
        let what = format!("create {} '{}'", request.item_type, request.display_name);
        self.complete(response, &what).await
    }

    pub async fn update_item_definition(
        &self,
        workspace_id: &str,
        item_id: &str,
        definition: ItemDefinition,
    ) -> anyhow::Result<()> {
        let url = constants::update_definition_endpoint(&self.base_url, workspace_id, item_id);
        let body = UpdateDefinitionRequest { definition };
        let response = self
            .send(self.http_client.post(&url).json(&body), "POST", &url)
            .await?;
        self.complete(response, &format!("update definition of {}", item_id))
            .await
    }

    pub async fn delete_item(&self, workspace_id: &str, item_id: &str) -> anyhow::Result<()> {
        let url = constants::item_endpoint(&self.base_url, workspace_id, item_id);
        let response = self
            .send(self.http_client.delete(&url), "DELETE", &url)
            .await?;
        ensure_success(response, &format!("delete item {}", item_id)).await?;
        Ok(())
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        method: &str,
        url: &str,
    ) -> anyhow::Result<Response> {
        let request_id = request_id();
        log::debug!("{} {} ({})", method, url, request_id);

        request
            .bearer_auth(&self.access_token)
            .header(headers::CLIENT_REQUEST_ID, &request_id)
            .send()
            .await
            .with_context(|| format!("{} {} failed", method, url))
    }

    /// Finish a call that may have started a long running operation
    async fn complete(&self, response: Response, what: &str) -> anyhow::Result<()> {
        if response.status() != StatusCode::ACCEPTED {
            ensure_success(response, what).await?;
            return Ok(());
        }

        let Some(location) = header_str(&response, reqwest::header::LOCATION) else {
            // Accepted without a way to track it
            log::warn!("{} was accepted without an operation location", what);
            return Ok(());
        };
        let mut wait = retry_after(&response).unwrap_or(self.poll_interval);

        for attempt in 1..=self.max_polls {
            tokio::time::sleep(wait).await;

            let response = self
                .send(self.http_client.get(&location), "GET", &location)
                .await?;
            let response = ensure_success(response, what).await?;
            wait = retry_after(&response).unwrap_or(self.poll_interval);

            let state: OperationState = response
                .json()
                .await
                .context("Failed to parse operation state")?;
            log::debug!("{}: poll {} status {}", what, attempt, state.status);

            match state.status.as_str() {
                "Succeeded" => return Ok(()),
                "Failed" => {
                    let detail = state
                        .error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "no error details".to_string());
                    anyhow::bail!("{} failed: {}", what, detail);
                }
                _ => {}
            }
        }

        anyhow::bail!("{} did not complete after {} polls", what, self.max_polls)
    }
}

fn header_str(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn retry_after(response: &Response) -> Option<Duration> {
    header_str(response, reqwest::header::RETRY_AFTER)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

async fn ensure_success(response: Response, what: &str) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    anyhow::bail!("Failed to {} ({}): {}", what, status, body)
}
