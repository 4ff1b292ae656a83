use anyhow::Context;
use reqwest::StatusCode;
use std::time::Duration;

use super::constants::{self, headers};
use super::models::{BindToGatewayRequest, DatasetList};
use super::operations::{DatasetOperation, OperationResult};

/// Build the HTTP client shared by every API call of a run
pub fn http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("fabric-deploy/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

pub(crate) fn request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Power BI REST client for dataset ownership and gateway bindings
#[derive(Clone)]
pub struct PowerBiClient {
    base_url: String,
    http_client: reqwest::Client,
    access_token: String,
}

impl PowerBiClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
            access_token: access_token.into(),
        }
    }

    /// List the ids of every dataset in a workspace, in the order returned.
    ///
    /// Failures are logged and yield an empty list rather than an error.
    pub async fn list_datasets_ids(&self, workspace_id: &str) -> Vec<String> {
        let url = constants::datasets_endpoint(&self.base_url, workspace_id);
        let request_id = request_id();
        log::debug!("GET {} ({})", url, request_id);

        let response = match self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header(headers::CLIENT_REQUEST_ID, &request_id)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::error!("Failed to list datasets of workspace {}: {}", workspace_id, e);
                return Vec::new();
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            log::error!("Error {}: {}", status.as_u16(), body);
            return Vec::new();
        }

        match response.json::<DatasetList>().await {
            Ok(list) => {
                let ids: Vec<String> = list.value.into_iter().map(|ds| ds.id).collect();
                log::info!("Found {} datasets in workspace {}", ids.len(), workspace_id);
                ids
            }
            Err(e) => {
                log::error!("Failed to parse dataset listing: {}", e);
                Vec::new()
            }
        }
    }

    /// Transfer ownership of a dataset to the calling principal
    pub async fn take_over(&self, workspace_id: &str, dataset_id: &str) -> OperationResult {
        let url = constants::take_over_endpoint(&self.base_url, workspace_id, dataset_id);
        let operation = DatasetOperation::take_over(dataset_id);
        self.post_operation(&url, operation, None).await
    }

    /// Bind a dataset to a cloud connection
    pub async fn bind_to_gateway(
        &self,
        workspace_id: &str,
        dataset_id: &str,
        cloud_connection_id: &str,
    ) -> OperationResult {
        let url = constants::bind_to_gateway_endpoint(&self.base_url, workspace_id, dataset_id);
        let operation = DatasetOperation::bind_to_gateway(dataset_id, cloud_connection_id);
        let body = BindToGatewayRequest::cloud_connection(dataset_id, cloud_connection_id);
        self.post_operation(&url, operation, Some(&body)).await
    }

    async fn post_operation(
        &self,
        url: &str,
        operation: DatasetOperation,
        body: Option<&BindToGatewayRequest>,
    ) -> OperationResult {
        let request_id = request_id();
        log::debug!("POST {} ({})", url, request_id);

        let mut request = self
            .http_client
            .post(url)
            .bearer_auth(&self.access_token)
            .header(headers::CLIENT_REQUEST_ID, &request_id)
            .header(reqwest::header::CONTENT_TYPE, headers::CONTENT_TYPE_JSON);

        request = match body {
            Some(body) => request.json(body),
            // Power BI rejects bodiless POSTs without a length
            None => request.header(reqwest::header::CONTENT_LENGTH, 0),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("{} failed: {}", operation, e);
                return OperationResult::error(operation, e.to_string(), None);
            }
        };

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            log::info!("{} succeeded ({})", operation, status.as_u16());
            OperationResult::success(operation, status.as_u16())
        } else {
            let body = response.text().await.unwrap_or_default();
            log::error!("{} failed. Error {}: {}", operation, status.as_u16(), body);
            OperationResult::error(operation, body, Some(status.as_u16()))
        }
    }
}
