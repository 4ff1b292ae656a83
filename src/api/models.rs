use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Bearer token obtained for a single run
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: SystemTime,
}

/// OAuth2 token endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
}

/// Power BI dataset as returned by the listing call. Only the id is used.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatasetList {
    #[serde(default)]
    pub value: Vec<Dataset>,
}

/// Body of `Default.BindToGateway`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindToGatewayRequest {
    pub gateway_object_id: String,
    pub datasource_object_ids: Vec<String>,
}

impl BindToGatewayRequest {
    /// Cloud connections are bound by passing the dataset itself as the gateway object
    pub fn cloud_connection(dataset_id: &str, cloud_connection_id: &str) -> Self {
        Self {
            gateway_object_id: dataset_id.to_string(),
            datasource_object_ids: vec![cloud_connection_id.to_string()],
        }
    }
}

/// Item living in a Fabric workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricItem {
    pub id: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemList {
    #[serde(default)]
    pub value: Vec<FabricItem>,
    #[serde(default)]
    pub continuation_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionPart {
    pub path: String,
    pub payload: String,
    pub payload_type: String,
}

impl DefinitionPart {
    pub fn inline_base64(path: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            payload: payload.into(),
            payload_type: "InlineBase64".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub parts: Vec<DefinitionPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub display_name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<ItemDefinition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateDefinitionRequest {
    pub definition: ItemDefinition,
}

/// State of a Fabric long running operation
#[derive(Debug, Deserialize)]
pub(crate) struct OperationState {
    pub status: String,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}
