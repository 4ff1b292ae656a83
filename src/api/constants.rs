//! Endpoints, scopes and headers for the Microsoft identity, Power BI and Fabric REST APIs

/// Microsoft identity platform authority
pub const DEFAULT_LOGIN_BASE: &str = "https://login.microsoftonline.com";

/// Power BI REST API host
pub const DEFAULT_POWERBI_BASE: &str = "https://api.powerbi.com";

/// Fabric REST API host
pub const DEFAULT_FABRIC_BASE: &str = "https://api.fabric.microsoft.com";

/// Scope requested for Power BI dataset operations
pub const POWERBI_SCOPE: &str = "https://analysis.windows.net/powerbi/api/.default";

/// Scope requested for Fabric item operations
pub const FABRIC_SCOPE: &str = "https://api.fabric.microsoft.com/.default";

/// Power BI API path prefix for the caller's organization
pub const POWERBI_API_PATH: &str = "/v1.0/myorg";

/// Fabric API version path
pub const FABRIC_API_PATH: &str = "/v1";

pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// Correlation id header understood by Power BI and Fabric
    pub const CLIENT_REQUEST_ID: &str = "x-ms-client-request-id";
}

fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// OAuth2 v2.0 token endpoint for a tenant
pub fn token_endpoint(login_base: &str, tenant_id: &str) -> String {
    format!("{}/{}/oauth2/v2.0/token", trim_base(login_base), segment(tenant_id))
}

/// Dataset collection of a workspace (Power BI calls workspaces "groups")
pub fn datasets_endpoint(powerbi_base: &str, workspace_id: &str) -> String {
    format!(
        "{}{}/groups/{}/datasets",
        trim_base(powerbi_base),
        POWERBI_API_PATH,
        segment(workspace_id)
    )
}

pub fn take_over_endpoint(powerbi_base: &str, workspace_id: &str, dataset_id: &str) -> String {
    format!(
        "{}/{}/Default.TakeOver",
        datasets_endpoint(powerbi_base, workspace_id),
        segment(dataset_id)
    )
}

pub fn bind_to_gateway_endpoint(powerbi_base: &str, workspace_id: &str, dataset_id: &str) -> String {
    format!(
        "{}/{}/Default.BindToGateway",
        datasets_endpoint(powerbi_base, workspace_id),
        segment(dataset_id)
    )
}

/// Item collection of a Fabric workspace
pub fn items_endpoint(fabric_base: &str, workspace_id: &str) -> String {
    format!(
        "{}{}/workspaces/{}/items",
        trim_base(fabric_base),
        FABRIC_API_PATH,
        segment(workspace_id)
    )
}

pub fn item_endpoint(fabric_base: &str, workspace_id: &str, item_id: &str) -> String {
    format!("{}/{}", items_endpoint(fabric_base, workspace_id), segment(item_id))
}

pub fn update_definition_endpoint(fabric_base: &str, workspace_id: &str, item_id: &str) -> String {
    format!(
        "{}/updateDefinition?updateMetadata=True",
        item_endpoint(fabric_base, workspace_id, item_id)
    )
}
