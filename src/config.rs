use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::constants;
use crate::auth::Credentials;
use crate::loader::TableMapping;
use crate::publish::DEFAULT_ITEM_TYPES;

pub const ENV_TENANT_ID: &str = "FABRIC_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "FABRIC_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "FABRIC_CLIENT_SECRET";
pub const ENV_WORKSPACE_ID: &str = "FABRIC_WORKSPACE_ID";
pub const ENV_CLOUD_CONNECTION_ID: &str = "FABRIC_CLOUD_CONNECTION_ID";
pub const ENV_IS_ONLY_UPDATE: &str = "IS_ONLY_UPDATE";
pub const ENV_TARGET_ENVIRONMENT: &str = "TARGET_ENVIRONMENT_NAME";

/// Settings file looked up in the working directory when `--config` is not given
pub const DEFAULT_SETTINGS_FILE: &str = "fabric-deploy.toml";

/// Look up a required variable. Empty values are treated the same as unset ones.
fn require_var(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => anyhow::bail!("missing required environment variable {}", name),
    }
}

/// Load variables from an explicit `.env` style file into the process environment
pub fn load_env_file(path: &Path) -> Result<()> {
    info!("Loading environment from file: {}", path.display());

    if !path.exists() {
        anyhow::bail!("Environment file not found: {}", path.display());
    }

    dotenvy::from_path(path)
        .with_context(|| format!("Failed to load environment file '{}'", path.display()))?;
    Ok(())
}

/// `IS_ONLY_UPDATE` is compared literally: ownership take-over only runs when the
/// value is exactly `"False"`, any other value (or none) means binding only.
pub fn parse_only_update(value: Option<&str>) -> bool {
    value != Some("False")
}

/// Everything the dataset rebinder needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct RebindConfig {
    pub credentials: Credentials,
    pub workspace_id: String,
    pub cloud_connection_id: String,
    pub only_update: bool,
}

impl RebindConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let credentials = Credentials {
            tenant_id: require_var(&lookup, ENV_TENANT_ID)?,
            client_id: require_var(&lookup, ENV_CLIENT_ID)?,
            client_secret: require_var(&lookup, ENV_CLIENT_SECRET)?,
        };
        let workspace_id = require_var(&lookup, ENV_WORKSPACE_ID)?;
        let cloud_connection_id = require_var(&lookup, ENV_CLOUD_CONNECTION_ID)?;
        let only_update = parse_only_update(lookup(ENV_IS_ONLY_UPDATE).as_deref());

        debug!(
            "Rebind config: workspace={}, connection={}, only_update={}",
            workspace_id, cloud_connection_id, only_update
        );

        Ok(Self {
            credentials,
            workspace_id,
            cloud_connection_id,
            only_update,
        })
    }
}

/// Everything the artifact publisher needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub credentials: Credentials,
    pub workspace_id: String,
    pub environment: String,
}

impl PublishConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let credentials = Credentials {
            tenant_id: require_var(&lookup, ENV_TENANT_ID)?,
            client_id: require_var(&lookup, ENV_CLIENT_ID)?,
            client_secret: require_var(&lookup, ENV_CLIENT_SECRET)?,
        };

        Ok(Self {
            credentials,
            workspace_id: require_var(&lookup, ENV_WORKSPACE_ID)?,
            environment: require_var(&lookup, ENV_TARGET_ENVIRONMENT)?,
        })
    }
}

/// Non-secret settings, optionally read from `fabric-deploy.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub publish: PublishSettings,
    #[serde(default)]
    pub loader: LoaderSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_login_base")]
    pub login_base: String,
    #[serde(default = "default_powerbi_base")]
    pub powerbi_base: String,
    #[serde(default = "default_fabric_base")]
    pub fabric_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_login_base() -> String {
    constants::DEFAULT_LOGIN_BASE.to_string()
}

fn default_powerbi_base() -> String {
    constants::DEFAULT_POWERBI_BASE.to_string()
}

fn default_fabric_base() -> String {
    constants::DEFAULT_FABRIC_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            login_base: default_login_base(),
            powerbi_base: default_powerbi_base(),
            fabric_base: default_fabric_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSettings {
    #[serde(default = "default_repository_directory")]
    pub repository_directory: PathBuf,
    #[serde(default = "default_item_types")]
    pub item_types: Vec<String>,
}

fn default_repository_directory() -> PathBuf {
    PathBuf::from("./fabric-artifacts")
}

fn default_item_types() -> Vec<String> {
    DEFAULT_ITEM_TYPES.iter().map(|t| t.to_string()).collect()
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            repository_directory: default_repository_directory(),
            item_types: default_item_types(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSettings {
    #[serde(default = "default_loader_root")]
    pub root: PathBuf,
    #[serde(default = "default_catalog_path")]
    pub catalog: PathBuf,
    #[serde(default = "crate::loader::default_table_mappings")]
    pub tables: Vec<TableMapping>,
}

fn default_loader_root() -> PathBuf {
    PathBuf::from("lakehouse")
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("lakehouse/catalog.db")
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            root: default_loader_root(),
            catalog: default_catalog_path(),
            tables: crate::loader::default_table_mappings(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from `fabric-deploy.toml` in the working
    /// directory when no path is given. Only an explicit path is required to exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings_path = match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Settings file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_SETTINGS_FILE);
                if !default_path.exists() {
                    debug!("No {} found, using default settings", DEFAULT_SETTINGS_FILE);
                    return Ok(Self::default());
                }
                default_path
            }
        };

        debug!("Loading settings from: {:?}", settings_path);
        let content = fs::read_to_string(&settings_path)
            .with_context(|| format!("Failed to read settings file: {:?}", settings_path))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", settings_path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }
}
