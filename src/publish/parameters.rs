//! Per-environment find/replace from `parameter.yml`
//!
//! ```yaml
//! find_replace:
//!   - find_value: "70756d4f-7bef-4b01-a1d5-d8e1ed09db26"
//!     replace_value:
//!       PPE: "81ab..."
//!       PROD: "92cd..."
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const PARAMETER_FILE: &str = "parameter.yml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterFile {
    #[serde(default)]
    pub find_replace: Vec<FindReplace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindReplace {
    pub find_value: String,
    #[serde(default)]
    pub replace_value: HashMap<String, String>,
}

impl ParameterFile {
    /// Load `parameter.yml` from the repository root; a missing file means no replacements
    pub fn load(repository_directory: &Path) -> Result<Self> {
        let path = repository_directory.join(PARAMETER_FILE);
        if !path.is_file() {
            log::debug!("No {} in {}", PARAMETER_FILE, repository_directory.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply every replacement that has a value for `environment`
    pub fn apply(&self, environment: &str, text: &str) -> String {
        self.find_replace
            .iter()
            .filter(|entry| !entry.find_value.is_empty())
            .fold(text.to_string(), |acc, entry| match entry.replace_value.get(environment) {
                Some(replacement) => acc.replace(&entry.find_value, replacement),
                None => acc,
            })
    }

    pub fn is_empty(&self) -> bool {
        self.find_replace.is_empty()
    }
}
