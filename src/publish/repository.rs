//! Local item folders under the repository directory
//!
//! An item folder is named `<displayName>.<ItemType>`, e.g. `nb_process_data.Notebook`.
//! A `.platform` file inside it, when present, is authoritative for name and type.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

pub const PLATFORM_FILE: &str = ".platform";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalItem {
    pub display_name: String,
    pub item_type: String,
    /// Files relative to the item folder with `/` separators, sorted by path
    pub files: Vec<ItemFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFile {
    pub path: String,
    pub contents: Vec<u8>,
}

impl LocalItem {
    pub fn key(&self) -> (&str, &str) {
        (&self.item_type, &self.display_name)
    }
}

#[derive(Debug, Deserialize)]
struct PlatformFile {
    metadata: PlatformMetadata,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlatformMetadata {
    #[serde(rename = "type")]
    item_type: String,
    display_name: String,
}

/// Find every in-scope item folder below `root`
pub fn scan_repository(root: &Path, item_types: &[String]) -> Result<Vec<LocalItem>> {
    if !root.is_dir() {
        anyhow::bail!("Repository directory not found: {}", root.display());
    }

    let mut items = Vec::new();
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name().into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let Some((display_name, item_type)) = identify_item(entry.path(), item_types)? else {
            continue;
        };
        // Nested folders belong to the item's definition
        walker.skip_current_dir();

        if !item_types.iter().any(|t| t == &item_type) {
            log::debug!("Skipping out of scope {} '{}'", item_type, display_name);
            continue;
        }

        let files = read_item_files(entry.path())?;
        log::debug!(
            "Found {} '{}' with {} files",
            item_type,
            display_name,
            files.len()
        );
        items.push(LocalItem {
            display_name,
            item_type,
            files,
        });
    }

    Ok(items)
}

/// Name and type of an item folder, or `None` for ordinary directories
fn identify_item(dir: &Path, item_types: &[String]) -> Result<Option<(String, String)>> {
    let platform_path = dir.join(PLATFORM_FILE);
    if platform_path.is_file() {
        let content = fs::read_to_string(&platform_path)
            .with_context(|| format!("Failed to read {}", platform_path.display()))?;
        let platform: PlatformFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", platform_path.display()))?;
        return Ok(Some((
            platform.metadata.display_name,
            platform.metadata.item_type,
        )));
    }

    let Some(folder) = dir.file_name().and_then(|n| n.to_str()) else {
        return Ok(None);
    };
    match folder.rsplit_once('.') {
        Some((name, suffix)) if !name.is_empty() && item_types.iter().any(|t| t == suffix) => {
            Ok(Some((name.to_string(), suffix.to_string())))
        }
        _ => Ok(None),
    }
}

fn read_item_files(item_dir: &Path) -> Result<Vec<ItemFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(item_dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", item_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(item_dir)
            .with_context(|| format!("{} is outside {}", entry.path().display(), item_dir.display()))?;
        let path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let contents = fs::read(entry.path())
            .with_context(|| format!("Failed to read {}", entry.path().display()))?;

        files.push(ItemFile { path, contents });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
