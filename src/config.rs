//! Configuration file support for graph-refs.
//!
//! Provides YAML-based configuration through `graph-refs.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use graph_refs::application::dto::OutputFormat;
use graph_refs::shared::security::read_regular_file;
use graph_refs::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "graph-refs.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<OutputFormat>,
    pub targets: Option<Vec<String>>,
    pub jobs: Option<usize>,
    pub share_cache: Option<bool>,
    pub max_depth: Option<usize>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: BTreeMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    // Same checks as the graph file: no symlinks, regular file, size limit
    let content = read_regular_file(path, "config file").with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Directory searched for the config file: the graph file's directory.
pub fn config_dir_for(graph_path: &Path) -> PathBuf {
    match graph_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.jobs == Some(0) {
        bail!(
            "Invalid config: jobs must be at least 1.\n\n\
             💡 Hint: Remove 'jobs' to use the default, or set it to a positive number."
        );
    }
    if config.max_depth == Some(0) {
        bail!(
            "Invalid config: max_depth must be at least 1.\n\n\
             💡 Hint: Remove 'max_depth' to allow dependency chains of any length."
        );
    }
    if let Some(ref targets) = config.targets {
        for (i, target) in targets.iter().enumerate() {
            if target.trim().is_empty() {
                bail!(
                    "Invalid config: targets[{}] must not be empty.\n\n\
                     💡 Hint: Each entry must be a target node id from the graph (e.g., \"App\").",
                    i
                );
            }
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
