use crate::application::dto::GraphDescription;
use crate::ports::outbound::GraphReader;
use crate::shared::error::AppError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use std::path::Path;
use tracing::debug;

/// Serialization of a graph description file, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DescriptionFormat {
    Json,
    Toml,
}

impl DescriptionFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(DescriptionFormat::Json),
            "toml" => Some(DescriptionFormat::Toml),
            _ => None,
        }
    }
}

/// FileSystemReader adapter for reading graph descriptions from disk
///
/// This adapter implements the GraphReader port. `.json` files are parsed
/// with serde_json, `.toml` files with toml.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphReader for FileSystemReader {
    fn read_graph(&self, path: &Path) -> Result<GraphDescription> {
        if !path.exists() {
            return Err(AppError::GraphFileNotFound {
                path: path.to_path_buf(),
                suggestion: "Please check the path given with --graph. The file must be a \
                             materialized node/edge list (.json or .toml)."
                    .to_string(),
            }
            .into());
        }

        let format = DescriptionFormat::from_path(path).ok_or_else(|| AppError::InvalidGraphPath {
            path: path.to_path_buf(),
            reason: "Unsupported file extension (expected .json or .toml)".to_string(),
        })?;

        // Read content with security checks; security violations pass through as-is
        let content = read_regular_file(path, "graph description").map_err(|e| {
            if e.is::<AppError>() {
                e
            } else {
                AppError::FileReadError {
                    path: path.to_path_buf(),
                    details: e.to_string(),
                }
                .into()
            }
        })?;

        let parsed = match format {
            DescriptionFormat::Json => {
                serde_json::from_str::<GraphDescription>(&content).map_err(|e| e.to_string())
            }
            DescriptionFormat::Toml => {
                toml::from_str::<GraphDescription>(&content).map_err(|e| e.to_string())
            }
        };

        let description = parsed.map_err(|details| AppError::GraphParseError {
            path: path.to_path_buf(),
            details,
        })?;

        debug!(
            path = %path.display(),
            nodes = description.node_count(),
            edges = description.edge_count(),
            "Read graph description"
        );
        Ok(description)
    }
}
