use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::dependency_resolution::domain::NodeId;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - references computed (or graph validated with --check)
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (file I/O error, parse error, config error, etc.)
    ApplicationError = 3,
    /// The graph itself is structurally broken (cycle, dangling edge, bad node)
    GraphError = 4,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Picks the exit code for an error that reached `main`.
    ///
    /// Any `GraphError` in the chain wins over the generic application code.
    pub fn for_error(error: &anyhow::Error) -> Self {
        if error.chain().any(|cause| cause.is::<GraphError>()) {
            ExitCode::GraphError
        } else {
            ExitCode::ApplicationError
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
            ExitCode::GraphError => write!(f, "Graph Error (4)"),
        }
    }
}

/// Structural errors raised by the dependency graph core.
///
/// All of them are fatal for the target (or graph) that triggered them;
/// the core never returns a partial reference list alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The graph contains a cycle. `path` starts and ends with the same node.
    #[error("Dependency cycle detected: {}", format_cycle(.path))]
    Cycle { path: Vec<NodeId> },

    /// A node id was requested (or referenced) that the graph does not contain.
    #[error("Node not found in dependency graph: {id}")]
    MissingNode { id: NodeId },

    /// The node/edge records handed to the graph builder are malformed.
    #[error("Invalid dependency graph input: {reason}")]
    InvalidInput { reason: String },

    /// Traversal was cancelled cooperatively.
    #[error("Dependency traversal cancelled")]
    Cancelled,
}

impl GraphError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        GraphError::InvalidInput {
            reason: reason.into(),
        }
    }
}

fn format_cycle(path: &[NodeId]) -> String {
    path.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Application-specific errors for reading graphs and writing references.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Graph description not found: {path}\n\n💡 Hint: {suggestion}")]
    GraphFileNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse graph description: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file is a JSON or TOML node/edge list")]
    GraphParseError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid graph path: {path}\nReason: {reason}\n\n💡 Hint: Please specify an existing graph description file with --graph")]
    InvalidGraphPath { path: PathBuf, reason: String },

    /// Validation error for builder patterns
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}
