use crate::application::dto::GraphDescription;
use crate::shared::Result;
use std::path::Path;

/// GraphReader port for loading a materialized graph description
///
/// This port abstracts where the node/edge list comes from, so the use case
/// never touches the file system directly.
pub trait GraphReader {
    /// Reads and deserializes the graph description at `path`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The content is not a valid graph description
    fn read_graph(&self, path: &Path) -> Result<GraphDescription>;
}
