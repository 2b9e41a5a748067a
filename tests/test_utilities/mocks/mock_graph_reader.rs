use graph_refs::prelude::*;
use std::path::Path;

/// Mock GraphReader that parses an in-memory JSON description
pub struct MockGraphReader {
    content: String,
    should_fail: bool,
}

impl MockGraphReader {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            should_fail: false,
        }
    }

    pub fn with_failure() -> Self {
        Self {
            content: String::new(),
            should_fail: true,
        }
    }
}

impl GraphReader for MockGraphReader {
    fn read_graph(&self, path: &Path) -> Result<GraphDescription> {
        if self.should_fail {
            anyhow::bail!("Mock failure reading {}", path.display());
        }
        Ok(serde_json::from_str(&self.content)?)
    }
}
