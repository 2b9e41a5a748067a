use crate::application::dto::ResolveResponse;
use crate::dependency_resolution::domain::{DependencyReference, NodeId};
use crate::ports::outbound::ReferenceFormatter;
use crate::shared::Result;

/// Markdown table header for reference information
const TABLE_HEADER: &str = "| # | Kind | Reference | Platforms | Details |\n";

/// Markdown table separator line
const TABLE_SEPARATOR: &str = "|---|------|-----------|-----------|---------|\n";

/// MarkdownFormatter adapter for human-readable reference listings
///
/// Emits one section per target with a table of its references, in the
/// order they were resolved.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn platforms_cell(reference: &DependencyReference) -> String {
        match reference.platform_filters() {
            None => "-".to_string(),
            Some(filters) => match filters.platforms() {
                None => "all".to_string(),
                Some(platforms) if platforms.is_empty() => "none".to_string(),
                Some(platforms) => platforms
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            },
        }
    }

    fn details_cell(reference: &DependencyReference) -> String {
        match reference {
            DependencyReference::Sdk { status, source, .. } => {
                format!("{}, {}", Self::lowercase_debug(status), Self::lowercase_debug(source))
            }
            _ => String::new(),
        }
    }

    fn lowercase_debug(value: &impl std::fmt::Debug) -> String {
        format!("{:?}", value).to_lowercase()
    }

    fn render_target(output: &mut String, target: &NodeId, references: &[DependencyReference]) {
        output.push_str(&format!(
            "## {}\n\n",
            Self::escape_markdown_table_cell(target.as_str())
        ));

        if references.is_empty() {
            output.push_str("_No dependency references._\n\n");
            return;
        }

        output.push_str(TABLE_HEADER);
        output.push_str(TABLE_SEPARATOR);
        for (index, reference) in references.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                index + 1,
                reference.kind(),
                Self::escape_markdown_table_cell(&reference.display_name()),
                Self::platforms_cell(reference),
                Self::details_cell(reference),
            ));
        }
        output.push('\n');
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceFormatter for MarkdownFormatter {
    fn format(&self, response: &ResolveResponse) -> Result<String> {
        let mut output = String::from("# Dependency References\n\n");
        output.push_str(&format!(
            "Graph: {} node(s), {} edge(s). Targets: {}. References: {}.\n\n",
            response.graph.nodes,
            response.graph.edges,
            response.target_count(),
            response.reference_count()
        ));

        for (target, references) in &response.targets {
            Self::render_target(&mut output, target, references);
        }

        Ok(output)
    }
}
