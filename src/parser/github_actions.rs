//! GitHub Actions workflow file parser

use crate::parser::discovery::is_workflow_file;
use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{ActionUse, is_commit_hash};
use tracing::warn;

/// Parser for GitHub Actions workflow files (.github/workflows/*.yml)
pub struct GitHubActionsParser;

impl GitHubActionsParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GitHubActionsParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for GitHubActionsParser {
    fn can_parse(&self, path: &str) -> bool {
        is_workflow_file(path)
    }

    fn parse(&self, content: &str) -> Result<Vec<ActionUse>, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_yaml::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set YAML language for tree-sitter: {}", e);
            ParseError::TreeSitter(e.to_string())
        })?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            warn!("Failed to parse YAML content");
            ParseError::ParseFailed("Failed to parse YAML".to_string())
        })?;

        let root = tree.root_node();
        let mut results = Vec::new();

        self.find_uses_nodes(root, content, &mut results);

        Ok(results)
    }
}

impl GitHubActionsParser {
    /// Find all 'uses' keys, both in steps and on reusable-workflow jobs
    ///
    /// YAML tree structure for a workflow step:
    /// ```text
    /// block_mapping_pair          <- "steps: ..."
    ///   flow_node                 <- key: "steps"
    ///   block_node
    ///     block_sequence
    ///       block_sequence_item   <- "- uses: ..."
    ///         block_node
    ///           block_mapping
    ///             block_mapping_pair    <- TARGET: "uses: actions/checkout@v4"
    ///               flow_node           <- key: "uses"
    ///               flow_node           <- value: "actions/checkout@v4"
    /// ```
    ///
    /// A job calling a reusable workflow carries the same pair directly under
    /// the job mapping.
    fn find_uses_nodes(&self, node: tree_sitter::Node, content: &str, results: &mut Vec<ActionUse>) {
        if node.kind() == "block_mapping_pair"
            && let Some(key_node) = node.child_by_field_name("key")
            && self.get_node_text(key_node, content) == "uses"
            && let Some(value_node) = node.child_by_field_name("value")
        {
            let value_text = self.get_node_text(value_node, content);
            if let Some(action) = self.parse_uses_value(&value_text, value_node, content) {
                results.push(action);
            }
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.find_uses_nodes(child, content, results);
        }
    }

    /// Get text content of a node, removing quotes if present
    fn get_node_text(&self, node: tree_sitter::Node, content: &str) -> String {
        let text = &content[node.byte_range()];
        text.trim()
            .trim_start_matches('"')
            .trim_end_matches('"')
            .trim_start_matches('\'')
            .trim_end_matches('\'')
            .to_string()
    }

    /// Parse a 'uses' value into an ActionUse
    ///
    /// # Arguments
    /// * `value` - The uses value text with quotes removed
    ///   - `"actions/checkout@v4"`
    ///   - `"actions/checkout@8e5e7e5ab8b370d6c329ec480221332ada57f0ab"`
    ///   - `"actions/aws/ec2@v1"`
    ///   - `"org/repo/.github/workflows/build.yml@v2"`
    /// * `node` - The tree-sitter node holding the value
    /// * `content` - The raw YAML content for position calculation
    ///
    /// # Returns
    /// * `Some(ActionUse)` - name="owner/repo" and the referenced version
    /// * `None` - Local actions, docker images, or values without `@`
    fn parse_uses_value(
        &self,
        value: &str,
        node: tree_sitter::Node,
        content: &str,
    ) -> Option<ActionUse> {
        if value.starts_with("./") || value.starts_with("docker://") {
            return None;
        }

        let at_pos = value.find('@')?;
        let (repo_part, version) = value.split_at(at_pos);
        let version = &version[1..];

        // owner/repo, ignoring subdirectories like actions/aws/ec2
        let mut parts = repo_part.split('/');
        let owner = parts.next().filter(|s| !s.is_empty())?;
        let repo = parts.next().filter(|s| !s.is_empty())?;
        let name = format!("{}/{}", owner, repo);

        let start_offset = node.start_byte();
        let start_point = node.start_position();
        let raw_value = &content[node.byte_range()];
        let column = start_point.column + raw_value.find('@').map_or(0, |p| p + 1);

        // Pinned commits usually name their tag in a trailing comment.
        let pinned_tag = if is_commit_hash(version) {
            let line_start = content[..start_offset].rfind('\n').map_or(0, |p| p + 1);
            let line_end = content[start_offset..]
                .find('\n')
                .map_or(content.len(), |p| start_offset + p);
            let line_text = &content[line_start..line_end];

            line_text
                .find('#')
                .and_then(|p| line_text[p + 1..].split_whitespace().next())
                .map(str::to_string)
        } else {
            None
        };

        Some(ActionUse {
            name,
            version: version.to_string(),
            pinned_tag,
            line: start_point.row,
            column,
        })
    }
}
