//! Common types for parsers

/// A `uses:` reference found in a workflow file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionUse {
    /// Repository of the action (e.g., "actions/checkout")
    pub name: String,
    /// Version exactly as written after `@`, a commit hash included
    pub version: String,
    /// Tag named in the trailing comment of a commit-pinned reference
    pub pinned_tag: Option<String>,
    /// Line number (0-indexed)
    pub line: usize,
    /// Column of the version string (0-indexed)
    pub column: usize,
}

impl ActionUse {
    pub fn is_pinned_to_commit(&self) -> bool {
        is_commit_hash(&self.version)
    }

    /// `path:line:column` of the version, 1-indexed
    pub fn location(&self, path: &str) -> String {
        format!("{}:{}:{}", path, self.line + 1, self.column + 1)
    }
}

/// Full 40 character hex commit SHA
pub fn is_commit_hash(version: &str) -> bool {
    version.len() == 40 && version.chars().all(|c| c.is_ascii_hexdigit())
}
