//! Parser trait definition

use std::path::PathBuf;

use crate::parser::types::ActionUse;

/// Trait for parsing workflow files
pub trait Parser {
    /// Check if this parser can handle the given path
    fn can_parse(&self, path: &str) -> bool;

    /// Parse the content and extract action references
    fn parse(&self, content: &str) -> Result<Vec<ActionUse>, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read a workflow file or directory
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the file structure
    #[error("Failed to parse file: {0}")]
    ParseFailed(String),

    /// Tree-sitter related error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}
