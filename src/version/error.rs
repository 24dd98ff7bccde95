use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("GitHub API rate limit exceeded. Set GITHUB_TOKEN to increase the limit")]
    RateLimited,

    /// Lookup target does not exist. Drives the release -> tags fallback
    /// and never leaves the resolver.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("GitHub API returned status {status}")]
    Upstream { status: u16 },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("No tags found for {0}")]
    NoTagsFound(String),
}

/// Errors raised while loading the exemption document
#[derive(Debug, Error)]
pub enum ExemptionError {
    #[error("Failed to read exemptions file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid exemptions file {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Version check did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}
