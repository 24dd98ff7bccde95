//! Registry trait for looking up action versions from a remote source

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// Trait for the two lookups the version resolver needs from a registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches the tag name of the latest release
    ///
    /// # Arguments
    /// * `name` - The action repository (e.g., "actions/checkout")
    ///
    /// # Returns
    /// * `Ok(String)` - Tag of the latest published release
    /// * `Err(RegistryError::NotFound)` - The repository has no releases
    /// * `Err(RegistryError)` - Any other failure
    async fn fetch_latest_release(&self, name: &str) -> Result<String, RegistryError>;

    /// Fetches the repository tags, newest first
    async fn fetch_tags(&self, name: &str) -> Result<Vec<String>, RegistryError>;
}
