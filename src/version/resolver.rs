//! Latest version resolution with caching and release -> tags fallback
//!
//! A lookup first consults the shared [`TtlCache`]. On a miss it waits a fixed
//! pacing delay, asks the registry, and stores the answer before returning it.
//! Repositories without releases fall back to their most recent tag.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::config::FETCH_PACING_DELAY_MS;
use crate::version::cache::TtlCache;
use crate::version::error::RegistryError;
use crate::version::registry::Registry;

/// Registry lookup used to answer "what is the latest version"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    LatestRelease,
    Tags,
}

impl Endpoint {
    fn cache_prefix(self) -> &'static str {
        match self {
            Endpoint::LatestRelease => "release:",
            Endpoint::Tags => "tags:",
        }
    }

    fn cache_key(self, name: &str) -> String {
        format!("{}{}", self.cache_prefix(), name)
    }
}

/// Resolves the latest version of an action through a cache-backed registry
pub struct LatestVersionResolver {
    registry: Arc<dyn Registry>,
    cache: Arc<TtlCache<String, String>>,
    pacing_delay: Duration,
}

impl LatestVersionResolver {
    pub fn new(registry: Arc<dyn Registry>, cache: Arc<TtlCache<String, String>>) -> Self {
        Self {
            registry,
            cache,
            pacing_delay: Duration::from_millis(FETCH_PACING_DELAY_MS),
        }
    }

    /// Sets the delay applied before every uncached registry request
    pub fn with_pacing_delay(mut self, pacing_delay: Duration) -> Self {
        self.pacing_delay = pacing_delay;
        self
    }

    pub fn cache(&self) -> &Arc<TtlCache<String, String>> {
        &self.cache
    }

    /// Returns the latest release tag of `name`, or its newest tag if it has no releases
    pub async fn resolve_latest(&self, name: &str) -> Result<String, RegistryError> {
        match self.lookup(Endpoint::LatestRelease, name).await {
            Err(RegistryError::NotFound(_)) => {
                debug!("No releases for {}, falling back to tags", name);
                self.lookup(Endpoint::Tags, name)
                    .await
                    .map_err(|e| match e {
                        RegistryError::NotFound(_) => RegistryError::Upstream { status: 404 },
                        other => other,
                    })
            }
            result => result,
        }
    }

    async fn lookup(&self, endpoint: Endpoint, name: &str) -> Result<String, RegistryError> {
        let key = endpoint.cache_key(name);

        if let Some(version) = self.cache.get(&key) {
            debug!("Cache hit for {}: {}", key, version);
            return Ok(version);
        }

        if !self.pacing_delay.is_zero() {
            sleep(self.pacing_delay).await;
        }

        let version = match endpoint {
            Endpoint::LatestRelease => self.registry.fetch_latest_release(name).await?,
            Endpoint::Tags => self
                .registry
                .fetch_tags(name)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| RegistryError::NoTagsFound(name.to_string()))?,
        };

        debug!("Resolved {}: {}", key, version);
        self.cache.insert(key, version.clone());
        Ok(version)
    }
}
