//! Registry test utilities

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use actions_freshness::version::cache::TtlCache;
use actions_freshness::version::checker::ConcurrentChecker;
use actions_freshness::version::error::RegistryError;
use actions_freshness::version::registry::Registry;
use actions_freshness::version::resolver::LatestVersionResolver;
use actions_freshness::version::types::DependencyRef;

/// Deterministic registry that counts calls and tracks peak concurrency
///
/// Actions listed with `with_release` answer from the releases endpoint,
/// everything else answers `v1.0.0`. Each call holds for `delay` so
/// overlapping calls can be observed.
#[derive(Default)]
pub struct CountingRegistry {
    releases: HashMap<String, String>,
    delay: Duration,
    release_calls: AtomicUsize,
    tag_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[allow(dead_code)]
impl CountingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release(mut self, name: &str, version: &str) -> Self {
        self.releases.insert(name.to_string(), version.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }

    pub fn tag_calls(&self) -> usize {
        self.tag_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for CountingRegistry {
    async fn fetch_latest_release(&self, name: &str) -> Result<String, RegistryError> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self
            .releases
            .get(name)
            .cloned()
            .unwrap_or_else(|| "v1.0.0".to_string()))
    }

    async fn fetch_tags(&self, _name: &str) -> Result<Vec<String>, RegistryError> {
        self.tag_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![])
    }
}

/// Builds a checker over `registry` with an empty cache and no pacing delay
#[allow(dead_code)]
pub fn create_test_checker(registry: Arc<dyn Registry>, max_concurrency: usize) -> ConcurrentChecker {
    let cache = Arc::new(TtlCache::new(Duration::from_secs(3600)));
    let resolver = LatestVersionResolver::new(registry, cache).with_pacing_delay(Duration::ZERO);
    ConcurrentChecker::new(Arc::new(resolver)).with_max_concurrency(max_concurrency)
}

/// `n` distinct references `owner/action-{i}@v1.0.0`
#[allow(dead_code)]
pub fn distinct_refs(n: usize) -> Vec<DependencyRef> {
    (0..n)
        .map(|i| DependencyRef::new(format!("owner/action-{i}"), "v1.0.0").with_location("ci.yml"))
        .collect()
}

/// Creates `<tmp>/.github/workflows/<name>` files with the given contents
#[allow(dead_code)]
pub fn create_workflows(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let workflows = dir.path().join(".github/workflows");
    fs::create_dir_all(&workflows).unwrap();
    for (name, content) in files {
        fs::write(workflows.join(name), content).unwrap();
    }
    (dir, workflows)
}
