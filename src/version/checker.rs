//! Concurrent freshness check over a set of dependency references

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::DEFAULT_MAX_CONCURRENCY;
use crate::version::error::CheckError;
use crate::version::exemptions::Exemptions;
use crate::version::policy::is_outdated;
use crate::version::resolver::LatestVersionResolver;
use crate::version::types::{CheckReport, CheckResult, DependencyRef};

/// Fans out one check per dependency reference and collects the outcomes
///
/// Each unit consults the exemptions first and only then the resolver, so
/// exempted references never reach the network. At most `max_concurrency`
/// units are in flight at once.
pub struct ConcurrentChecker {
    resolver: Arc<LatestVersionResolver>,
    max_concurrency: usize,
}

impl ConcurrentChecker {
    pub fn new(resolver: Arc<LatestVersionResolver>) -> Self {
        Self {
            resolver,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Sets the number of concurrently running checks (at least 1)
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Checks every reference and returns once each has produced exactly one result
    ///
    /// `refs` must already be deduplicated by `name@version`. Results within
    /// each list appear in completion order.
    pub async fn check(&self, refs: &[DependencyRef], exemptions: &Exemptions) -> CheckReport {
        info!("Checking {} unique actions for updates", refs.len());

        let mut results = stream::iter(refs)
            .map(|dependency| self.check_one(dependency, exemptions))
            .buffer_unordered(self.max_concurrency);

        let mut report = CheckReport::default();
        while let Some(result) = results.next().await {
            report.record(result);
        }

        info!(
            "Checked {} actions: {} outdated, {} exempted, {} failed",
            report.total(),
            report.outdated.len(),
            report.exempted.len(),
            report.failed.len()
        );
        report
    }

    /// Like [`ConcurrentChecker::check`], but gives up after `deadline`
    ///
    /// Outstanding checks are cancelled and partial results discarded.
    pub async fn check_with_deadline(
        &self,
        refs: &[DependencyRef],
        exemptions: &Exemptions,
        deadline: Duration,
    ) -> Result<CheckReport, CheckError> {
        tokio::time::timeout(deadline, self.check(refs, exemptions))
            .await
            .map_err(|_| {
                warn!("Version check cancelled after {:?}", deadline);
                CheckError::DeadlineExceeded(deadline)
            })
    }

    async fn check_one(&self, dependency: &DependencyRef, exemptions: &Exemptions) -> CheckResult {
        if let Some(rule) = exemptions.matching(&dependency.name, &dependency.current_version) {
            debug!("{} is exempted: {}", dependency.key(), rule.reason);
            return CheckResult::Exempted {
                dependency: dependency.clone(),
                reason: rule.reason.clone(),
            };
        }

        match self.resolver.resolve_latest(&dependency.name).await {
            Err(error) => {
                warn!("Failed to check {}: {}", dependency.key(), error);
                CheckResult::Failed {
                    dependency: dependency.clone(),
                    error,
                }
            }
            Ok(latest_version) if is_outdated(&dependency.current_version, &latest_version) => {
                debug!("{} is outdated, latest is {}", dependency.key(), latest_version);
                CheckResult::Outdated {
                    dependency: dependency.clone(),
                    latest_version,
                }
            }
            Ok(_) => CheckResult::UpToDate {
                dependency: dependency.clone(),
            },
        }
    }
}
