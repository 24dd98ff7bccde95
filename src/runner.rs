//! One complete freshness run: exemptions, discovery, parsing and checking

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::config::{CheckConfig, token_from_env};
use crate::parser::{self, ParseError};
use crate::report;
use crate::version::cache::TtlCache;
use crate::version::checker::ConcurrentChecker;
use crate::version::error::{CheckError, ExemptionError};
use crate::version::exemptions::Exemptions;
use crate::version::registries::GitHubRegistry;
use crate::version::resolver::LatestVersionResolver;
use crate::version::types::CheckReport;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Exemptions(#[from] ExemptionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Check(#[from] CheckError),
}

/// Inputs of a run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Workflow files or directories to scan
    pub paths: Vec<PathBuf>,
    pub config: CheckConfig,
    pub token: Option<String>,
}

impl RunOptions {
    pub fn new(paths: Vec<PathBuf>, config: CheckConfig) -> Self {
        Self {
            paths,
            config,
            token: token_from_env(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

/// Runs a full check and returns the report
///
/// The exemption document is loaded before anything else so a broken file
/// fails the run without touching the network.
pub async fn run(options: &RunOptions) -> Result<CheckReport, RunError> {
    let started = Instant::now();
    let config = &options.config;

    let exemptions = Exemptions::load(&config.exemptions_path)?;

    let files = parser::workflow_files(&options.paths)?;
    info!("Found {} workflow files", files.len());

    let refs = parser::collect_dependencies(&files)?.into_vec();

    let registry = GitHubRegistry::with_timeout(&config.registry.base_url, config.registry.timeout())
        .with_token(options.token.clone());
    let cache = Arc::new(TtlCache::new(config.cache.ttl()));
    let resolver = LatestVersionResolver::new(Arc::new(registry), cache)
        .with_pacing_delay(config.registry.pacing_delay());
    let checker =
        ConcurrentChecker::new(Arc::new(resolver)).with_max_concurrency(config.max_concurrency);

    let report = match config.run_timeout() {
        Some(deadline) => checker.check_with_deadline(&refs, &exemptions, deadline).await?,
        None => checker.check(&refs, &exemptions).await,
    };

    info!(
        "Run finished in {:?}: {}",
        started.elapsed(),
        report::summary(&report)
    );
    Ok(report)
}
