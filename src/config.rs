use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default lifetime of a resolved "latest version" in the cache (1 hour)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;

/// Timeout for a single registry request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Delay before each uncached registry request to stay clear of rate limits (100ms)
pub const FETCH_PACING_DELAY_MS: u64 = 100;

/// Default number of dependency checks allowed in flight at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

// =============================================================================
// Locations
// =============================================================================

/// Default base URL for the GitHub REST API
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Environment variable holding an optional GitHub bearer token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Directory scanned when no paths are given on the command line
pub const DEFAULT_WORKFLOWS_DIR: &str = ".github/workflows";

/// Exemption document read when `--exemptions` is not given
pub const DEFAULT_EXEMPTIONS_PATH: &str = ".github/workflows-outdated-action-exemptions.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level configuration, read from an optional JSON file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckConfig {
    pub cache: CacheConfig,
    pub registry: RegistryConfig,
    /// Upper bound on concurrently running dependency checks
    pub max_concurrency: usize,
    /// Optional deadline for the whole run, in seconds
    pub run_timeout_secs: Option<u64>,
    pub exemptions_path: PathBuf,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            registry: RegistryConfig::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            run_timeout_secs: None,
            exemptions_path: PathBuf::from(DEFAULT_EXEMPTIONS_PATH),
        }
    }
}

impl CheckConfig {
    /// Reads the configuration file at `path`
    ///
    /// Fields missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Registry connection configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub pacing_delay_ms: u64,
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GITHUB_API_URL.to_string(),
            timeout_ms: FETCH_TIMEOUT_MS,
            pacing_delay_ms: FETCH_PACING_DELAY_MS,
        }
    }
}

/// Returns the GitHub token from the environment, if one is set
pub fn token_from_env() -> Option<String> {
    token_from_value(std::env::var(GITHUB_TOKEN_ENV).ok())
}

fn token_from_value(value: Option<String>) -> Option<String> {
    value
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Returns the path to the data directory for actions-freshness.
/// Uses $XDG_DATA_HOME/actions-freshness if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/actions-freshness,
/// or ./actions-freshness if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("actions-freshness.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("actions-freshness")
}
