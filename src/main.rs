use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use actions_freshness::config::{self, CheckConfig, DEFAULT_WORKFLOWS_DIR};
use actions_freshness::runner::{self, RunOptions};
use actions_freshness::{logging, report};

#[derive(Parser)]
#[command(name = "actions-freshness")]
#[command(
    version,
    about = "Checks GitHub Actions used in workflow files against their latest releases"
)]
struct Cli {
    /// Workflow files or directories to scan
    #[arg(default_value = DEFAULT_WORKFLOWS_DIR)]
    paths: Vec<PathBuf>,

    /// Exemption document listing allowed older versions
    #[arg(long)]
    exemptions: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of concurrent checks
    #[arg(long)]
    concurrency: Option<usize>,

    /// Give up on the whole run after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Base URL of the GitHub REST API
    #[arg(long, value_name = "URL")]
    github_api_url: Option<String>,

    /// Write JSON logs to a file instead of stderr
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_file(&self) -> Option<PathBuf> {
        self.log_file
            .as_ref()
            .map(|path| path.clone().unwrap_or_else(config::log_path))
    }

    /// File values first, then command line overrides
    fn check_config(&self) -> anyhow::Result<CheckConfig> {
        let mut config = match &self.config {
            Some(path) => CheckConfig::load(path)?,
            None => CheckConfig::default(),
        };
        if let Some(path) = &self.exemptions {
            config.exemptions_path = path.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.run_timeout_secs = Some(timeout);
        }
        if let Some(url) = &self.github_api_url {
            config.registry.base_url = url.clone();
        }
        Ok(config)
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = cli.check_config()?;
    let options = RunOptions::new(cli.paths, config);

    let report = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(runner::run(&options))
        .context("Failed to check GitHub Actions versions")?;

    eprint!("{}", report::render(&report));
    Ok(report.has_outdated())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::init(cli.verbose, cli.log_file().as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    match run(cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
