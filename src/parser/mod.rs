//! Parser layer
//! - traits.rs: Parser trait definition
//! - types.rs: Common types (ActionUse)
//! - discovery.rs: Workflow file discovery
//! - github_actions.rs: GitHub Actions workflow parser

pub mod discovery;
pub mod github_actions;
pub mod traits;
pub mod types;

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::version::types::DependencySet;

pub use discovery::{is_workflow_file, workflow_files};
pub use github_actions::GitHubActionsParser;
pub use traits::{ParseError, Parser};
pub use types::ActionUse;

/// Parses every workflow file and merges the references into one deduplicated set
///
/// Each occurrence is recorded as a `path:line:column` source location.
/// Files the parser does not handle are skipped.
pub fn collect_dependencies(files: &[PathBuf]) -> Result<DependencySet, ParseError> {
    let parser = GitHubActionsParser::new();
    let mut dependencies = DependencySet::new();

    for file in files {
        let path = file.display().to_string();
        if !parser.can_parse(&path) {
            debug!("Skipping {}: not a workflow file", path);
            continue;
        }

        let content = fs::read_to_string(file).map_err(|source| ParseError::Io {
            path: file.clone(),
            source,
        })?;

        for action in parser.parse(&content)? {
            let dependency = dependencies.add(&action.name, &action.version, &action.location(&path));
            if dependency.pinned_tag.is_none() && action.pinned_tag.is_some() {
                debug!(
                    "{} pinned to commit {}, tagged {:?}",
                    action.name, action.version, action.pinned_tag
                );
                dependency.pinned_tag = action.pinned_tag;
            }
        }
    }

    debug!(
        "Collected {} unique actions from {} files",
        dependencies.len(),
        files.len()
    );
    Ok(dependencies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workflows_dir() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let workflows = dir.path().join(".github/workflows");
        fs::create_dir_all(&workflows).unwrap();
        (dir, workflows)
    }

    #[test]
    fn collect_dependencies_merges_locations_across_files() {
        let (_dir, workflows) = workflows_dir();
        let build = workflows.join("build.yml");
        let test = workflows.join("test.yml");
        fs::write(
            &build,
            "jobs:\n  b:\n    steps:\n      - uses: actions/checkout@v3\n      - uses: actions/cache@v4\n",
        )
        .unwrap();
        fs::write(
            &test,
            "jobs:\n  t:\n    steps:\n      - uses: actions/checkout@v3\n      - uses: actions/checkout@v4\n",
        )
        .unwrap();

        let set = collect_dependencies(&[build.clone(), test.clone()]).unwrap();

        assert_eq!(set.len(), 3);
        let checkout = set.get("actions/checkout", "v3").unwrap();
        assert_eq!(
            checkout.source_locations.iter().collect::<Vec<_>>(),
            vec![
                &format!("{}:4:32", build.display()),
                &format!("{}:4:32", test.display()),
            ]
        );
    }

    #[test]
    fn collect_dependencies_keys_commit_pins_by_hash() {
        let (_dir, workflows) = workflows_dir();
        let file = workflows.join("ci.yml");
        fs::write(
            &file,
            "jobs:\n  b:\n    steps:\n      - uses: actions/checkout@8e5e7e5ab8b370d6c329ec480221332ada57f0ab # v3.6.0\n",
        )
        .unwrap();

        let set = collect_dependencies(&[file]).unwrap();

        let checkout = set
            .get("actions/checkout", "8e5e7e5ab8b370d6c329ec480221332ada57f0ab")
            .unwrap();
        assert_eq!(checkout.pinned_tag.as_deref(), Some("v3.6.0"));
    }

    #[test]
    fn collect_dependencies_skips_files_outside_workflows_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("docker-compose.yml");
        fs::write(&file, "services:\n  app:\n    uses: some/thing@v1\n").unwrap();

        let set = collect_dependencies(&[file]).unwrap();

        assert!(set.is_empty());
    }

    #[test]
    fn collect_dependencies_fails_for_unreadable_file() {
        let (_dir, workflows) = workflows_dir();

        let result = collect_dependencies(&[workflows.join("missing.yml")]);

        assert!(matches!(result, Err(ParseError::Io { .. })));
    }
}
