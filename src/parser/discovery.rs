//! Workflow file discovery

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::parser::traits::ParseError;

/// Returns true for YAML files under a `.github/workflows/` directory
pub fn is_workflow_file(path: &str) -> bool {
    let in_workflows_dir =
        path.contains(".github/workflows/") || path.contains(".github\\workflows\\");
    in_workflows_dir && is_yaml(path)
}

fn is_yaml(path: &str) -> bool {
    path.ends_with(".yml") || path.ends_with(".yaml")
}

/// Expands the given paths into a sorted, deduplicated list of workflow files
///
/// Directories are walked recursively without following symlinks. Only
/// workflow files are kept, whether found by walking or named directly.
pub fn workflow_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ParseError> {
    let mut files = Vec::new();

    for path in paths {
        let metadata = fs::metadata(path).map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;

        if metadata.is_dir() {
            collect_dir(path, &mut files)?;
        } else if is_workflow_file(&path.to_string_lossy()) {
            files.push(path.clone());
        } else {
            debug!("Skipping {}: not a workflow file", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ParseError> {
    let io_err = |source| ParseError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let file_type = entry.file_type().map_err(io_err)?;
        let path = entry.path();
        if file_type.is_dir() {
            collect_dir(&path, files)?;
        } else if file_type.is_file() && is_workflow_file(&path.to_string_lossy()) {
            files.push(path);
        }
    }
    Ok(())
}
