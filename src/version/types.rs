//! Dependency references and check outcomes

use indexmap::{IndexMap, IndexSet};

use crate::version::error::RegistryError;

/// A third-party action pinned at one version, with every place it is used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    /// Action name in `owner/repo` form
    pub name: String,
    /// Version string exactly as written after `@`
    pub current_version: String,
    /// Places referencing this exact `name@version`, in first-seen order
    pub source_locations: IndexSet<String>,
    /// Tag named next to a commit-hash pin, shown alongside the hash
    pub pinned_tag: Option<String>,
}

impl DependencyRef {
    pub fn new(name: impl Into<String>, current_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.into(),
            source_locations: IndexSet::new(),
            pinned_tag: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.add_location(location);
        self
    }

    /// Identity key shared by all occurrences of this reference
    pub fn key(&self) -> String {
        dependency_key(&self.name, &self.current_version)
    }

    /// `name@version`, followed by the pinned tag when there is one
    pub fn display_ref(&self) -> String {
        match &self.pinned_tag {
            Some(tag) => format!("{} ({})", self.key(), tag),
            None => self.key(),
        }
    }

    /// Records another source location; duplicates are ignored
    pub fn add_location(&mut self, location: impl Into<String>) {
        self.source_locations.insert(location.into());
    }

    pub fn locations_display(&self) -> String {
        self.source_locations
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn dependency_key(name: &str, version: &str) -> String {
    format!("{}@{}", name, version)
}

/// Deduplicated set of dependency references keyed by `name@version`
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    refs: IndexMap<String, DependencyRef>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence, merging it into an existing reference if present
    pub fn add(&mut self, name: &str, version: &str, location: &str) -> &mut DependencyRef {
        let dependency = self
            .refs
            .entry(dependency_key(name, version))
            .or_insert_with(|| DependencyRef::new(name, version));
        dependency.add_location(location);
        dependency
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn get(&self, name: &str, version: &str) -> Option<&DependencyRef> {
        self.refs.get(&dependency_key(name, version))
    }

    pub fn into_vec(self) -> Vec<DependencyRef> {
        self.refs.into_values().collect()
    }
}

/// Outcome of checking one dependency reference
#[derive(Debug)]
pub enum CheckResult {
    /// The registry has a different latest version
    Outdated {
        dependency: DependencyRef,
        latest_version: String,
    },
    /// The pinned version is explicitly allowed
    Exempted {
        dependency: DependencyRef,
        reason: String,
    },
    /// The latest version could not be determined
    Failed {
        dependency: DependencyRef,
        error: RegistryError,
    },
    /// Nothing to report
    UpToDate { dependency: DependencyRef },
}

#[derive(Debug)]
pub struct OutdatedDependency {
    pub dependency: DependencyRef,
    pub latest_version: String,
}

#[derive(Debug)]
pub struct ExemptedDependency {
    pub dependency: DependencyRef,
    pub reason: String,
}

#[derive(Debug)]
pub struct FailedDependency {
    pub dependency: DependencyRef,
    pub error: RegistryError,
}

/// Partitioned results of one check run, in completion order
#[derive(Debug, Default)]
pub struct CheckReport {
    pub outdated: Vec<OutdatedDependency>,
    pub exempted: Vec<ExemptedDependency>,
    pub failed: Vec<FailedDependency>,
    /// Number of references found current
    pub up_to_date: usize,
}

impl CheckReport {
    pub fn record(&mut self, result: CheckResult) {
        match result {
            CheckResult::Outdated {
                dependency,
                latest_version,
            } => self.outdated.push(OutdatedDependency {
                dependency,
                latest_version,
            }),
            CheckResult::Exempted { dependency, reason } => {
                self.exempted.push(ExemptedDependency { dependency, reason })
            }
            CheckResult::Failed { dependency, error } => {
                self.failed.push(FailedDependency { dependency, error })
            }
            CheckResult::UpToDate { .. } => self.up_to_date += 1,
        }
    }

    /// Number of references accounted for
    pub fn total(&self) -> usize {
        self.outdated.len() + self.exempted.len() + self.failed.len() + self.up_to_date
    }

    pub fn has_outdated(&self) -> bool {
        !self.outdated.is_empty()
    }
}
