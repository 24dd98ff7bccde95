//! Exemption list for actions deliberately kept on older versions
//!
//! Document shape:
//! ```json
//! {
//!   "exceptions": {
//!     "actions/checkout": {
//!       "allowed_versions": ["v3"],
//!       "reason": "runner image still ships node16"
//!     }
//!   }
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::version::error::ExemptionError;

/// Versions of one action that must not be reported as outdated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemptionRule {
    pub name: String,
    pub allowed_versions: HashSet<String>,
    pub reason: String,
}

impl ExemptionRule {
    pub fn allows(&self, version: &str) -> bool {
        self.allowed_versions.contains(version)
    }
}

/// Exemption rules keyed by action name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exemptions {
    rules: HashMap<String, ExemptionRule>,
}

#[derive(Debug, Deserialize)]
struct ExemptionDocument {
    #[serde(default)]
    exceptions: HashMap<String, ExemptionEntry>,
}

#[derive(Debug, Deserialize)]
struct ExemptionEntry {
    #[serde(default)]
    allowed_versions: Vec<String>,
    #[serde(default)]
    reason: String,
}

impl Exemptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads exemptions from `path`
    ///
    /// A missing file yields an empty set; unreadable or malformed files are errors.
    pub fn load(path: &Path) -> Result<Self, ExemptionError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No exemptions file at {:?}", path);
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(ExemptionError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let exemptions = Self::from_json(&content).map_err(|source| ExemptionError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded {} exemption rules from {:?}", exemptions.len(), path);
        Ok(exemptions)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let document: ExemptionDocument = serde_json::from_str(content)?;
        let rules = document
            .exceptions
            .into_iter()
            .map(|(name, entry)| {
                let rule = ExemptionRule {
                    name: name.clone(),
                    allowed_versions: entry.allowed_versions.into_iter().collect(),
                    reason: entry.reason,
                };
                (name, rule)
            })
            .collect();
        Ok(Self { rules })
    }

    /// Adds or replaces the rule for `rule.name`
    pub fn insert(&mut self, rule: ExemptionRule) {
        self.rules.insert(rule.name.clone(), rule);
    }

    /// Returns the rule exempting `name@version`, if any
    pub fn matching(&self, name: &str, version: &str) -> Option<&ExemptionRule> {
        self.rules.get(name).filter(|rule| rule.allows(version))
    }

    pub fn get(&self, name: &str) -> Option<&ExemptionRule> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
