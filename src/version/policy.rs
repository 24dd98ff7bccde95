//! Outdated-version policy for GitHub Actions references
//!
//! Decision table, first match wins:
//! - `main`, `master` and `$`-templated references are never outdated
//! - a major pin such as `v4` is outdated when the latest major differs
//! - anything else is outdated when it differs from the latest tag at all

use std::sync::LazyLock;

use regex::Regex;

/// Branch names used to track an action without pinning it
const MOVING_REFS: &[&str] = &["main", "master"];

/// Prefix of templated references such as `${{ env.VERSION }}`
const TEMPLATE_SIGIL: char = '$';

static MAJOR_PIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v(\d+)$").expect("major pin pattern is valid"));

/// Returns true when `current` should be reported against `latest`
pub fn is_outdated(current: &str, latest: &str) -> bool {
    if is_moving_ref(current) {
        return false;
    }

    // Empty on either side counts as a difference.
    if current.is_empty() || latest.is_empty() {
        return true;
    }

    if let Some(current_major) = major_pin(current) {
        return current_major != latest_major(latest);
    }

    current != latest
}

fn is_moving_ref(version: &str) -> bool {
    MOVING_REFS.contains(&version) || version.starts_with(TEMPLATE_SIGIL)
}

fn major_pin(version: &str) -> Option<&str> {
    MAJOR_PIN_RE
        .captures(version)
        .and_then(|captures| captures.get(1))
        .map(|digits| digits.as_str())
}

/// "v5.0.0" -> "5", "5" -> "5", "v5-beta" -> "5-beta"
fn latest_major(latest: &str) -> &str {
    let stripped = latest.strip_prefix('v').unwrap_or(latest);
    stripped.split('.').next().unwrap_or(stripped)
}
