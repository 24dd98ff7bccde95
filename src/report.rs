//! Human-readable rendering of a check report

use crate::version::types::CheckReport;

/// Renders the report as the text printed at the end of a run
///
/// Sections are sorted by `name@version` so output is stable regardless of
/// the order in which checks completed.
pub fn render(report: &CheckReport) -> String {
    let mut out = String::new();

    if !report.failed.is_empty() {
        let mut failed: Vec<_> = report.failed.iter().collect();
        failed.sort_by_key(|f| f.dependency.key());

        out.push_str("Warnings:\n");
        for entry in failed {
            out.push_str(&format!(
                "  Failed to check {}: {}\n",
                entry.dependency.display_ref(),
                entry.error
            ));
        }
        out.push('\n');
    }

    if !report.exempted.is_empty() {
        let mut exempted: Vec<_> = report.exempted.iter().collect();
        exempted.sort_by_key(|e| e.dependency.key());

        out.push_str("Exempted actions (allowed older versions):\n");
        for entry in exempted {
            out.push_str(&format!(
                "  {} (in {}) - {}\n",
                entry.dependency.display_ref(),
                entry.dependency.locations_display(),
                entry.reason
            ));
        }
        out.push('\n');
    }

    if report.has_outdated() {
        let mut outdated: Vec<_> = report.outdated.iter().collect();
        outdated.sort_by_key(|o| o.dependency.key());

        out.push_str("Found outdated GitHub Actions:\n");
        for entry in outdated {
            out.push_str(&format!(
                "  {} -> {} (in {})\n",
                entry.dependency.display_ref(),
                entry.latest_version,
                entry.dependency.locations_display()
            ));
        }
        out.push_str("\nPlease update to the latest versions manually.\n");
    } else {
        out.push_str("All GitHub Actions are up to date.\n");
    }

    out
}

/// One-line summary used in logs
pub fn summary(report: &CheckReport) -> String {
    format!(
        "{} checked, {} outdated, {} exempted, {} failed",
        report.total(),
        report.outdated.len(),
        report.exempted.len(),
        report.failed.len()
    )
}
