//! Release-to-catalog reconciliation
//!
//! Version identity is the tag string itself: a release is new when no
//! entry carries exactly the same `version`. Entries are never re-sorted,
//! so the history is ordered by when each release was first reconciled.

use tracing::info;

use crate::repair::repair_descriptor;
use crate::types::{AppDescriptor, CatalogEntry, ReconcileOutcome, ReleaseRecord};

/// Options for [`reconcile`]
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Repair `/n` in the app description
    pub fix_descriptions: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            fix_descriptions: true,
        }
    }
}

/// What [`reconcile`] did to a descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub outcome: ReconcileOutcome,
    /// Descriptor repairs changed at least one field
    pub repaired: bool,
}

impl Reconciliation {
    /// Whether the descriptor differs from what was loaded
    ///
    /// An absent or non-array `versions` can only be replaced on the way to
    /// an `Updated` outcome, so repairs and new entries are the only changes.
    pub fn changed(&self) -> bool {
        self.repaired || self.outcome.is_updated()
    }
}

/// Merge `release` into the version history of `app`.
///
/// Descriptor repairs run first and are applied even when the release is
/// already recorded. Existing entries are never modified or removed; a new
/// entry is only ever inserted at index 0.
pub fn reconcile(
    app: &mut AppDescriptor,
    release: &ReleaseRecord,
    options: &ReconcileOptions,
) -> Reconciliation {
    let repaired = repair_descriptor(app, options.fix_descriptions);

    if app.has_version(&release.version) {
        info!(version = %release.version, "Already up to date");
        return Reconciliation {
            outcome: ReconcileOutcome::AlreadyUpToDate,
            repaired,
        };
    }

    let entry = build_entry(release, app.bundle_identifier().map(str::to_string));
    app.insert_version(&entry);
    info!(version = %release.version, history = app.versions().len(), "Recorded new version");

    Reconciliation {
        outcome: ReconcileOutcome::Updated(entry),
        repaired,
    }
}

/// Build the catalog entry for a release.
///
/// Empty notes are replaced with `"Updated to {version}"`.
pub fn build_entry(release: &ReleaseRecord, bundle_identifier: Option<String>) -> CatalogEntry {
    let description = if release.notes.trim().is_empty() {
        format!("Updated to {}", release.version)
    } else {
        release.notes.clone()
    };

    CatalogEntry {
        version: release.version.clone(),
        date: release.publish_date.format("%Y-%m-%d").to_string(),
        bundle_identifier,
        download_url: release.download_url.clone(),
        size: release.size,
        localized_description: description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn release(version: &str, notes: &str) -> ReleaseRecord {
        ReleaseRecord {
            version: version.to_string(),
            notes: notes.to_string(),
            publish_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            download_url: format!("https://github.com/u/r/releases/download/v{version}/XP.ipa"),
            size: Some(1000),
        }
    }

    fn app_with(versions: &[&str]) -> AppDescriptor {
        let entries: Vec<_> = versions
            .iter()
            .map(|v| json!({ "version": v, "localizedDescription": "old" }))
            .collect();
        serde_json::from_value(json!({
            "bundleIdentifier": "com.example.xp",
            "versions": entries
        }))
        .unwrap()
    }

    fn version_list(app: &AppDescriptor) -> Vec<String> {
        app.versions()
            .iter()
            .map(|v| v["version"].as_str().unwrap().to_string())
            .collect()
    }

    fn run(app: &mut AppDescriptor, release: &ReleaseRecord) -> Reconciliation {
        reconcile(app, release, &ReconcileOptions::default())
    }

    #[test]
    fn test_new_release_inserted_at_head() {
        let mut app = app_with(&["1.0"]);
        let result = run(&mut app, &release("1.1", ""));
        assert!(result.changed());
        assert!(!result.repaired);

        let ReconcileOutcome::Updated(entry) = result.outcome else {
            panic!("expected Updated");
        };
        assert_eq!(entry.version, "1.1");
        assert_eq!(entry.localized_description, "Updated to 1.1");
        assert_eq!(entry.size, Some(1000));
        assert_eq!(entry.date, "2024-03-01");
        assert_eq!(entry.bundle_identifier.as_deref(), Some("com.example.xp"));
        assert_eq!(version_list(&app), vec!["1.1", "1.0"]);
        assert_eq!(app.versions()[0], entry.to_value());
    }

    #[test]
    fn test_existing_version_is_up_to_date() {
        let mut app = app_with(&["1.1"]);
        let before = app.clone();

        let result = run(&mut app, &release("1.1", "notes"));
        assert_eq!(result.outcome, ReconcileOutcome::AlreadyUpToDate);
        assert!(!result.changed());
        assert_eq!(app, before);
    }

    #[test]
    fn test_reconcile_twice_is_idempotent() {
        let mut app = app_with(&["1.0"]);
        let r = release("2.0", "Big update");

        assert!(run(&mut app, &r).outcome.is_updated());
        let after_first = app.clone();

        let second = run(&mut app, &r);
        assert_eq!(second.outcome, ReconcileOutcome::AlreadyUpToDate);
        assert!(!second.changed());
        assert_eq!(app, after_first);
    }

    #[test]
    fn test_version_match_is_exact() {
        let mut app = app_with(&["1.1"]);
        assert!(run(&mut app, &release("1.1.0", "")).outcome.is_updated());
        assert!(run(&mut app, &release("1.1-BETA", "")).outcome.is_updated());
        assert_eq!(version_list(&app), vec!["1.1-BETA", "1.1.0", "1.1"]);
    }

    #[test]
    fn test_numeric_version_matches() {
        let mut app: AppDescriptor =
            serde_json::from_value(json!({ "versions": [{ "version": 1.0, "size": "1234" }] }))
                .unwrap();
        let before = app.clone();

        let result = run(&mut app, &release("1.0", ""));
        assert_eq!(result.outcome, ReconcileOutcome::AlreadyUpToDate);
        assert_eq!(app, before);
    }

    #[test]
    fn test_missing_versions_initialized() {
        let mut app = AppDescriptor::default();
        let result = run(&mut app, &release("1.0", "first"));
        assert!(result.outcome.is_updated());
        assert_eq!(version_list(&app), vec!["1.0"]);
        assert_eq!(app.versions()[0]["localizedDescription"], "first");
        assert!(app.versions()[0].get("bundleIdentifier").is_none());
    }

    #[test]
    fn test_older_release_after_newer_goes_to_head() {
        // Insertion order is the only ordering
        let mut app = app_with(&["2.0"]);
        run(&mut app, &release("1.5", ""));
        assert_eq!(version_list(&app), vec!["1.5", "2.0"]);
    }

    #[test]
    fn test_repairs_run_when_up_to_date() {
        let mut app: AppDescriptor = serde_json::from_value(json!({
            "iconURL": "https://raw.githubusercontent.com/u/r/refs/heads/main/icon.png",
            "versions": [{ "version": "1.1" }]
        }))
        .unwrap();

        let result = run(&mut app, &release("1.1", ""));
        assert_eq!(result.outcome, ReconcileOutcome::AlreadyUpToDate);
        assert!(result.repaired);
        assert!(result.changed());
        assert_eq!(
            app.str_field("iconURL"),
            Some("https://raw.githubusercontent.com/u/r/main/icon.png")
        );
    }
}
