//! One sync run: fetch the latest release, reconcile, persist.

use tracing::info;

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::github::ReleaseSource;
use crate::reconcile::{reconcile, ReconcileOptions};
use crate::store::CatalogStore;
use crate::types::{ReconcileOutcome, ReleaseRecord};

/// What a sync run did
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// The release that was reconciled
    pub release: ReleaseRecord,
    pub outcome: ReconcileOutcome,
    /// Descriptor repairs changed the first app
    pub repaired: bool,
    /// Whether the catalog file was rewritten
    pub catalog_written: bool,
}

/// Run the full sync flow: fetch -> load -> reconcile -> save.
///
/// The release is fetched before the catalog is opened, so a fetch failure
/// never touches the file. The catalog is only written when the first app
/// changed, either through a new version or through descriptor repairs,
/// and never in dry-run mode.
pub async fn run_sync(config: &SyncConfig, source: &dyn ReleaseSource) -> Result<SyncReport> {
    let release = source
        .fetch_latest_release(&config.project_id, &config.expected_asset_name)
        .await?;

    info!(version = %release.version, "Latest version");
    info!(date = %release.publish_date, "Published");
    info!(size = ?release.size, "File size");
    info!(url = %release.download_url, "Asset");

    let store = CatalogStore::new(&config.catalog_path);
    let mut catalog = store.load().await?;

    let mut app = catalog
        .first_app()
        .ok_or_else(|| SyncError::EmptyCatalog(config.catalog_path.clone()))?;

    let options = ReconcileOptions {
        fix_descriptions: config.fix_descriptions,
    };
    let reconciliation = reconcile(&mut app, &release, &options);
    let changed = reconciliation.changed();

    let catalog_written = changed && !config.dry_run;
    if catalog_written {
        catalog.set_first_app(app);
        store.save(&catalog).await?;
        info!(path = %config.catalog_path.display(), "Catalog updated");
    } else if changed {
        info!("Dry run, catalog not written");
    }

    Ok(SyncReport {
        release,
        outcome: reconciliation.outcome,
        repaired: reconciliation.repaired,
        catalog_written,
    })
}
