//! # altsource-sync
//!
//! Keep an AltStore source manifest in step with an app's GitHub releases.
//!
//! ## Overview
//!
//! A sync run fetches the latest release of a project, picks the expected
//! asset (usually the `.ipa`), and records it as a new entry at the head of
//! the first app's `versions` array. A release whose version is already
//! recorded leaves the history untouched.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use altsource_sync::{run_sync, GitHubReleases, SyncConfig};
//!
//! # async fn example() -> altsource_sync::Result<()> {
//! let config = SyncConfig::new("afyef/XP-App", "XP.ipa", "app-repo.json");
//! let source = GitHubReleases::from_config(&config)?;
//!
//! let report = run_sync(&config, &source).await?;
//! println!("{:?}", report.outcome);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **ReleaseSource** trait — where releases come from (`GitHubReleases`)
//! - **reconcile** — decides whether a release is new and records it
//! - **CatalogStore** — whole-file, atomic catalog persistence
//! - **run_sync** — one fetch/reconcile/save pass

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod notes;
pub mod reconcile;
pub mod repair;
pub mod store;
pub mod sync;
pub mod types;

// Re-export core types
pub use config::{ConfigOverrides, SyncConfig};
pub use error::{Result, SyncError};
pub use github::{GitHubReleases, ReleaseSource};
pub use notes::clean_notes;
pub use reconcile::{reconcile, ReconcileOptions, Reconciliation};
pub use store::CatalogStore;
pub use sync::{run_sync, SyncReport};
pub use types::{AppDescriptor, Catalog, CatalogEntry, ReconcileOutcome, ReleaseRecord};
