//! Sync configuration
//!
//! A run is described by a [`SyncConfig`]. It can come from a TOML file,
//! with command-line flags and environment variables layered on top via
//! [`ConfigOverrides`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::github::DEFAULT_API_BASE_URL;

/// Everything a single sync run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// GitHub project to query, as `owner/name`
    pub project_id: String,

    /// Name of the release asset to record (e.g. `"XP.ipa"`)
    pub expected_asset_name: String,

    /// Catalog JSON file to update (default: app-repo.json)
    pub catalog_path: PathBuf,

    /// GitHub API base URL (default: https://api.github.com)
    pub api_base_url: String,

    /// Clean release notes before recording them
    pub clean_notes: bool,

    /// Repair `/n` and literal `\n` in the app description
    pub fix_descriptions: bool,

    /// Reconcile in memory but do not write the catalog
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            expected_asset_name: String::new(),
            catalog_path: PathBuf::from("app-repo.json"),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            clean_notes: true,
            fix_descriptions: true,
            dry_run: false,
        }
    }
}

impl SyncConfig {
    pub fn new(
        project_id: impl Into<String>,
        expected_asset_name: impl Into<String>,
        catalog_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            expected_asset_name: expected_asset_name.into(),
            catalog_path: catalog_path.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: SyncConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut parts = self.project_id.split('/');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
        );
        if !well_formed {
            return Err(SyncError::Config(format!(
                "project id must look like 'owner/name', got '{}'",
                self.project_id
            )));
        }

        if self.expected_asset_name.trim().is_empty() {
            return Err(SyncError::Config("asset name must not be empty".into()));
        }

        if self.catalog_path.as_os_str().is_empty() {
            return Err(SyncError::Config("catalog path must not be empty".into()));
        }

        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://"))
        {
            return Err(SyncError::Config(format!(
                "API base URL must be http(s), got '{}'",
                self.api_base_url
            )));
        }

        Ok(())
    }
}

/// Values given on the command line or in the environment.
///
/// `None` leaves the underlying value untouched.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_id: Option<String>,
    pub expected_asset_name: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub api_base_url: Option<String>,
    pub clean_notes: Option<bool>,
    pub fix_descriptions: Option<bool>,
    pub dry_run: Option<bool>,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut SyncConfig) {
        if let Some(v) = self.project_id {
            config.project_id = v;
        }
        if let Some(v) = self.expected_asset_name {
            config.expected_asset_name = v;
        }
        if let Some(v) = self.catalog_path {
            config.catalog_path = v;
        }
        if let Some(v) = self.api_base_url {
            config.api_base_url = v;
        }
        if let Some(v) = self.clean_notes {
            config.clean_notes = v;
        }
        if let Some(v) = self.fix_descriptions {
            config.fix_descriptions = v;
        }
        if let Some(v) = self.dry_run {
            config.dry_run = v;
        }
    }
}
