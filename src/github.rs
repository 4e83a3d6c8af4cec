//! GitHub Releases API client.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::notes::{clean_notes, normalize_line_endings};
use crate::types::ReleaseRecord;

/// Public GitHub API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("altsource-sync/", env!("CARGO_PKG_VERSION"));

/// A GitHub release as returned by `/releases/latest`.
#[derive(Debug, Deserialize)]
pub struct Release {
    /// Tag name (e.g. `"v0.3.0"`).
    pub tag_name: String,
    /// Release notes body (may be absent or null).
    #[serde(default)]
    pub body: Option<String>,
    /// ISO-8601 publish timestamp; drafts have none.
    #[serde(default)]
    pub published_at: Option<String>,
    /// Attached assets.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A single release asset (downloadable file).
#[derive(Debug, Deserialize)]
pub struct Asset {
    /// File name (e.g. `"XP.ipa"`).
    pub name: String,
    /// Direct download URL.
    pub browser_download_url: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
}

/// Anything that can produce the latest release of a project.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch the latest release of `project_id` (`owner/name`) and select the
    /// asset called `expected_asset_name`.
    async fn fetch_latest_release(
        &self,
        project_id: &str,
        expected_asset_name: &str,
    ) -> Result<ReleaseRecord>;
}

/// [`ReleaseSource`] backed by the GitHub REST API.
pub struct GitHubReleases {
    client: reqwest::Client,
    api_base_url: String,
    clean_notes: bool,
}

impl GitHubReleases {
    pub fn new(api_base_url: impl Into<String>, clean_notes: bool) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            api_base_url: api_base_url.into(),
            clean_notes,
        })
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.clean_notes)
    }

    async fn get_latest(&self, project_id: &str) -> Result<Release> {
        let url = latest_release_url(&self.api_base_url, project_id);
        debug!(%url, "Fetching latest release");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::ReleaseNotFound(project_id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ReleaseSource for GitHubReleases {
    async fn fetch_latest_release(
        &self,
        project_id: &str,
        expected_asset_name: &str,
    ) -> Result<ReleaseRecord> {
        let release = self.get_latest(project_id).await?;
        let today = chrono::Local::now().date_naive();
        normalize_release(release, expected_asset_name, today, self.clean_notes)
    }
}

/// Build the `/releases/latest` URL for a project.
pub fn latest_release_url(api_base_url: &str, project_id: &str) -> String {
    format!(
        "{}/repos/{}/releases/latest",
        api_base_url.trim_end_matches('/'),
        project_id
    )
}

/// Strip one leading `v` or `V` from a tag.
pub fn strip_version_prefix(tag: &str) -> &str {
    let tag = tag.trim();
    tag.strip_prefix(|c: char| c == 'v' || c == 'V')
        .unwrap_or(tag)
}

/// Resolve the publish date: missing or unparseable falls back to `today`,
/// and a date after `today` is clamped to `today`.
pub fn resolve_publish_date(published_at: Option<&str>, today: NaiveDate) -> NaiveDate {
    let parsed = published_at
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc).date_naive())
                .ok()
                .or_else(|| {
                    let day = s.split('T').next().unwrap_or(s);
                    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
                })
        });

    match parsed {
        Some(date) if date > today => {
            warn!(%date, %today, "Publish date is in the future, clamping to today");
            today
        }
        Some(date) => date,
        None => {
            debug!("No usable publish date, using today");
            today
        }
    }
}

/// Turn a raw API release into a [`ReleaseRecord`].
pub fn normalize_release(
    release: Release,
    expected_asset_name: &str,
    today: NaiveDate,
    clean: bool,
) -> Result<ReleaseRecord> {
    let version = strip_version_prefix(&release.tag_name).to_string();
    if version.is_empty() {
        return Err(SyncError::InvalidRelease(format!(
            "tag '{}' has no version",
            release.tag_name
        )));
    }

    let body = release.body.as_deref().unwrap_or_default();
    let notes = if clean {
        clean_notes(body)
    } else {
        normalize_line_endings(body).trim().to_string()
    };

    let publish_date = resolve_publish_date(release.published_at.as_deref(), today);

    let asset = release
        .assets
        .into_iter()
        .find(|a| a.name == expected_asset_name)
        .ok_or_else(|| SyncError::AssetNotFound {
            asset: expected_asset_name.to_string(),
            tag: release.tag_name.clone(),
        })?;

    Ok(ReleaseRecord {
        version,
        notes,
        publish_date,
        download_url: asset.browser_download_url,
        size: asset.size,
    })
}
