//! Error types for altsource-sync

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while syncing a release into a catalog
///
/// Every variant is fatal for a run: nothing is retried, and the catalog
/// file is either left untouched or fully rewritten.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The release API answered with a non-success status
    #[error("GitHub API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The project has no published release
    #[error("No release found for '{0}'")]
    ReleaseNotFound(String),

    /// The latest release does not carry the expected asset
    #[error("No asset named '{asset}' found in release {tag}")]
    AssetNotFound { asset: String, tag: String },

    /// The release payload is unusable (e.g. empty tag)
    #[error("Invalid release: {0}")]
    InvalidRelease(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catalog file exists but cannot be used
    #[error("Invalid catalog {path}: {reason}")]
    Catalog { path: PathBuf, reason: String },

    /// Catalog has no application descriptor to update
    #[error("Catalog {0} has no app object in apps[0]")]
    EmptyCatalog(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

impl SyncError {
    /// Whether this error means the release or its asset does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SyncError::ReleaseNotFound(_) | SyncError::AssetNotFound { .. }
        )
    }
}

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kinds() {
        assert!(SyncError::ReleaseNotFound("u/r".into()).is_not_found());
        assert!(SyncError::AssetNotFound {
            asset: "XP.ipa".into(),
            tag: "v1.0".into(),
        }
        .is_not_found());
        assert!(!SyncError::Upstream {
            status: 500,
            body: "oops".into(),
        }
        .is_not_found());
    }

    #[test]
    fn test_upstream_message_carries_body() {
        let err = SyncError::Upstream {
            status: 403,
            body: "{\"message\":\"API rate limit exceeded\"}".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("rate limit"));
    }
}
