//! Catalog persistence
//!
//! The catalog is read in full, changed in memory, and written back in
//! full. Writes go to a sibling temp file that is then renamed over the
//! original, so a failed run never leaves a half-written catalog.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{Result, SyncError};
use crate::types::Catalog;

/// File-backed catalog store
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the catalog file
    pub async fn load(&self) -> Result<Catalog> {
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.invalid(format!("cannot read: {e}")))?;
        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|e| self.invalid(e.to_string()))?;

        debug!(path = %self.path.display(), apps = catalog.apps().len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Write the catalog with 4-space indentation, atomically
    pub async fn save(&self, catalog: &Catalog) -> Result<()> {
        let json = to_json_pretty(catalog)?;

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(SyncError::Io(e));
        }

        debug!(path = %self.path.display(), bytes = json.len(), "Saved catalog");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn invalid(&self, reason: String) -> SyncError {
        SyncError::Catalog {
            path: self.path.clone(),
            reason,
        }
    }
}

/// Serialize with 4-space indentation and a trailing newline
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}
