//! Core types for releases and AltStore catalogs
//!
//! Catalog documents are held as JSON maps rather than fully typed structs.
//! Only the few keys this crate reads or repairs are ever accessed, so every
//! other key keeps its value and its position across a load/save cycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A normalized release, as produced by a [`ReleaseSource`](crate::github::ReleaseSource)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    /// Release tag with one leading `v`/`V` stripped (e.g. `"1.2.0"`)
    pub version: String,

    /// Release notes with normalized line endings
    pub notes: String,

    /// Publish date, never later than the day the release was fetched
    pub publish_date: NaiveDate,

    /// Absolute URL of the selected asset
    pub download_url: String,

    /// Asset size in bytes
    pub size: Option<u64>,
}

/// A new entry for an app's `versions` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub version: String,

    /// Release date (`YYYY-MM-DD`)
    pub date: String,

    pub bundle_identifier: Option<String>,

    pub download_url: String,

    pub size: Option<u64>,

    pub localized_description: String,
}

impl CatalogEntry {
    /// JSON form, keys in AltStore's conventional order
    pub fn to_value(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("version".into(), self.version.clone().into());
        fields.insert("date".into(), self.date.clone().into());
        if let Some(bundle_identifier) = &self.bundle_identifier {
            fields.insert("bundleIdentifier".into(), bundle_identifier.clone().into());
        }
        fields.insert("downloadURL".into(), self.download_url.clone().into());
        if let Some(size) = self.size {
            fields.insert("size".into(), size.into());
        }
        fields.insert(
            "localizedDescription".into(),
            self.localized_description.clone().into(),
        );
        Value::Object(fields)
    }
}

/// The `version` of an existing entry, as a string.
///
/// Hand-edited catalogs sometimes carry numeric versions (`1.0`); those
/// compare by their JSON rendering.
pub fn entry_version(entry: &Value) -> Option<String> {
    match entry.get("version")? {
        Value::String(version) => Some(version.clone()),
        Value::Number(version) => Some(version.to_string()),
        _ => None,
    }
}

/// An application descriptor inside a catalog's `apps` array
///
/// Wraps the raw JSON object; accessors only touch the keys they name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppDescriptor(Map<String, Value>);

impl From<Map<String, Value>> for AppDescriptor {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl AppDescriptor {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A string-valued key; `None` when absent or not a string
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn str_field_mut(&mut self, key: &str) -> Option<&mut String> {
        match self.0.get_mut(key) {
            Some(Value::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn bundle_identifier(&self) -> Option<&str> {
        self.str_field("bundleIdentifier")
    }

    /// Apply `f` to every screenshot URL.
    ///
    /// `screenshots` may be a list of URL strings and `{"imageURL": ...}`
    /// objects, or an object grouping such lists by device class.
    pub fn for_each_screenshot_url_mut(&mut self, mut f: impl FnMut(&mut String)) {
        if let Some(screenshots) = self.0.get_mut("screenshots") {
            visit_screenshot_urls(screenshots, &mut f);
        }
    }

    /// Existing version entries, most recent first.
    ///
    /// Empty when `versions` is absent or not an array.
    pub fn versions(&self) -> &[Value] {
        match self.0.get("versions") {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    pub fn has_version(&self, version: &str) -> bool {
        self.versions()
            .iter()
            .any(|entry| entry_version(entry).as_deref() == Some(version))
    }

    /// Insert `entry` at the head of `versions`.
    ///
    /// An absent or non-array `versions` is replaced by a new array in the
    /// same position.
    pub fn insert_version(&mut self, entry: &CatalogEntry) {
        let slot = self.0.entry("versions").or_insert(Value::Null);
        let mut items = match slot.take() {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        items.insert(0, entry.to_value());
        *slot = Value::Array(items);
    }
}

fn visit_screenshot_urls<F: FnMut(&mut String)>(screenshots: &mut Value, f: &mut F) {
    match screenshots {
        Value::Array(shots) => {
            for shot in shots {
                match shot {
                    Value::String(url) => f(url),
                    Value::Object(image) => {
                        if let Some(Value::String(url)) = image.get_mut("imageURL") {
                            f(url);
                        }
                    }
                    _ => {}
                }
            }
        }
        Value::Object(groups) => {
            for group in groups.values_mut().filter(|g| g.is_array()) {
                visit_screenshot_urls(group, f);
            }
        }
        _ => {}
    }
}

/// An AltStore source document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(Map<String, Value>);

impl From<Map<String, Value>> for Catalog {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl Catalog {
    pub fn apps(&self) -> &[Value] {
        match self.0.get("apps") {
            Some(Value::Array(apps)) => apps,
            _ => &[],
        }
    }

    /// A copy of `apps[0]`, if it exists and is an object
    pub fn first_app(&self) -> Option<AppDescriptor> {
        match self.apps().first()? {
            Value::Object(fields) => Some(AppDescriptor(fields.clone())),
            _ => None,
        }
    }

    /// Put `app` back in place of `apps[0]`
    pub fn set_first_app(&mut self, app: AppDescriptor) {
        if let Some(Value::Array(apps)) = self.0.get_mut("apps") {
            if let Some(slot) = apps.first_mut() {
                *slot = Value::Object(app.0);
            }
        }
    }
}

/// Result of reconciling one release against one app descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// The release version is already recorded; versions were not touched
    AlreadyUpToDate,
    /// A new entry was inserted at the head of the version history
    Updated(CatalogEntry),
}

impl ReconcileOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, ReconcileOutcome::Updated(_))
    }
}
