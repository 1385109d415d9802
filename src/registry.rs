//! Installation registry persisted as JSON under `~/.hit`.
//!
//! The registry is the only durable state. Every mutation is a full
//! load-modify-save cycle with no locking; concurrent invocations race and the
//! last writer wins.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    result,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    paths,
    tool::{Tool, ToolType},
};

/// Schema version written to new registries.
pub const REGISTRY_VERSION: &str = "1.0.0";

/// A tool recorded as installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledTool {
    /// Tool identifier; at most one entry per id.
    pub(crate) id: String,
    /// Human readable name at install time.
    pub(crate) name: String,
    /// Installed version.
    pub(crate) version: String,
    /// Tool type identifier as written to disk.
    #[serde(rename = "type")]
    pub(crate) tool_type: String,
    /// Directory the tool was copied to.
    pub(crate) installed_path: PathBuf,
    /// Install or last update time.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub(crate) installed_at: DateTime<Utc>,
}

/// Read an `installedAt` value without failing the whole registry.
///
/// Accepts RFC 3339, offset-less date-times (taken as UTC) and bare dates
/// (midnight UTC). Anything else maps to the Unix epoch.
fn deserialize_timestamp<'de, D>(deserializer: D) -> result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_timestamp(&raw).unwrap_or_else(|| {
        warn!(value = %raw, "unrecognized installedAt timestamp");
        DateTime::<Utc>::UNIX_EPOCH
    }))
}

/// Parse the timestamp forms accepted in `installedAt`.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl InstalledTool {
    /// Build a registry entry for a catalog tool copied to `installed_path`.
    pub(crate) fn from_tool(tool: &Tool, installed_path: PathBuf, installed_at: DateTime<Utc>) -> Self {
        Self {
            id: tool.id.clone(),
            name: tool.name.clone(),
            version: tool.version.clone(),
            tool_type: tool.tool_type.id().to_string(),
            installed_path,
            installed_at,
        }
    }

    /// Return the parsed tool type, if the stored type is known.
    pub(crate) fn tool_type(&self) -> Option<ToolType> {
        ToolType::from_name(&self.tool_type)
    }
}

/// Root object of the registry file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Registry schema version.
    pub(crate) version: String,
    /// Installed tools keyed by id.
    pub(crate) installations: Vec<InstalledTool>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            version: REGISTRY_VERSION.to_string(),
            installations: Vec::new(),
        }
    }
}

impl Registry {
    /// Replace any entry with the same id and append the new one.
    pub(crate) fn upsert(&mut self, entry: InstalledTool) {
        self.installations.retain(|existing| existing.id != entry.id);
        self.installations.push(entry);
    }

    /// Remove the entry with the given id, returning whether one existed.
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        let before = self.installations.len();
        self.installations.retain(|existing| existing.id != id);
        self.installations.len() != before
    }

    /// Return the entry with the given id.
    pub(crate) fn get(&self, id: &str) -> Option<&InstalledTool> {
        self.installations.iter().find(|entry| entry.id == id)
    }

    /// Return true when an entry with the given id exists.
    pub(crate) fn is_installed(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

/// Registry file state as seen by [`RegistryStore::inspect`].
#[derive(Debug)]
pub enum RegistryState {
    /// No registry file exists yet.
    Missing,
    /// The file was read and parsed.
    Loaded(Registry),
    /// The file exists but could not be read or parsed.
    Unreadable(String),
}

/// File-backed registry store.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    /// Path to the registry JSON file.
    path: PathBuf,
}

impl RegistryStore {
    /// Create a store backed by the given file.
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store at `~/.hit/registry.json`.
    pub(crate) fn open_default() -> Result<Self> {
        Ok(Self::new(paths::default_registry_path()?))
    }

    /// Return the backing file path.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Read the registry file and report its state without falling back.
    pub(crate) fn inspect(&self) -> RegistryState {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return RegistryState::Missing,
            Err(error) => return RegistryState::Unreadable(error.to_string()),
        };
        match serde_json::from_str(&contents) {
            Ok(registry) => RegistryState::Loaded(registry),
            Err(error) => RegistryState::Unreadable(error.to_string()),
        }
    }

    /// Load the registry, returning an empty one when the file is missing or unreadable.
    pub(crate) fn load(&self) -> Registry {
        match self.inspect() {
            RegistryState::Loaded(registry) => registry,
            RegistryState::Missing => {
                debug!(path = %self.path.display(), "registry not found, starting empty");
                Registry::default()
            }
            RegistryState::Unreadable(error) => {
                warn!(path = %self.path.display(), %error, "failed to load registry");
                Registry::default()
            }
        }
    }

    /// Persist the registry, creating the parent directory when needed.
    ///
    /// Writes to a sibling temp file and renames it over the target.
    pub(crate) fn save(&self, registry: &Registry) -> Result<()> {
        let contents = serde_json::to_string_pretty(registry)
            .map_err(|source| Error::RegistrySerialize { source })?;
        let write_error = |source| Error::RegistryWrite {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, contents).map_err(write_error)?;
        fs::rename(&temp_path, &self.path).map_err(write_error)?;
        debug!(path = %self.path.display(), count = registry.installations.len(), "saved registry");
        Ok(())
    }

    /// Upsert an entry and persist.
    pub(crate) fn register(&self, entry: InstalledTool) -> Result<()> {
        let mut registry = self.load();
        registry.upsert(entry);
        self.save(&registry)
    }

    /// Remove an entry by id and persist; absent ids are not an error.
    pub(crate) fn unregister(&self, id: &str) -> Result<()> {
        let mut registry = self.load();
        registry.remove(id);
        self.save(&registry)
    }

    /// Return every installed tool.
    pub(crate) fn list(&self) -> Vec<InstalledTool> {
        self.load().installations
    }

    /// Return the installed entry for an id.
    pub(crate) fn get(&self, id: &str) -> Option<InstalledTool> {
        self.load().get(id).cloned()
    }
}
