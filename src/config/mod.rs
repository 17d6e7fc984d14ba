use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::util::{Result, Status};

/// Options of the embedded store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Retention applied to families created without an explicit
    /// `max_versions`. None keeps every version.
    pub default_max_versions: Option<u32>,
    /// Number of row lock stripes per table.
    pub row_lock_stripes: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            default_max_versions: None,
            row_lock_stripes: 64,
        }
    }
}

/// Options of the data-access facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessOptions {
    /// Versions returned by `get_with_versions` when the caller gives none.
    pub read_versions: u32,
}

impl Default for AccessOptions {
    fn default() -> Self {
        AccessOptions { read_versions: 5 }
    }
}

/// Complete configuration, loadable from JSON.
///
/// Every field is optional in the JSON document:
///
/// ```json
/// {
///   "store": { "default_max_versions": 10, "row_lock_stripes": 128 },
///   "access": { "read_versions": 3 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreOptions,
    pub access: AccessOptions,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Status::io_error(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.access.read_versions == 0 {
            return Err(Status::invalid_argument(
                "access.read_versions must be at least 1",
            ));
        }
        if self.store.default_max_versions == Some(0) {
            return Err(Status::invalid_argument(
                "store.default_max_versions must be at least 1",
            ));
        }
        if self.store.row_lock_stripes == 0 {
            return Err(Status::invalid_argument(
                "store.row_lock_stripes must be at least 1",
            ));
        }
        Ok(())
    }
}
