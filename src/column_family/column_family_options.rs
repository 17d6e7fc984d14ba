use serde::{Deserialize, Serialize};

/// Options for a specific Column Family
///
/// # Example
///
/// ```ignore
/// use cellbase::ColumnFamilyOptions;
///
/// let options = ColumnFamilyOptions {
///     max_versions: Some(3),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnFamilyOptions {
    /// Number of versions kept per column, older ones are dropped on write.
    /// Default: None (unlimited)
    pub max_versions: Option<u32>,
}

impl ColumnFamilyOptions {
    pub fn with_max_versions(max_versions: u32) -> Self {
        ColumnFamilyOptions {
            max_versions: Some(max_versions),
        }
    }

    /// Versions a read may return from this family.
    pub fn version_cap(&self) -> u32 {
        self.max_versions.unwrap_or(u32::MAX)
    }
}
