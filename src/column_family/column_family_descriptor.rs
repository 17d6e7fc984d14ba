use serde::{Deserialize, Serialize};

use crate::{
    column_family::ColumnFamilyOptions,
    util::{Result, Status},
};

/// Descriptor for creating a Column Family
///
/// Contains the name and options for a column family.
/// A table's families are fixed by the descriptors it is created with.
///
/// # Example
///
/// ```ignore
/// use cellbase::{ColumnFamilyDescriptor, ColumnFamilyOptions};
///
/// let families = vec![
///     ColumnFamilyDescriptor::new("article", ColumnFamilyOptions::default()),
///     ColumnFamilyDescriptor::new("author", ColumnFamilyOptions::with_max_versions(3)),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFamilyDescriptor {
    /// Name of the column family
    pub name: String,

    /// Options for this column family
    #[serde(default)]
    pub options: ColumnFamilyOptions,
}

impl ColumnFamilyDescriptor {
    /// Create a new column family descriptor
    pub fn new<S: Into<String>>(name: S, options: ColumnFamilyOptions) -> Self {
        ColumnFamilyDescriptor {
            name: name.into(),
            options,
        }
    }

    /// Descriptor with default options
    pub fn named<S: Into<String>>(name: S) -> Self {
        ColumnFamilyDescriptor::new(name, ColumnFamilyOptions::default())
    }

    /// Family names are non-empty and free of ':' and control characters.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Status::invalid_argument("column family name is empty"));
        }
        if self.name.contains(':') || self.name.chars().any(char::is_control) {
            return Err(Status::invalid_argument(format!(
                "illegal column family name '{}'",
                self.name
            )));
        }
        if self.options.max_versions == Some(0) {
            return Err(Status::invalid_argument(format!(
                "column family '{}': max_versions must be at least 1",
                self.name
            )));
        }
        Ok(())
    }
}
