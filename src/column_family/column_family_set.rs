use std::collections::HashMap;

use crate::{
    column_family::{ColumnFamilyData, ColumnFamilyDescriptor},
    util::{Result, Status},
};

/// The fixed set of Column Families of one table
///
/// ColumnFamilySet maintains:
/// - Families in creation order (their ID is their position)
/// - Map of family name → ID for lookup
///
/// # Lifecycle
///
/// ```text
/// create_table → ColumnFamilySet::new(descriptors)
///              ↓
/// put/get/scan → lookup family by name
///              ↓
/// delete_table → set dropped with its table
/// ```
///
/// The set never changes after construction, so no locking is needed.
pub struct ColumnFamilySet {
    families: Vec<ColumnFamilyData>,

    name_to_id: HashMap<String, u32>,
}

impl ColumnFamilySet {
    /// Build the set, rejecting empty, invalid or duplicate families.
    pub fn new(descriptors: &[ColumnFamilyDescriptor]) -> Result<Self> {
        if descriptors.is_empty() {
            return Err(Status::invalid_argument(
                "a table needs at least one column family",
            ));
        }

        let mut families = Vec::with_capacity(descriptors.len());
        let mut name_to_id = HashMap::with_capacity(descriptors.len());

        for (id, descriptor) in descriptors.iter().enumerate() {
            descriptor.validate()?;
            let id = id as u32;
            if name_to_id.insert(descriptor.name.clone(), id).is_some() {
                return Err(Status::invalid_argument(format!(
                    "column family '{}' specified more than once",
                    descriptor.name
                )));
            }
            families.push(ColumnFamilyData::new(id, descriptor.clone()));
        }

        Ok(ColumnFamilySet {
            families,
            name_to_id,
        })
    }

    /// Get column family by name
    pub fn get(&self, name: &str) -> Option<&ColumnFamilyData> {
        let id = *self.name_to_id.get(name)?;
        self.families.get(id as usize)
    }

    /// Get column family by name, or the error a request naming an unknown
    /// family gets.
    pub fn require(&self, table: &str, name: &str) -> Result<&ColumnFamilyData> {
        self.get(name).ok_or_else(|| {
            Status::invalid_argument(format!(
                "column family '{name}' does not exist in table '{table}'"
            ))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    /// Families in creation order
    pub fn iter(&self) -> impl Iterator<Item = &ColumnFamilyData> {
        self.families.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.families.iter().map(|cf| cf.name()).collect()
    }

    pub fn descriptors(&self) -> Vec<ColumnFamilyDescriptor> {
        self.families.iter().map(|cf| cf.descriptor()).collect()
    }

    /// Get number of column families
    pub fn count(&self) -> usize {
        self.families.len()
    }

    /// Approximate bytes held by all families
    pub fn approximate_memory_usage(&self) -> usize {
        self.families
            .iter()
            .map(|cf| cf.mem().approximate_memory_usage())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_family::ColumnFamilyOptions;

    #[test]
    fn test_column_family_set_creation() {
        let descriptors = vec![
            ColumnFamilyDescriptor::named("article"),
            ColumnFamilyDescriptor::new("author", ColumnFamilyOptions::with_max_versions(3)),
        ];
        let cf_set = ColumnFamilySet::new(&descriptors).unwrap();
        assert_eq!(cf_set.count(), 2);
        assert_eq!(cf_set.names(), vec!["article", "author"]);

        let author = cf_set.get("author").unwrap();
        assert_eq!(author.id(), 1);
        assert_eq!(author.options().max_versions, Some(3));
        assert_eq!(cf_set.descriptors(), descriptors);
    }

    #[test]
    fn test_create_duplicate_cf() {
        let result = ColumnFamilySet::new(&[
            ColumnFamilyDescriptor::named("users"),
            ColumnFamilyDescriptor::named("users"),
        ]);
        assert!(result.err().unwrap().is_invalid_argument());
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(ColumnFamilySet::new(&[]).is_err());
    }

    #[test]
    fn test_require_unknown_family() {
        let cf_set = ColumnFamilySet::new(&[ColumnFamilyDescriptor::named("a")]).unwrap();
        assert!(cf_set.require("t", "a").is_ok());

        let err = cf_set.require("t", "b").err().unwrap();
        assert!(err.is_invalid_argument());
        assert!(!cf_set.contains("b"));
    }
}
