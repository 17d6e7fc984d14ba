use serde::{Deserialize, Serialize};

use crate::{
    column_family::ColumnFamilyDescriptor,
    util::{Result, Status},
};

/// Name and family layout of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub families: Vec<ColumnFamilyDescriptor>,
}

impl TableDescriptor {
    pub fn new<S: Into<String>>(name: S) -> Self {
        TableDescriptor {
            name: name.into(),
            families: Vec::new(),
        }
    }

    /// Descriptor with one default-option family per name.
    pub fn with_family_names<S, F>(name: S, families: &[F]) -> Self
    where
        S: Into<String>,
        F: AsRef<str>,
    {
        TableDescriptor {
            name: name.into(),
            families: families
                .iter()
                .map(|f| ColumnFamilyDescriptor::named(f.as_ref()))
                .collect(),
        }
    }

    pub fn add_family(mut self, family: ColumnFamilyDescriptor) -> Self {
        self.families.push(family);
        self
    }

    pub fn family_names(&self) -> Vec<&str> {
        self.families.iter().map(|f| f.name.as_str()).collect()
    }

    /// Table names are non-empty and use only `[A-Za-z0-9_.-]`.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Status::invalid_argument("table name is empty"));
        }
        let legal = name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'));
        if !legal {
            return Err(Status::invalid_argument(format!(
                "illegal table name '{name}'"
            )));
        }
        Ok(())
    }
}
