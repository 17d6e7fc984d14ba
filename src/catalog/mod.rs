//! Table catalog for cellbase
//!
//! The catalog maps table names to their runtime state. It is the only
//! place tables are created, looked up and removed.
//!
//! # Lock order
//!
//! The catalog lock is released before any row lock of a table is taken.
//! Lookups clone the table's `Arc` and drop the catalog guard immediately.

mod row_locks;
mod table_data;
mod table_descriptor;

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
pub use row_locks::RowLocks;
pub use table_data::{EnabledGuard, TableData, TableState};
pub use table_descriptor::TableDescriptor;

use crate::util::{Result, Status};

#[derive(Default)]
pub struct Catalog {
    tables: RwLock<HashMap<String, Arc<TableData>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Register a new table. Fails with `AlreadyExists` and leaves the
    /// existing table untouched if the name is taken.
    pub fn create(&self, descriptor: &TableDescriptor, row_lock_stripes: usize) -> Result<()> {
        let table = TableData::new(descriptor, row_lock_stripes)?;

        let mut tables = self.tables.write();
        if tables.contains_key(&descriptor.name) {
            return Err(Status::already_exists(format!(
                "table '{}' already exists",
                descriptor.name
            )));
        }
        tables.insert(descriptor.name.clone(), Arc::new(table));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<TableData>> {
        self.tables
            .read()
            .get(name)
            .map(Arc::clone)
            .ok_or_else(|| Status::not_found(format!("table '{name}' does not exist")))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// Remove a disabled table. Fails with `TableNotDisabled` while it is
    /// online.
    pub fn remove(&self, name: &str) -> Result<Arc<TableData>> {
        let mut tables = self.tables.write();
        let table = tables
            .get(name)
            .ok_or_else(|| Status::not_found(format!("table '{name}' does not exist")))?;
        if table.is_enabled() {
            return Err(Status::table_not_disabled(name));
        }
        tables
            .remove(name)
            .ok_or_else(|| Status::not_found(format!("table '{name}' does not exist")))
    }

    /// Table names in ascending order
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn count(&self) -> usize {
        self.tables.read().len()
    }
}
