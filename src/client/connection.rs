use std::sync::Arc;

use tracing::debug;

use crate::{
    catalog::TableDescriptor,
    client::{Delete, Get, Put, ResultScanner, RowResult, Scan},
    config::{Config, StoreOptions},
    statistics::StatisticsSnapshot,
    store::{LocalStore, Store},
    util::Result,
};

/// Shared handle to a store.
///
/// Clones refer to the same store; handles obtained from any clone see the
/// same tables.
#[derive(Clone)]
pub struct Connection {
    store: Arc<dyn Store>,
}

impl Connection {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Connection { store }
    }

    /// Connection to a fresh embedded store.
    pub fn open_local(options: StoreOptions) -> Self {
        debug!(?options, "opening local store");
        Connection::new(Arc::new(LocalStore::new(options)))
    }

    pub fn from_config(config: &Config) -> Self {
        Connection::open_local(config.store.clone())
    }

    pub fn admin(&self) -> Admin {
        Admin {
            store: Arc::clone(&self.store),
        }
    }

    /// Handle to a table. The table is not checked until the handle is used.
    pub fn table(&self, name: impl Into<String>) -> Table {
        Table {
            name: name.into(),
            store: Arc::clone(&self.store),
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        self.store.statistics()
    }
}

/// Table lifecycle operations.
pub struct Admin {
    store: Arc<dyn Store>,
}

impl Admin {
    pub fn create_table(&self, descriptor: &TableDescriptor) -> Result<()> {
        self.store.create_table(descriptor)
    }

    pub fn table_exists(&self, table: &str) -> bool {
        self.store.table_exists(table)
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.store.list_tables()
    }

    pub fn describe_table(&self, table: &str) -> Result<TableDescriptor> {
        self.store.describe_table(table)
    }

    pub fn is_table_enabled(&self, table: &str) -> Result<bool> {
        self.store.is_table_enabled(table)
    }

    pub fn disable_table(&self, table: &str) -> Result<()> {
        self.store.disable_table(table)
    }

    pub fn enable_table(&self, table: &str) -> Result<()> {
        self.store.enable_table(table)
    }

    pub fn delete_table(&self, table: &str) -> Result<()> {
        self.store.delete_table(table)
    }
}

/// Data operations on one table.
pub struct Table {
    name: String,
    store: Arc<dyn Store>,
}

impl Table {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> Result<TableDescriptor> {
        self.store.describe_table(&self.name)
    }

    pub fn put(&self, put: &Put) -> Result<()> {
        self.store.put(&self.name, put)
    }

    pub fn get(&self, get: &Get) -> Result<RowResult> {
        self.store.get(&self.name, get)
    }

    pub fn scan(&self, scan: &Scan) -> Result<ResultScanner> {
        self.store.scan(&self.name, scan)
    }

    pub fn delete(&self, delete: &Delete) -> Result<()> {
        self.store.delete(&self.name, delete)
    }
}
