//! Store module for cellbase
//!
//! [`Store`] is the seam between the client layer and whatever actually
//! keeps the cells. Everything above it (connection, admin, table handles,
//! the data-access facade) talks to a `dyn Store` and never to a concrete
//! engine.
//!
//! # Architecture
//!
//! ```text
//! Connection ─→ Arc<dyn Store>
//!                    │
//!                    └─→ LocalStore
//!                          ├─→ Catalog (tables, lifecycle state)
//!                          ├─→ TimestampOracle
//!                          └─→ Statistics
//! ```
//!
//! Every call is synchronous and independent; implementations must be safe
//! to call from many threads at once.

mod local_scanner;
mod local_store;

pub use local_store::LocalStore;

use crate::{
    catalog::TableDescriptor,
    client::{Delete, Get, Put, ResultScanner, RowResult, Scan},
    statistics::StatisticsSnapshot,
    util::Result,
};

pub trait Store: Send + Sync {
    /// Create a table. `AlreadyExists` if the name is taken.
    fn create_table(&self, descriptor: &TableDescriptor) -> Result<()>;

    fn table_exists(&self, table: &str) -> bool;

    /// Table names in ascending order
    fn list_tables(&self) -> Vec<String>;

    fn describe_table(&self, table: &str) -> Result<TableDescriptor>;

    fn is_table_enabled(&self, table: &str) -> Result<bool>;

    /// Take a table offline. `TableNotEnabled` if it already is.
    fn disable_table(&self, table: &str) -> Result<()>;

    /// Bring a table online. `TableNotDisabled` if it already is.
    fn enable_table(&self, table: &str) -> Result<()>;

    /// Remove a disabled table. `TableNotDisabled` while it is online.
    fn delete_table(&self, table: &str) -> Result<()>;

    /// Apply a row mutation atomically.
    fn put(&self, table: &str, put: &Put) -> Result<()>;

    fn get(&self, table: &str, get: &Get) -> Result<RowResult>;

    /// Open a lazy scanner over the table.
    fn scan(&self, table: &str, scan: &Scan) -> Result<ResultScanner>;

    fn delete(&self, table: &str, delete: &Delete) -> Result<()>;

    fn statistics(&self) -> StatisticsSnapshot;
}
