pub mod catalog;
pub mod client;
pub mod column_family;
pub mod config;
pub mod dao;
pub mod memtable;
pub mod shell;
pub mod statistics;
pub mod store;
pub mod util;

pub use catalog::{TableDescriptor, TableState};
pub use client::{
    Admin, Cell, Connection, Delete, DeleteTarget, Get, Put, ResultScanner, RowResult, Scan, Table,
};
pub use column_family::{ColumnFamilyDescriptor, ColumnFamilyOptions};
pub use config::{AccessOptions, Config, StoreOptions};
pub use dao::{CellRecord, ColumnFamilyDataAccess, FamilyMutations, RowRecord, Rows};
pub use shell::{Command, RunSummary, Shell};
pub use statistics::{Statistics, StatisticsSnapshot};
pub use store::{LocalStore, Store};
pub use util::{Code, LATEST_TIMESTAMP, Result, Slice, Status};
