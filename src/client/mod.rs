//! Client module for cellbase
//!
//! Connection-scoped handles over a [`Store`](crate::store::Store):
//!
//! - [`Connection`]: cheap to clone, shares one store
//! - [`Admin`]: table lifecycle (create, disable, enable, delete)
//! - [`Table`]: data operations on one table
//!
//! Request types ([`Put`], [`Get`], [`Scan`], [`Delete`]) are plain builders
//! validated by the store when they are applied.

mod connection;
mod operation;
mod result;
mod scanner;

pub use connection::{Admin, Connection, Table};
pub use operation::{Delete, DeleteTarget, Get, Put, PutCell, Scan};
pub use result::{Cell, RowResult};
pub use scanner::ResultScanner;
