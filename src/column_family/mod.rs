//! Column Family module for cellbase
//!
//! Every table is split into a fixed set of column families chosen when the
//! table is created. Each family has independent:
//! - Cell storage (a versioned memtable)
//! - Retention policy (`max_versions`)
//!
//! # Architecture
//!
//! ```text
//! Table("blog")
//!  ├─→ ColumnFamily("article")
//!  │    └─→ CellMemTable
//!  └─→ ColumnFamily("author")
//!       └─→ CellMemTable
//! ```

mod column_family_data;
pub mod column_family_descriptor;
pub mod column_family_options;
mod column_family_set;

pub use column_family_data::{ColumnFamilyData, WriteOutcome};
pub use column_family_descriptor::ColumnFamilyDescriptor;
pub use column_family_options::ColumnFamilyOptions;
pub use column_family_set::ColumnFamilySet;
