pub mod cell_key;
#[allow(clippy::module_inception)]
pub mod memtable;

pub use cell_key::{CellKey, CellKind};
pub use memtable::{CellMemTable, CellVersion, ColumnSelection, TimeRange};
