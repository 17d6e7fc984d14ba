use std::cmp::Reverse;

use crate::util::Slice;

/// Kind of an entry stored under a [`CellKey`].
///
/// The discriminant order matters: at equal timestamps a column delete
/// marker sorts before a put so that it is seen first while walking the
/// versions of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellKind {
    DeleteColumn = 0,
    Put = 1,
}

/// Ordering key of one entry inside a family's memtable.
///
/// Entries sort by row, then qualifier, then timestamp *descending*, then
/// kind. All versions of one column are therefore contiguous and the newest
/// version comes first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    row: Slice,
    qualifier: Slice,
    timestamp: Reverse<u64>,
    kind: CellKind,
}

impl CellKey {
    pub fn new(row: Slice, qualifier: Slice, timestamp: u64, kind: CellKind) -> Self {
        CellKey {
            row,
            qualifier,
            timestamp: Reverse(timestamp),
            kind,
        }
    }

    pub fn put(row: Slice, qualifier: Slice, timestamp: u64) -> Self {
        CellKey::new(row, qualifier, timestamp, CellKind::Put)
    }

    pub fn delete_column(row: Slice, qualifier: Slice, timestamp: u64) -> Self {
        CellKey::new(row, qualifier, timestamp, CellKind::DeleteColumn)
    }

    /// Smallest possible key of `row`.
    pub fn first_of_row(row: Slice) -> Self {
        CellKey::new(row, Slice::empty(), u64::MAX, CellKind::DeleteColumn)
    }

    /// Smallest possible key of the column `(row, qualifier)`.
    pub fn first_of_column(row: Slice, qualifier: Slice) -> Self {
        CellKey::new(row, qualifier, u64::MAX, CellKind::DeleteColumn)
    }

    /// Largest possible key of the column `(row, qualifier)`.
    pub fn last_of_column(row: Slice, qualifier: Slice) -> Self {
        CellKey::new(row, qualifier, 0, CellKind::Put)
    }

    pub fn row(&self) -> &Slice {
        &self.row
    }

    pub fn qualifier(&self) -> &Slice {
        &self.qualifier
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp.0
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn is_deletion(&self) -> bool {
        self.kind == CellKind::DeleteColumn
    }

    pub fn same_column(&self, row: &Slice, qualifier: &Slice) -> bool {
        &self.row == row && &self.qualifier == qualifier
    }

    pub fn approximate_size(&self) -> usize {
        self.row.size() + self.qualifier.size() + 9
    }
}
