use crate::{
    column_family::{ColumnFamilyDescriptor, ColumnFamilyOptions},
    memtable::{CellMemTable, CellVersion, ColumnSelection, TimeRange},
    util::Slice,
};

/// What happened to a version handed to [`ColumnFamilyData::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Stored; `pruned` older versions were dropped by retention.
    Stored { pruned: usize },
    /// Hidden by a delete marker at or above its timestamp, not stored.
    Masked,
}

/// Runtime state of one column family of one table.
///
/// Holds the family's cells and applies the family's retention policy on
/// write. Row-level serialization is the caller's job.
pub struct ColumnFamilyData {
    /// Position of the family within its table (creation order)
    id: u32,

    name: String,

    options: ColumnFamilyOptions,

    mem: CellMemTable,
}

impl ColumnFamilyData {
    pub fn new(id: u32, descriptor: ColumnFamilyDescriptor) -> Self {
        ColumnFamilyData {
            id,
            name: descriptor.name,
            options: descriptor.options,
            mem: CellMemTable::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &ColumnFamilyOptions {
        &self.options
    }

    pub fn descriptor(&self) -> ColumnFamilyDescriptor {
        ColumnFamilyDescriptor::new(self.name.clone(), self.options.clone())
    }

    pub fn mem(&self) -> &CellMemTable {
        &self.mem
    }

    /// Write one version and enforce `max_versions`.
    pub fn put(
        &self,
        row: &Slice,
        qualifier: &Slice,
        timestamp: u64,
        value: Slice,
    ) -> WriteOutcome {
        if !self.mem.add(row, qualifier, timestamp, value) {
            return WriteOutcome::Masked;
        }
        let pruned = match self.options.max_versions {
            Some(max) => self.mem.prune_versions(row, qualifier, max),
            None => 0,
        };
        WriteOutcome::Stored { pruned }
    }

    /// Read a row, capping versions at the family's own limit.
    pub fn read_row(
        &self,
        row: &Slice,
        columns: &ColumnSelection,
        max_versions: u32,
        time_range: TimeRange,
    ) -> Vec<CellVersion> {
        let cap = max_versions.min(self.options.version_cap());
        self.mem.read_row(row, columns, cap, time_range)
    }
}
