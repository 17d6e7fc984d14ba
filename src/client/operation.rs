use std::collections::BTreeMap;

use crate::{
    memtable::{ColumnSelection, TimeRange},
    util::{LATEST_TIMESTAMP, Result, Slice, Status},
};

fn check_row(row: &Slice) -> Result<()> {
    if row.is_empty() {
        return Err(Status::invalid_argument("row key is empty"));
    }
    Ok(())
}

fn check_timestamp(timestamp: Option<u64>) -> Result<()> {
    if timestamp == Some(LATEST_TIMESTAMP) {
        return Err(Status::invalid_argument("timestamp u64::MAX is reserved"));
    }
    Ok(())
}

/// One column value inside a [`Put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutCell {
    pub qualifier: Slice,
    /// None: the store assigns the mutation's timestamp.
    pub timestamp: Option<u64>,
    pub value: Slice,
}

/// Writes to one row, applied atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Put {
    row: Slice,
    families: BTreeMap<String, Vec<PutCell>>,
}

impl Put {
    pub fn new(row: impl Into<Slice>) -> Self {
        Put {
            row: row.into(),
            families: BTreeMap::new(),
        }
    }

    pub fn add_column(
        self,
        family: impl Into<String>,
        qualifier: impl Into<Slice>,
        value: impl Into<Slice>,
    ) -> Self {
        self.push(family.into(), qualifier.into(), None, value.into())
    }

    pub fn add_column_with_timestamp(
        self,
        family: impl Into<String>,
        qualifier: impl Into<Slice>,
        timestamp: u64,
        value: impl Into<Slice>,
    ) -> Self {
        self.push(family.into(), qualifier.into(), Some(timestamp), value.into())
    }

    fn push(
        mut self,
        family: String,
        qualifier: Slice,
        timestamp: Option<u64>,
        value: Slice,
    ) -> Self {
        self.families.entry(family).or_default().push(PutCell {
            qualifier,
            timestamp,
            value,
        });
        self
    }

    pub fn row(&self) -> &Slice {
        &self.row
    }

    /// Cells grouped by family, families in name order.
    pub fn families(&self) -> &BTreeMap<String, Vec<PutCell>> {
        &self.families
    }

    pub fn cell_count(&self) -> usize {
        self.families.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    pub fn validate(&self) -> Result<()> {
        check_row(&self.row)?;
        if self.is_empty() {
            return Err(Status::invalid_argument(format!(
                "put for row '{}' has no columns",
                self.row
            )));
        }
        for cell in self.families.values().flatten() {
            check_timestamp(cell.timestamp)?;
        }
        Ok(())
    }
}

/// Read of one row.
///
/// Without any family or column added, every family is read. By default
/// only the newest version of each column is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Get {
    row: Slice,
    families: BTreeMap<String, ColumnSelection>,
    max_versions: u32,
    time_range: TimeRange,
}

impl Get {
    pub fn new(row: impl Into<Slice>) -> Self {
        Get {
            row: row.into(),
            families: BTreeMap::new(),
            max_versions: 1,
            time_range: TimeRange::all(),
        }
    }

    pub fn add_family(mut self, family: impl Into<String>) -> Self {
        self.families.insert(family.into(), ColumnSelection::All);
        self
    }

    pub fn add_column(mut self, family: impl Into<String>, qualifier: impl Into<Slice>) -> Self {
        self.families
            .entry(family.into())
            .or_insert_with(|| ColumnSelection::Only(Default::default()))
            .add(qualifier.into());
        self
    }

    pub fn max_versions(mut self, max_versions: u32) -> Self {
        self.max_versions = max_versions;
        self
    }

    /// Only versions with `min <= timestamp < max`.
    pub fn time_range(mut self, min: u64, max: u64) -> Self {
        self.time_range = TimeRange::new(min, max);
        self
    }

    pub fn row(&self) -> &Slice {
        &self.row
    }

    pub fn families(&self) -> &BTreeMap<String, ColumnSelection> {
        &self.families
    }

    pub fn get_max_versions(&self) -> u32 {
        self.max_versions
    }

    pub fn get_time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn validate(&self) -> Result<()> {
        check_row(&self.row)?;
        if self.max_versions == 0 {
            return Err(Status::invalid_argument("max_versions must be at least 1"));
        }
        if self.time_range.min > self.time_range.max {
            return Err(Status::invalid_argument("time range min is above max"));
        }
        Ok(())
    }
}

/// Forward range read over `[start_row, stop_row)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    start_row: Option<Slice>,
    stop_row: Option<Slice>,
    families: BTreeMap<String, ColumnSelection>,
    max_versions: u32,
    time_range: TimeRange,
    limit: Option<usize>,
}

impl Scan {
    pub fn new() -> Self {
        Scan {
            start_row: None,
            stop_row: None,
            families: BTreeMap::new(),
            max_versions: 1,
            time_range: TimeRange::all(),
            limit: None,
        }
    }

    /// First row returned, inclusive.
    pub fn with_start_row(mut self, row: impl Into<Slice>) -> Self {
        self.start_row = Some(row.into());
        self
    }

    /// Row the scan stops at, exclusive.
    pub fn with_stop_row(mut self, row: impl Into<Slice>) -> Self {
        self.stop_row = Some(row.into());
        self
    }

    pub fn add_family(mut self, family: impl Into<String>) -> Self {
        self.families.insert(family.into(), ColumnSelection::All);
        self
    }

    pub fn add_column(mut self, family: impl Into<String>, qualifier: impl Into<Slice>) -> Self {
        self.families
            .entry(family.into())
            .or_insert_with(|| ColumnSelection::Only(Default::default()))
            .add(qualifier.into());
        self
    }

    pub fn max_versions(mut self, max_versions: u32) -> Self {
        self.max_versions = max_versions;
        self
    }

    pub fn time_range(mut self, min: u64, max: u64) -> Self {
        self.time_range = TimeRange::new(min, max);
        self
    }

    /// Stop after this many rows.
    pub fn limit(mut self, rows: usize) -> Self {
        self.limit = Some(rows);
        self
    }

    pub fn start_row(&self) -> Option<&Slice> {
        self.start_row.as_ref()
    }

    pub fn stop_row(&self) -> Option<&Slice> {
        self.stop_row.as_ref()
    }

    pub fn families(&self) -> &BTreeMap<String, ColumnSelection> {
        &self.families
    }

    pub fn get_max_versions(&self) -> u32 {
        self.max_versions
    }

    pub fn get_time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// True when the bounds cannot contain any row.
    pub fn is_empty_range(&self) -> bool {
        matches!((&self.start_row, &self.stop_row), (Some(start), Some(stop)) if start >= stop)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_versions == 0 {
            return Err(Status::invalid_argument("max_versions must be at least 1"));
        }
        if self.time_range.min > self.time_range.max {
            return Err(Status::invalid_argument("time range min is above max"));
        }
        Ok(())
    }
}

impl Default for Scan {
    fn default() -> Self {
        Self::new()
    }
}

/// What a [`Delete`] removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Every version of one column
    Column { family: String, qualifier: Slice },
    /// Every column of the row in one family
    Family(String),
}

/// Removal of cells from one row.
///
/// With no target added the whole row is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delete {
    row: Slice,
    targets: Vec<DeleteTarget>,
    timestamp: Option<u64>,
}

impl Delete {
    pub fn new(row: impl Into<Slice>) -> Self {
        Delete {
            row: row.into(),
            targets: Vec::new(),
            timestamp: None,
        }
    }

    pub fn add_column(mut self, family: impl Into<String>, qualifier: impl Into<Slice>) -> Self {
        self.targets.push(DeleteTarget::Column {
            family: family.into(),
            qualifier: qualifier.into(),
        });
        self
    }

    pub fn add_family(mut self, family: impl Into<String>) -> Self {
        self.targets.push(DeleteTarget::Family(family.into()));
        self
    }

    /// Only mask versions at or below `timestamp` instead of "now".
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn row(&self) -> &Slice {
        &self.row
    }

    pub fn targets(&self) -> &[DeleteTarget] {
        &self.targets
    }

    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    pub fn is_whole_row(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        check_row(&self.row)?;
        check_timestamp(self.timestamp)
    }
}
