use std::{
    collections::BTreeSet,
    ops::Bound,
    sync::atomic::{AtomicUsize, Ordering},
};

use crossbeam_skiplist::SkipMap;

use crate::{
    memtable::cell_key::CellKey,
    util::Slice,
};

/// Half-open timestamp interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub min: u64,
    pub max: u64,
}

impl TimeRange {
    pub fn new(min: u64, max: u64) -> Self {
        TimeRange { min, max }
    }

    pub fn all() -> Self {
        TimeRange {
            min: 0,
            max: u64::MAX,
        }
    }

    #[inline]
    pub fn contains(&self, timestamp: u64) -> bool {
        timestamp >= self.min && timestamp < self.max
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::all()
    }
}

/// Which qualifiers of a family a read wants.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSelection {
    #[default]
    All,
    Only(BTreeSet<Slice>),
}

impl ColumnSelection {
    #[inline]
    pub fn includes(&self, qualifier: &Slice) -> bool {
        match self {
            ColumnSelection::All => true,
            ColumnSelection::Only(set) => set.contains(qualifier),
        }
    }

    /// Widen or narrow the selection with one more qualifier.
    ///
    /// Adding a qualifier to `All` keeps `All`.
    pub fn add(&mut self, qualifier: Slice) {
        if let ColumnSelection::Only(set) = self {
            set.insert(qualifier);
        }
    }
}

/// One visible version returned by [`CellMemTable::read_row`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellVersion {
    pub qualifier: Slice,
    pub timestamp: u64,
    pub value: Slice,
}

/// Versioned cells of one column family.
///
/// `cells` holds puts and column delete markers ordered by [`CellKey`].
/// `row_markers` holds, per row, the timestamp of the newest whole-row
/// delete; every cell of that row at or below the timestamp is masked.
///
/// The memtable does no locking of its own beyond what the skiplists give:
/// callers serialize writers of one row (see `RowLocks`), which is what
/// makes the read-modify-write steps below safe.
pub struct CellMemTable {
    cells: SkipMap<CellKey, Slice>,
    row_markers: SkipMap<Slice, u64>,
    approximate_memory: AtomicUsize,
}

impl CellMemTable {
    pub fn new() -> Self {
        CellMemTable {
            cells: SkipMap::new(),
            row_markers: SkipMap::new(),
            approximate_memory: AtomicUsize::new(0),
        }
    }

    /// Insert one version of a column.
    ///
    /// Returns false if the version is masked by a delete marker and was
    /// therefore not stored.
    pub fn add(&self, row: &Slice, qualifier: &Slice, timestamp: u64, value: Slice) -> bool {
        if self.is_masked(row, qualifier, timestamp) {
            return false;
        }

        let key = CellKey::put(row.clone(), qualifier.clone(), timestamp);
        let mem_usage = key.approximate_size() + value.size();
        if let Some(old) = self.cells.get(&key) {
            // Same coordinates and timestamp: the new value replaces the old one.
            self.release(old.key().approximate_size() + old.value().size());
        }
        self.approximate_memory
            .fetch_add(mem_usage, Ordering::Relaxed);
        self.cells.insert(key, value);
        true
    }

    /// Mask every version of `(row, qualifier)` at or below `timestamp`.
    ///
    /// A column keeps at most one marker, below all of its puts: versions
    /// under a new marker (an older marker included) are purged, and a
    /// marker already at or above `timestamp` makes the call a no-op.
    pub fn delete_column(&self, row: &Slice, qualifier: &Slice, timestamp: u64) {
        if self
            .column_marker(row, qualifier)
            .is_some_and(|m| m >= timestamp)
        {
            return;
        }

        let marker = CellKey::delete_column(row.clone(), qualifier.clone(), timestamp);
        let purged: Vec<CellKey> = self
            .cells
            .range(marker.clone()..)
            .take_while(|entry| entry.key().same_column(row, qualifier))
            .map(|entry| entry.key().clone())
            .collect();
        self.purge(&purged);

        self.approximate_memory
            .fetch_add(marker.approximate_size(), Ordering::Relaxed);
        self.cells.insert(marker, Slice::empty());
    }

    /// Mask every cell of `row` at or below `timestamp`.
    pub fn delete_row(&self, row: &Slice, timestamp: u64) {
        let effective = match self.row_markers.get(row) {
            Some(existing) => (*existing.value()).max(timestamp),
            None => {
                self.approximate_memory
                    .fetch_add(row.size() + 8, Ordering::Relaxed);
                timestamp
            },
        };
        self.row_markers.insert(row.clone(), effective);

        let start = CellKey::first_of_row(row.clone());
        let purged: Vec<CellKey> = self
            .cells
            .range(start..)
            .take_while(|entry| entry.key().row() == row)
            .filter(|entry| entry.key().timestamp() <= effective)
            .map(|entry| entry.key().clone())
            .collect();
        self.purge(&purged);
    }

    /// Drop the put versions of `(row, qualifier)` beyond the newest
    /// `max_versions`. Returns the number of versions removed.
    pub fn prune_versions(&self, row: &Slice, qualifier: &Slice, max_versions: u32) -> usize {
        let start = CellKey::first_of_column(row.clone(), qualifier.clone());
        let mut kept = 0u32;
        let mut purged = Vec::new();
        for entry in self
            .cells
            .range(start..)
            .take_while(|entry| entry.key().same_column(row, qualifier))
        {
            if entry.key().is_deletion() {
                // Older versions were purged when the marker was written.
                break;
            }
            if kept < max_versions {
                kept += 1;
            } else {
                purged.push(entry.key().clone());
            }
        }
        self.purge(&purged);
        purged.len()
    }

    /// Visible versions of `row`, ordered by qualifier then newest first.
    ///
    /// At most `max_versions` versions inside `time_range` are returned per
    /// qualifier.
    pub fn read_row(
        &self,
        row: &Slice,
        columns: &ColumnSelection,
        max_versions: u32,
        time_range: TimeRange,
    ) -> Vec<CellVersion> {
        self.read_row_counted(row, columns, max_versions, time_range)
            .0
    }

    /// [`read_row`](Self::read_row) plus the number of entries touched.
    ///
    /// Each qualifier is reached by a seek and its walk ends at the version
    /// cap, the time range floor or the delete floor, so the count is
    /// bounded by the versions returned, not by the stored history.
    fn read_row_counted(
        &self,
        row: &Slice,
        columns: &ColumnSelection,
        max_versions: u32,
        time_range: TimeRange,
    ) -> (Vec<CellVersion>, usize) {
        let row_marker = self.row_marker(row);
        let mut out = Vec::new();
        let mut visited = 0;

        match columns {
            ColumnSelection::Only(qualifiers) => {
                for qualifier in qualifiers {
                    visited += self.read_column(
                        row,
                        qualifier,
                        row_marker,
                        max_versions,
                        time_range,
                        &mut out,
                    );
                }
            },
            ColumnSelection::All => {
                let mut cursor = CellKey::first_of_row(row.clone());
                while let Some(entry) = self.cells.lower_bound(Bound::Included(&cursor)) {
                    visited += 1;
                    if entry.key().row() != row {
                        break;
                    }
                    let qualifier = entry.key().qualifier().clone();
                    visited += self.read_column(
                        row,
                        &qualifier,
                        row_marker,
                        max_versions,
                        time_range,
                        &mut out,
                    );
                    cursor = CellKey::first_of_column(row.clone(), qualifier.successor());
                }
            },
        }
        (out, visited)
    }

    /// Append the visible versions of one column to `out`, newest first.
    /// Returns the number of entries touched.
    fn read_column(
        &self,
        row: &Slice,
        qualifier: &Slice,
        row_marker: Option<u64>,
        max_versions: u32,
        time_range: TimeRange,
        out: &mut Vec<CellVersion>,
    ) -> usize {
        if max_versions == 0 || time_range.min >= time_range.max {
            return 0;
        }
        let floor = row_marker.max(self.column_marker(row, qualifier));
        let mut visited = 1;
        let mut returned = 0u32;

        let start = CellKey::delete_column(row.clone(), qualifier.clone(), time_range.max - 1);
        for entry in self.cells.range(start..) {
            visited += 1;
            let key = entry.key();
            if !key.same_column(row, qualifier) {
                break;
            }
            let ts = key.timestamp();
            if ts < time_range.min || floor.is_some_and(|m| ts <= m) {
                break;
            }
            if key.is_deletion() {
                continue;
            }
            out.push(CellVersion {
                qualifier: qualifier.clone(),
                timestamp: ts,
                value: entry.value().clone(),
            });
            returned += 1;
            if returned >= max_versions {
                break;
            }
        }
        visited
    }

    /// First row holding any entry at or after `from`.
    ///
    /// The row may turn out to have no visible cells; callers skip such rows.
    pub fn next_row_from(&self, from: Bound<&Slice>) -> Option<Slice> {
        let start = match from {
            Bound::Included(row) => CellKey::first_of_row(row.clone()),
            Bound::Excluded(row) => CellKey::first_of_row(row.successor()),
            Bound::Unbounded => return self.cells.front().map(|e| e.key().row().clone()),
        };
        self.cells
            .lower_bound(Bound::Included(&start))
            .map(|entry| entry.key().row().clone())
    }

    pub fn approximate_memory_usage(&self) -> usize {
        self.approximate_memory.load(Ordering::Relaxed)
    }

    /// Number of stored entries, delete markers included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.row_markers.is_empty()
    }

    fn row_marker(&self, row: &Slice) -> Option<u64> {
        self.row_markers.get(row).map(|e| *e.value())
    }

    /// Timestamp of the column's delete marker. It is always the last entry
    /// of the column, so one seek finds it.
    fn column_marker(&self, row: &Slice, qualifier: &Slice) -> Option<u64> {
        let last = CellKey::last_of_column(row.clone(), qualifier.clone());
        self.cells
            .upper_bound(Bound::Included(&last))
            .filter(|entry| entry.key().same_column(row, qualifier) && entry.key().is_deletion())
            .map(|entry| entry.key().timestamp())
    }

    fn is_masked(&self, row: &Slice, qualifier: &Slice, timestamp: u64) -> bool {
        self.row_marker(row).is_some_and(|m| timestamp <= m)
            || self
                .column_marker(row, qualifier)
                .is_some_and(|m| timestamp <= m)
    }

    fn purge(&self, keys: &[CellKey]) {
        for key in keys {
            if let Some(entry) = self.cells.remove(key) {
                self.release(entry.key().approximate_size() + entry.value().size());
            }
        }
    }

    fn release(&self, bytes: usize) {
        let _ = self
            .approximate_memory
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cur| {
                Some(cur.saturating_sub(bytes))
            });
    }
}

impl Default for CellMemTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Slice {
        Slice::from(v)
    }

    fn all_versions(mem: &CellMemTable, row: &str) -> Vec<(String, u64, String)> {
        mem.read_row(&s(row), &ColumnSelection::All, u32::MAX, TimeRange::all())
            .into_iter()
            .map(|v| (v.qualifier.to_string(), v.timestamp, v.value.to_string()))
            .collect()
    }

    #[test]
    fn test_memtable_put_get() {
        let mem = CellMemTable::new();
        assert!(mem.add(&s("row1"), &s("title"), 1, s("hello")));

        let cells = mem.read_row(&s("row1"), &ColumnSelection::All, 1, TimeRange::all());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].qualifier, s("title"));
        assert_eq!(cells[0].value, s("hello"));
        assert_eq!(cells[0].timestamp, 1);
    }

    #[test]
    fn test_versions_newest_first() {
        let mem = CellMemTable::new();
        mem.add(&s("r"), &s("q"), 1, s("v1"));
        mem.add(&s("r"), &s("q"), 3, s("v3"));
        mem.add(&s("r"), &s("q"), 2, s("v2"));

        assert_eq!(
            all_versions(&mem, "r"),
            vec![
                ("q".to_string(), 3, "v3".to_string()),
                ("q".to_string(), 2, "v2".to_string()),
                ("q".to_string(), 1, "v1".to_string()),
            ]
        );

        let newest = mem.read_row(&s("r"), &ColumnSelection::All, 1, TimeRange::all());
        assert_eq!(newest.len(), 1);
        assert_eq!(newest[0].value, s("v3"));
    }

    #[test]
    fn test_same_timestamp_overwrites() {
        let mem = CellMemTable::new();
        mem.add(&s("r"), &s("q"), 7, s("first"));
        mem.add(&s("r"), &s("q"), 7, s("second"));

        assert_eq!(all_versions(&mem, "r"), vec![("q".to_string(), 7, "second".to_string())]);
    }

    #[test]
    fn test_column_selection() {
        let mem = CellMemTable::new();
        mem.add(&s("r"), &s("a"), 1, s("va"));
        mem.add(&s("r"), &s("b"), 1, s("vb"));

        let only_b = ColumnSelection::Only([s("b")].into_iter().collect());
        let cells = mem.read_row(&s("r"), &only_b, 1, TimeRange::all());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].qualifier, s("b"));
    }

    #[test]
    fn test_time_range() {
        let mem = CellMemTable::new();
        for ts in 1..=5 {
            mem.add(&s("r"), &s("q"), ts, Slice::from(format!("v{ts}")));
        }

        let cells = mem.read_row(&s("r"), &ColumnSelection::All, 10, TimeRange::new(2, 4));
        let stamps: Vec<u64> = cells.iter().map(|c| c.timestamp).collect();
        assert_eq!(stamps, vec![3, 2]);
    }

    #[test]
    fn test_delete_column_masks_older_versions() {
        let mem = CellMemTable::new();
        mem.add(&s("r"), &s("a"), 1, s("a1"));
        mem.add(&s("r"), &s("a"), 2, s("a2"));
        mem.add(&s("r"), &s("b"), 1, s("b1"));

        mem.delete_column(&s("r"), &s("a"), 2);
        assert_eq!(all_versions(&mem, "r"), vec![("b".to_string(), 1, "b1".to_string())]);

        // Older explicit timestamp stays masked, newer one is visible.
        assert!(!mem.add(&s("r"), &s("a"), 2, s("late")));
        assert!(mem.add(&s("r"), &s("a"), 3, s("a3")));
        assert_eq!(
            all_versions(&mem, "r"),
            vec![
                ("a".to_string(), 3, "a3".to_string()),
                ("b".to_string(), 1, "b1".to_string()),
            ]
        );
    }

    #[test]
    fn test_delete_row() {
        let mem = CellMemTable::new();
        mem.add(&s("r"), &s("a"), 1, s("a1"));
        mem.add(&s("r"), &s("b"), 2, s("b2"));
        mem.add(&s("s"), &s("a"), 1, s("keep"));

        mem.delete_row(&s("r"), 5);
        assert!(all_versions(&mem, "r").is_empty());
        assert_eq!(all_versions(&mem, "s").len(), 1);

        assert!(!mem.add(&s("r"), &s("a"), 4, s("old")));
        assert!(mem.add(&s("r"), &s("a"), 6, s("new")));
        assert_eq!(all_versions(&mem, "r"), vec![("a".to_string(), 6, "new".to_string())]);
    }

    #[test]
    fn test_row_marker_never_moves_backwards() {
        let mem = CellMemTable::new();
        mem.delete_row(&s("r"), 10);
        mem.delete_row(&s("r"), 5);
        assert!(!mem.add(&s("r"), &s("q"), 8, s("masked")));
    }

    #[test]
    fn test_prune_versions() {
        let mem = CellMemTable::new();
        for ts in 1..=6 {
            mem.add(&s("r"), &s("q"), ts, Slice::from(format!("v{ts}")));
        }

        assert_eq!(mem.prune_versions(&s("r"), &s("q"), 3), 3);
        let stamps: Vec<u64> = all_versions(&mem, "r").iter().map(|c| c.1).collect();
        assert_eq!(stamps, vec![6, 5, 4]);
        assert_eq!(mem.prune_versions(&s("r"), &s("q"), 3), 0);
    }

    #[test]
    fn test_next_row_from() {
        let mem = CellMemTable::new();
        mem.add(&s("b"), &s("q"), 1, s("1"));
        mem.add(&s("d"), &s("q"), 1, s("1"));

        assert_eq!(mem.next_row_from(Bound::Unbounded), Some(s("b")));
        assert_eq!(mem.next_row_from(Bound::Included(&s("b"))), Some(s("b")));
        assert_eq!(mem.next_row_from(Bound::Excluded(&s("b"))), Some(s("d")));
        assert_eq!(mem.next_row_from(Bound::Included(&s("c"))), Some(s("d")));
        assert_eq!(mem.next_row_from(Bound::Excluded(&s("d"))), None);
    }

    #[test]
    fn test_memory_usage() {
        let mem = CellMemTable::new();
        assert_eq!(mem.approximate_memory_usage(), 0);

        mem.add(&s("r"), &s("q"), 1, s("value"));
        let after_put = mem.approximate_memory_usage();
        assert!(after_put > 0);

        mem.add(&s("r"), &s("q"), 2, s("value"));
        mem.prune_versions(&s("r"), &s("q"), 1);
        assert_eq!(mem.approximate_memory_usage(), after_put);
    }

    #[test]
    fn test_repeated_column_deletes_keep_one_marker() {
        let mem = CellMemTable::new();
        mem.add(&s("r"), &s("q"), 3, s("v3"));
        mem.delete_column(&s("r"), &s("q"), 5);
        assert_eq!(mem.len(), 1);

        // Lower marker is a no-op, higher one replaces the old marker.
        mem.delete_column(&s("r"), &s("q"), 4);
        assert_eq!(mem.len(), 1);
        assert!(!mem.add(&s("r"), &s("q"), 5, s("masked")));

        assert!(mem.add(&s("r"), &s("q"), 8, s("v8")));
        mem.delete_column(&s("r"), &s("q"), 10);
        assert_eq!(mem.len(), 1);
        assert!(!mem.add(&s("r"), &s("q"), 9, s("masked")));
        assert!(mem.add(&s("r"), &s("q"), 11, s("v11")));
        assert_eq!(all_versions(&mem, "r"), vec![("q".to_string(), 11, "v11".to_string())]);
    }

    #[test]
    fn test_hot_cell_read_visits_few_entries() {
        let mem = CellMemTable::new();
        for ts in 1..=10_000 {
            mem.add(&s("r"), &s("q"), ts, s("v"));
        }
        mem.add(&s("r"), &s("other"), 1, s("o"));

        let (cells, visited) =
            mem.read_row_counted(&s("r"), &ColumnSelection::All, 1, TimeRange::all());
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].timestamp, 10_000);
        assert!(visited <= 10, "visited {visited} entries");

        let only_q = ColumnSelection::Only([s("q")].into_iter().collect());
        let (cells, visited) = mem.read_row_counted(&s("r"), &only_q, 3, TimeRange::all());
        let stamps: Vec<u64> = cells.iter().map(|c| c.timestamp).collect();
        assert_eq!(stamps, vec![10_000, 9_999, 9_998]);
        assert!(visited <= 6, "visited {visited} entries");

        let (cells, visited) =
            mem.read_row_counted(&s("r"), &only_q, 1, TimeRange::new(0, 101));
        assert_eq!(cells[0].timestamp, 100);
        assert!(visited <= 3, "visited {visited} entries");
    }

    #[test]
    fn test_selected_qualifier_skips_siblings() {
        let mem = CellMemTable::new();
        for i in 0..1_000 {
            mem.add(&s("r"), &Slice::from(format!("q{i:04}")), 1, s("v"));
        }

        let only = ColumnSelection::Only([s("q0500")].into_iter().collect());
        let (cells, visited) = mem.read_row_counted(&s("r"), &only, 1, TimeRange::all());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].qualifier, s("q0500"));
        assert!(visited <= 3, "visited {visited} entries");
    }

    #[test]
    fn test_read_below_column_marker_stops_early() {
        let mem = CellMemTable::new();
        for ts in 1..=50 {
            mem.add(&s("r"), &s("q"), ts, s("old"));
        }
        mem.delete_column(&s("r"), &s("q"), 50);
        mem.add(&s("r"), &s("q"), 51, s("new"));

        let (cells, visited) =
            mem.read_row_counted(&s("r"), &ColumnSelection::All, u32::MAX, TimeRange::all());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].value, s("new"));
        assert!(visited <= 6, "visited {visited} entries");
    }
}
