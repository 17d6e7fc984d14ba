use std::{ops::Bound, sync::Arc};

use crate::{
    catalog::TableData,
    client::{RowResult, Scan},
    memtable::{ColumnSelection, TimeRange},
    statistics::Statistics,
    store::local_store::read_row,
    util::{Result, Slice},
};

/// Row-at-a-time scanner over one table.
///
/// The scanner keeps no snapshot. Each step finds the smallest row past the
/// cursor across the selected families and reads it under its row lock, so
/// a row is always seen either entirely before or entirely after any
/// concurrent mutation of it. Rows that end up with no visible cells are
/// skipped.
pub(super) struct LocalScanner {
    table: Arc<TableData>,
    families: Vec<(String, ColumnSelection)>,
    cursor: Bound<Slice>,
    stop_row: Option<Slice>,
    max_versions: u32,
    time_range: TimeRange,
    remaining: Option<usize>,
    statistics: Arc<Statistics>,
    done: bool,
}

impl LocalScanner {
    pub(super) fn new(
        table: Arc<TableData>,
        families: Vec<(String, ColumnSelection)>,
        scan: &Scan,
        statistics: Arc<Statistics>,
    ) -> Self {
        let cursor = match scan.start_row() {
            Some(start) => Bound::Included(start.clone()),
            None => Bound::Unbounded,
        };
        LocalScanner {
            table,
            families,
            cursor,
            stop_row: scan.stop_row().cloned(),
            max_versions: scan.get_max_versions(),
            time_range: scan.get_time_range(),
            remaining: scan.get_limit(),
            statistics,
            done: false,
        }
    }

    fn next_candidate(&self) -> Option<Slice> {
        self.families
            .iter()
            .filter_map(|(name, _)| self.table.families().get(name))
            .filter_map(|cf| cf.mem().next_row_from(self.cursor.as_ref()))
            .min()
    }

    fn advance(&mut self) -> Option<Result<RowResult>> {
        loop {
            if self.remaining == Some(0) {
                return None;
            }
            let _enabled = match self.table.enabled() {
                Ok(guard) => guard,
                Err(e) => return Some(Err(e)),
            };

            let row = self.next_candidate()?;
            if let Some(stop) = &self.stop_row
                && &row >= stop
            {
                return None;
            }
            self.cursor = Bound::Excluded(row.clone());

            let result = read_row(
                &self.table,
                &row,
                &self.families,
                self.max_versions,
                self.time_range,
            );
            if result.is_empty() {
                continue;
            }

            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= 1;
            }
            self.statistics
                .record_scanned_row(result.len() as u64, result.approximate_size());
            return Some(Ok(result));
        }
    }
}

impl Iterator for LocalScanner {
    type Item = Result<RowResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.advance();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}
