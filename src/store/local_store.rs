use std::{collections::BTreeMap, sync::Arc};

use tracing::{debug, info};

use crate::{
    catalog::{Catalog, TableData, TableDescriptor},
    client::{Cell, Delete, DeleteTarget, Get, Put, ResultScanner, RowResult, Scan},
    column_family::WriteOutcome,
    config::StoreOptions,
    memtable::{ColumnSelection, TimeRange},
    statistics::{Statistics, StatisticsSnapshot},
    store::{Store, local_scanner::LocalScanner},
    util::{Result, Slice, TimestampOracle},
};

/// Embedded, in-memory [`Store`].
///
/// Tables live in a [`Catalog`]; each family keeps its versioned cells in a
/// skiplist memtable. Mutations of one row are serialized by the table's
/// striped row locks and stamped by a store-wide [`TimestampOracle`].
pub struct LocalStore {
    catalog: Catalog,
    oracle: TimestampOracle,
    options: StoreOptions,
    statistics: Arc<Statistics>,
}

impl LocalStore {
    pub fn new(options: StoreOptions) -> Self {
        LocalStore {
            catalog: Catalog::new(),
            oracle: TimestampOracle::new(),
            options,
            statistics: Arc::new(Statistics::new()),
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Live counters, shared with open scanners.
    pub fn statistics_handle(&self) -> &Arc<Statistics> {
        &self.statistics
    }

    /// Approximate bytes held by a table's cells.
    pub fn approximate_memory_usage(&self, table: &str) -> Result<usize> {
        Ok(self.catalog.get(table)?.families().approximate_memory_usage())
    }

    fn track<T>(&self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.statistics.record_error();
        }
        result
    }

    fn do_create_table(&self, descriptor: &TableDescriptor) -> Result<()> {
        let mut descriptor = descriptor.clone();
        if let Some(default_max) = self.options.default_max_versions {
            for family in &mut descriptor.families {
                family.options.max_versions.get_or_insert(default_max);
            }
        }
        self.catalog
            .create(&descriptor, self.options.row_lock_stripes)?;
        self.statistics.record_table_created();
        info!(
            table = %descriptor.name,
            families = ?descriptor.family_names(),
            "created table"
        );
        Ok(())
    }

    fn do_put(&self, table: &str, put: &Put) -> Result<()> {
        put.validate()?;
        let table = self.catalog.get(table)?;
        let _enabled = table.enabled()?;

        // Resolve every family before touching any of them so that a bad
        // family name leaves the row unchanged.
        let families = put
            .families()
            .iter()
            .map(|(name, cells)| Ok((table.families().require(table.name(), name)?, cells)))
            .collect::<Result<Vec<_>>>()?;

        let row = put.row();
        let _guard = table.row_locks().write(row);
        let timestamp = self.oracle.next();

        let mut written = 0u64;
        let mut masked = 0u64;
        let mut bytes = 0u64;
        for (cf, cells) in families {
            for cell in cells {
                let ts = cell.timestamp.unwrap_or(timestamp);
                match cf.put(row, &cell.qualifier, ts, cell.value.clone()) {
                    WriteOutcome::Stored { pruned } => {
                        written += 1;
                        bytes += (cell.qualifier.size() + cell.value.size()) as u64;
                        if pruned > 0 {
                            self.statistics.record_versions_pruned(pruned as u64);
                        }
                    },
                    WriteOutcome::Masked => masked += 1,
                }
            }
        }

        self.statistics
            .record_put(written, masked, row.size() as u64 + bytes);
        debug!(
            table = %table.name(),
            row = %row,
            timestamp,
            written,
            masked,
            "applied put"
        );
        Ok(())
    }

    fn do_get(&self, table: &str, get: &Get) -> Result<RowResult> {
        get.validate()?;
        let table = self.catalog.get(table)?;
        let _enabled = table.enabled()?;
        let families = resolve_families(&table, get.families())?;

        let result = read_row(
            &table,
            get.row(),
            &families,
            get.get_max_versions(),
            get.get_time_range(),
        );
        self.statistics
            .record_get(result.len() as u64, result.approximate_size());
        Ok(result)
    }

    fn do_scan(&self, table: &str, scan: &Scan) -> Result<ResultScanner> {
        scan.validate()?;
        let table = self.catalog.get(table)?;
        // Each scanner step checks again.
        drop(table.enabled()?);
        let families = resolve_families(&table, scan.families())?;

        self.statistics.record_scan();
        debug!(
            table = %table.name(),
            start = ?scan.start_row(),
            stop = ?scan.stop_row(),
            "opened scanner"
        );

        if scan.is_empty_range() {
            return Ok(ResultScanner::empty());
        }
        let scanner = LocalScanner::new(table, families, scan, Arc::clone(&self.statistics));
        Ok(ResultScanner::new(Box::new(scanner)))
    }

    fn do_delete(&self, table: &str, delete: &Delete) -> Result<()> {
        delete.validate()?;
        let table = self.catalog.get(table)?;
        let _enabled = table.enabled()?;

        for target in delete.targets() {
            let family = match target {
                DeleteTarget::Column { family, .. } | DeleteTarget::Family(family) => family,
            };
            table.families().require(table.name(), family)?;
        }

        let row = delete.row();
        let _guard = table.row_locks().write(row);
        let timestamp = delete.timestamp().unwrap_or_else(|| self.oracle.next());

        if delete.is_whole_row() {
            for cf in table.families().iter() {
                cf.mem().delete_row(row, timestamp);
            }
        } else {
            for target in delete.targets() {
                match target {
                    DeleteTarget::Column { family, qualifier } => {
                        table
                            .families()
                            .require(table.name(), family)?
                            .mem()
                            .delete_column(row, qualifier, timestamp);
                    },
                    DeleteTarget::Family(family) => {
                        table
                            .families()
                            .require(table.name(), family)?
                            .mem()
                            .delete_row(row, timestamp);
                    },
                }
            }
        }

        self.statistics.record_delete();
        debug!(table = %table.name(), row = %row, timestamp, "applied delete");
        Ok(())
    }

    fn do_disable_table(&self, table: &str) -> Result<()> {
        self.catalog.get(table)?.disable()?;
        info!(table, "disabled table");
        Ok(())
    }

    fn do_enable_table(&self, table: &str) -> Result<()> {
        self.catalog.get(table)?.enable()?;
        info!(table, "enabled table");
        Ok(())
    }

    fn do_delete_table(&self, table: &str) -> Result<()> {
        self.catalog.remove(table)?;
        self.statistics.record_table_deleted();
        info!(table, "deleted table");
        Ok(())
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}

impl Store for LocalStore {
    fn create_table(&self, descriptor: &TableDescriptor) -> Result<()> {
        self.track(self.do_create_table(descriptor))
    }

    fn table_exists(&self, table: &str) -> bool {
        self.catalog.exists(table)
    }

    fn list_tables(&self) -> Vec<String> {
        self.catalog.list()
    }

    fn describe_table(&self, table: &str) -> Result<TableDescriptor> {
        self.track(self.catalog.get(table).map(|t| t.descriptor()))
    }

    fn is_table_enabled(&self, table: &str) -> Result<bool> {
        self.track(self.catalog.get(table).map(|t| t.is_enabled()))
    }

    fn disable_table(&self, table: &str) -> Result<()> {
        self.track(self.do_disable_table(table))
    }

    fn enable_table(&self, table: &str) -> Result<()> {
        self.track(self.do_enable_table(table))
    }

    fn delete_table(&self, table: &str) -> Result<()> {
        self.track(self.do_delete_table(table))
    }

    fn put(&self, table: &str, put: &Put) -> Result<()> {
        self.track(self.do_put(table, put))
    }

    fn get(&self, table: &str, get: &Get) -> Result<RowResult> {
        self.track(self.do_get(table, get))
    }

    fn scan(&self, table: &str, scan: &Scan) -> Result<ResultScanner> {
        self.track(self.do_scan(table, scan))
    }

    fn delete(&self, table: &str, delete: &Delete) -> Result<()> {
        self.track(self.do_delete(table, delete))
    }

    fn statistics(&self) -> StatisticsSnapshot {
        self.statistics.snapshot()
    }
}

/// Families a read touches, in name order, with their column selections.
///
/// An empty request means every family of the table.
pub(super) fn resolve_families(
    table: &TableData,
    requested: &BTreeMap<String, ColumnSelection>,
) -> Result<Vec<(String, ColumnSelection)>> {
    if requested.is_empty() {
        let mut all: Vec<(String, ColumnSelection)> = table
            .families()
            .iter()
            .map(|cf| (cf.name().to_string(), ColumnSelection::All))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        return Ok(all);
    }

    requested
        .iter()
        .map(|(name, selection)| {
            table.families().require(table.name(), name)?;
            Ok((name.clone(), selection.clone()))
        })
        .collect()
}

/// Gather one row across families under the row's read lock.
pub(super) fn read_row(
    table: &TableData,
    row: &Slice,
    families: &[(String, ColumnSelection)],
    max_versions: u32,
    time_range: TimeRange,
) -> RowResult {
    let _guard = table.row_locks().read(row);

    let mut cells = Vec::new();
    for (name, selection) in families {
        let Some(cf) = table.families().get(name) else {
            continue;
        };
        for version in cf.read_row(row, selection, max_versions, time_range) {
            cells.push(Cell {
                row: row.clone(),
                family: name.clone(),
                qualifier: version.qualifier,
                timestamp: version.timestamp,
                value: version.value,
            });
        }
    }
    RowResult::new(row.clone(), cells)
}
