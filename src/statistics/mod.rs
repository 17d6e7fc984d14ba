use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Store-wide statistics
///
/// Thread-safe statistics tracking for all store operations.
/// Uses atomic counters for lock-free updates.
#[derive(Debug, Default)]
pub struct Statistics {
    // Mutations
    pub num_puts: AtomicU64,
    pub num_cells_written: AtomicU64,
    pub num_cells_masked: AtomicU64,
    pub num_deletes: AtomicU64,
    pub bytes_written: AtomicU64,

    // Reads
    pub num_gets: AtomicU64,
    pub num_cells_read: AtomicU64,
    pub bytes_read: AtomicU64,

    // Scans
    pub num_scans: AtomicU64,
    pub num_rows_scanned: AtomicU64,

    // Versions dropped by family retention
    pub num_versions_pruned: AtomicU64,

    // Table lifecycle
    pub num_tables_created: AtomicU64,
    pub num_tables_deleted: AtomicU64,

    // Error counts
    pub num_errors: AtomicU64,
}

/// Plain copy of the counters at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatisticsSnapshot {
    pub puts: u64,
    pub cells_written: u64,
    pub cells_masked: u64,
    pub deletes: u64,
    pub bytes_written: u64,
    pub gets: u64,
    pub cells_read: u64,
    pub bytes_read: u64,
    pub scans: u64,
    pub rows_scanned: u64,
    pub versions_pruned: u64,
    pub tables_created: u64,
    pub tables_deleted: u64,
    pub errors: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    #[inline]
    pub fn record_put(&self, cells: u64, masked: u64, bytes: u64) {
        self.num_puts.fetch_add(1, Ordering::Relaxed);
        self.num_cells_written.fetch_add(cells, Ordering::Relaxed);
        self.num_cells_masked.fetch_add(masked, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_delete(&self) {
        self.num_deletes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_get(&self, cells: u64, bytes: u64) {
        self.num_gets.fetch_add(1, Ordering::Relaxed);
        self.record_cells_read(cells, bytes);
    }

    #[inline]
    pub fn record_scan(&self) {
        self.num_scans.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_scanned_row(&self, cells: u64, bytes: u64) {
        self.num_rows_scanned.fetch_add(1, Ordering::Relaxed);
        self.record_cells_read(cells, bytes);
    }

    #[inline]
    pub fn record_versions_pruned(&self, versions: u64) {
        self.num_versions_pruned
            .fetch_add(versions, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_table_created(&self) {
        self.num_tables_created.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_table_deleted(&self) {
        self.num_tables_deleted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_error(&self) {
        self.num_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_cells_read(&self, cells: u64, bytes: u64) {
        self.num_cells_read.fetch_add(cells, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            puts: self.num_puts.load(Ordering::Relaxed),
            cells_written: self.num_cells_written.load(Ordering::Relaxed),
            cells_masked: self.num_cells_masked.load(Ordering::Relaxed),
            deletes: self.num_deletes.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            gets: self.num_gets.load(Ordering::Relaxed),
            cells_read: self.num_cells_read.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            scans: self.num_scans.load(Ordering::Relaxed),
            rows_scanned: self.num_rows_scanned.load(Ordering::Relaxed),
            versions_pruned: self.num_versions_pruned.load(Ordering::Relaxed),
            tables_created: self.num_tables_created.load(Ordering::Relaxed),
            tables_deleted: self.num_tables_deleted.load(Ordering::Relaxed),
            errors: self.num_errors.load(Ordering::Relaxed),
        }
    }

    /// Reset all statistics to zero
    pub fn reset(&self) {
        self.num_puts.store(0, Ordering::Relaxed);
        self.num_cells_written.store(0, Ordering::Relaxed);
        self.num_cells_masked.store(0, Ordering::Relaxed);
        self.num_deletes.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.num_gets.store(0, Ordering::Relaxed);
        self.num_cells_read.store(0, Ordering::Relaxed);
        self.bytes_read.store(0, Ordering::Relaxed);
        self.num_scans.store(0, Ordering::Relaxed);
        self.num_rows_scanned.store(0, Ordering::Relaxed);
        self.num_versions_pruned.store(0, Ordering::Relaxed);
        self.num_tables_created.store(0, Ordering::Relaxed);
        self.num_tables_deleted.store(0, Ordering::Relaxed);
        self.num_errors.store(0, Ordering::Relaxed);
    }

    /// Get a formatted statistics report
    pub fn report(&self) -> String {
        self.snapshot().to_string()
    }
}

impl fmt::Display for StatisticsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store Statistics:\n\
            \n\
            Mutations:\n\
            - Puts:          {}\n\
            - Cells written: {}\n\
            - Cells masked:  {}\n\
            - Deletes:       {}\n\
            - Bytes written: {} ({:.2} MB)\n\
            - Pruned:        {}\n\
            \n\
            Reads:\n\
            - Gets:          {}\n\
            - Scans:         {}\n\
            - Rows scanned:  {}\n\
            - Cells read:    {}\n\
            - Bytes read:    {} ({:.2} MB)\n\
            \n\
            Tables:\n\
            - Created:       {}\n\
            - Deleted:       {}\n\
            \n\
            Errors:          {}",
            self.puts,
            self.cells_written,
            self.cells_masked,
            self.deletes,
            self.bytes_written,
            self.bytes_written as f64 / 1024.0 / 1024.0,
            self.versions_pruned,
            self.gets,
            self.scans,
            self.rows_scanned,
            self.cells_read,
            self.bytes_read,
            self.bytes_read as f64 / 1024.0 / 1024.0,
            self.tables_created,
            self.tables_deleted,
            self.errors,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_basic() {
        let stats = Statistics::new();

        stats.record_put(2, 0, 100);
        stats.record_put(1, 1, 200);
        stats.record_get(3, 50);

        let s = stats.snapshot();
        assert_eq!(s.puts, 2);
        assert_eq!(s.cells_written, 3);
        assert_eq!(s.cells_masked, 1);
        assert_eq!(s.bytes_written, 300);
        assert_eq!(s.gets, 1);
        assert_eq!(s.cells_read, 3);
        assert_eq!(s.bytes_read, 50);
    }

    #[test]
    fn test_scan_counters() {
        let stats = Statistics::new();

        stats.record_scan();
        stats.record_scanned_row(2, 10);
        stats.record_scanned_row(1, 5);

        let s = stats.snapshot();
        assert_eq!(s.scans, 1);
        assert_eq!(s.rows_scanned, 2);
        assert_eq!(s.cells_read, 3);
        assert_eq!(s.gets, 0);
    }

    #[test]
    fn test_statistics_reset() {
        let stats = Statistics::new();

        stats.record_put(1, 0, 100);
        stats.record_delete();
        stats.record_error();
        assert!(stats.snapshot().puts > 0);

        stats.reset();
        assert_eq!(stats.snapshot(), StatisticsSnapshot::default());
    }

    #[test]
    fn test_statistics_report() {
        let stats = Statistics::new();

        stats.record_put(1, 0, 1024);
        stats.record_table_created();

        let report = stats.report();
        assert!(report.contains("Puts:          1"));
        assert!(report.contains("Created:       1"));
        assert!(report.contains("Errors:          0"));
    }
}
