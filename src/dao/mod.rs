//! Column-family data-access facade
//!
//! [`ColumnFamilyDataAccess`] is the string-oriented entry point for
//! applications: create and drop tables, write and update cells, read the
//! newest or several versions of a cell, scan row ranges, and delete columns
//! or whole rows. Every call is an independent round trip over a
//! [`Connection`]; the facade holds no state besides its options.
//!
//! Byte-level row keys and finer control (explicit timestamps, time ranges,
//! scan limits) are available through [`crate::client::Table`].
//!
//! ```ignore
//! let dao = ColumnFamilyDataAccess::new(connection, AccessOptions::default());
//! dao.create_table("blog", &["article", "author"])?;
//!
//! let mut mutations = FamilyMutations::new();
//! mutations.entry("article".into()).or_default().insert("title".into(), b"Head First HBase".to_vec());
//! dao.put("blog", "row1", &mutations)?;
//!
//! for row in dao.scan("blog", Some("a"), Some("m"))? {
//!     println!("{}", row?);
//! }
//! ```

use std::{collections::BTreeMap, fmt};

use tracing::{debug, info};

use crate::{
    catalog::TableDescriptor,
    client::{Cell, Connection, Delete, Get, Put, ResultScanner, RowResult, Scan},
    config::{AccessOptions, Config},
    util::{Result, Slice, Status},
};

/// Family name to (column name to value).
pub type FamilyMutations = BTreeMap<String, BTreeMap<String, Vec<u8>>>;

/// One returned version of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRecord {
    pub row: Slice,
    pub family: String,
    pub column: Slice,
    pub value: Slice,
    pub timestamp: u64,
}

impl From<Cell> for CellRecord {
    fn from(cell: Cell) -> Self {
        CellRecord {
            row: cell.row,
            family: cell.family,
            column: cell.qualifier,
            value: cell.value,
            timestamp: cell.timestamp,
        }
    }
}

impl fmt::Display for CellRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row: {}, family: {}, column: {}, value: {}, timestamp: {}",
            self.row, self.family, self.column, self.value, self.timestamp
        )
    }
}

/// Cells of one row, ordered by family, column, then newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    pub row: Slice,
    pub cells: Vec<CellRecord>,
}

impl RowRecord {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Newest value of a column, if present.
    pub fn value(&self, family: &str, column: &str) -> Option<&Slice> {
        self.cells
            .iter()
            .find(|c| c.family == family && c.column.data() == column.as_bytes())
            .map(|c| &c.value)
    }
}

impl From<RowResult> for RowRecord {
    fn from(result: RowResult) -> Self {
        let row = result.row().clone();
        RowRecord {
            row,
            cells: result.into_cells().into_iter().map(CellRecord::from).collect(),
        }
    }
}

impl fmt::Display for RowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row: {} ({} cells)", self.row, self.cells.len())?;
        for cell in &self.cells {
            write!(f, "\n  {cell}")?;
        }
        Ok(())
    }
}

/// Lazy sequence of rows returned by [`ColumnFamilyDataAccess::scan`].
pub struct Rows {
    table: String,
    scanner: ResultScanner,
}

impl Iterator for Rows {
    type Item = Result<RowRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.scanner.next()?;
        Some(item.map(|result| {
            let record = RowRecord::from(result);
            debug!(table = %self.table, row = %record.row, cells = record.cells.len(), "scanned row");
            record
        }))
    }
}

pub struct ColumnFamilyDataAccess {
    connection: Connection,
    options: AccessOptions,
}

impl ColumnFamilyDataAccess {
    pub fn new(connection: Connection, options: AccessOptions) -> Self {
        ColumnFamilyDataAccess {
            connection,
            options,
        }
    }

    /// Facade over a fresh embedded store configured by `config`.
    pub fn from_config(config: &Config) -> Self {
        ColumnFamilyDataAccess::new(Connection::from_config(config), config.access.clone())
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn options(&self) -> &AccessOptions {
        &self.options
    }

    /// Create `table` with the given families and default family options.
    ///
    /// An existing table is left untouched and `AlreadyExists` is returned.
    pub fn create_table<F: AsRef<str>>(&self, table: &str, families: &[F]) -> Result<()> {
        self.connection
            .admin()
            .create_table(&TableDescriptor::with_family_names(table, families))?;
        info!(table, "table created");
        Ok(())
    }

    /// Write every (family, column, value) of `mutations` as one row
    /// mutation sharing one timestamp.
    pub fn put(&self, table: &str, row: &str, mutations: &FamilyMutations) -> Result<()> {
        let mut put = Put::new(row);
        for (family, columns) in mutations {
            if columns.is_empty() {
                return Err(Status::invalid_argument(format!(
                    "family '{family}' has no columns to write"
                )));
            }
            for (column, value) in columns {
                put = put.add_column(family.as_str(), column.as_str(), value.as_slice());
            }
        }

        self.connection.table(table).put(&put)?;
        info!(table, row, cells = put.cell_count(), "put row");
        Ok(())
    }

    /// Newest version of every cell of a row, optionally narrowed to one
    /// family or one column.
    pub fn get(
        &self,
        table: &str,
        row: &str,
        family: Option<&str>,
        column: Option<&str>,
    ) -> Result<RowRecord> {
        let get = match (family, column) {
            (None, None) => Get::new(row),
            (Some(family), None) => Get::new(row).add_family(family),
            (Some(family), Some(column)) => Get::new(row).add_column(family, column),
            (None, Some(column)) => {
                return Err(Status::invalid_argument(format!(
                    "column '{column}' given without a family"
                )));
            },
        };

        let record = RowRecord::from(self.connection.table(table).get(&get)?);
        info!(table, row, cells = record.cells.len(), "get row");
        for cell in &record.cells {
            debug!(%cell, "read cell");
        }
        Ok(record)
    }

    /// Up to `max_versions` versions of one column, newest first.
    ///
    /// Without `max_versions` the configured `read_versions` is used.
    pub fn get_with_versions(
        &self,
        table: &str,
        row: &str,
        family: &str,
        column: &str,
        max_versions: Option<u32>,
    ) -> Result<Vec<CellRecord>> {
        let versions = max_versions.unwrap_or(self.options.read_versions);
        let get = Get::new(row)
            .add_column(family, column)
            .max_versions(versions);

        let cells: Vec<CellRecord> = self
            .connection
            .table(table)
            .get(&get)?
            .into_cells()
            .into_iter()
            .map(CellRecord::from)
            .collect();
        info!(table, row, family, column, versions = cells.len(), "get versions");
        for cell in &cells {
            debug!(%cell, "read version");
        }
        Ok(cells)
    }

    /// Rows in `[start, stop)` in ascending key order. Missing bounds are
    /// open.
    pub fn scan(&self, table: &str, start: Option<&str>, stop: Option<&str>) -> Result<Rows> {
        let mut scan = Scan::new();
        if let Some(start) = start {
            scan = scan.with_start_row(start);
        }
        if let Some(stop) = stop {
            scan = scan.with_stop_row(stop);
        }

        let scanner = self.connection.table(table).scan(&scan)?;
        info!(table, ?start, ?stop, "scan opened");
        Ok(Rows {
            table: table.to_string(),
            scanner,
        })
    }

    /// Add a new version of one column. Older versions are kept subject to
    /// the family's retention.
    pub fn update(
        &self,
        table: &str,
        row: &str,
        family: &str,
        column: &str,
        value: impl Into<Slice>,
    ) -> Result<()> {
        let put = Put::new(row).add_column(family, column, value);
        self.connection.table(table).put(&put)?;
        info!(table, row, family, column, "updated column");
        Ok(())
    }

    /// Remove every version of one column. Other columns of the row stay.
    pub fn delete_column(&self, table: &str, row: &str, family: &str, column: &str) -> Result<()> {
        let delete = Delete::new(row).add_column(family, column);
        self.connection.table(table).delete(&delete)?;
        info!(table, row, family, column, "deleted column");
        Ok(())
    }

    /// Remove every cell of a row in every family.
    pub fn delete_row(&self, table: &str, row: &str) -> Result<()> {
        self.connection.table(table).delete(&Delete::new(row))?;
        info!(table, row, "deleted row");
        Ok(())
    }

    /// Disable `table` if needed, then delete it.
    pub fn drop_table(&self, table: &str) -> Result<()> {
        let admin = self.connection.admin();
        if admin.is_table_enabled(table)? {
            admin.disable_table(table)?;
        }
        admin.delete_table(table)?;
        info!(table, "table dropped");
        Ok(())
    }

    pub fn disable_table(&self, table: &str) -> Result<()> {
        self.connection.admin().disable_table(table)
    }

    pub fn enable_table(&self, table: &str) -> Result<()> {
        self.connection.admin().enable_table(table)
    }

    pub fn table_exists(&self, table: &str) -> bool {
        self.connection.admin().table_exists(table)
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.connection.admin().list_tables()
    }
}
