use std::fmt;

use crate::util::Slice;

/// One version of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: Slice,
    pub family: String,
    pub qualifier: Slice,
    pub timestamp: u64,
    pub value: Slice,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{}/{} = {}",
            self.row, self.family, self.qualifier, self.timestamp, self.value
        )
    }
}

/// Cells of one row, ordered by family, then qualifier, then newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowResult {
    row: Slice,
    cells: Vec<Cell>,
}

impl RowResult {
    pub fn new(row: Slice, cells: Vec<Cell>) -> Self {
        RowResult { row, cells }
    }

    pub fn empty(row: Slice) -> Self {
        RowResult {
            row,
            cells: Vec::new(),
        }
    }

    pub fn row(&self) -> &Slice {
        &self.row
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Newest value of a column, if present.
    pub fn value(&self, family: &str, qualifier: impl AsRef<[u8]>) -> Option<&Slice> {
        self.column_cells(family, qualifier)
            .into_iter()
            .next()
            .map(|cell| &cell.value)
    }

    /// All returned versions of a column, newest first.
    pub fn column_cells(&self, family: &str, qualifier: impl AsRef<[u8]>) -> Vec<&Cell> {
        let qualifier = qualifier.as_ref();
        self.cells
            .iter()
            .filter(|c| c.family == family && c.qualifier.data() == qualifier)
            .collect()
    }

    pub(crate) fn approximate_size(&self) -> u64 {
        self.cells
            .iter()
            .map(|c| (c.qualifier.size() + c.value.size()) as u64)
            .sum()
    }
}
