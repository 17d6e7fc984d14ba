use crate::{client::RowResult, util::Result};

/// Lazy, forward-only sequence of rows produced by a scan.
///
/// Rows are fetched one at a time as the scanner advances. After the first
/// error the scanner is exhausted.
///
/// ```ignore
/// let mut scanner = table.scan(&Scan::new().with_start_row("a").with_stop_row("m"))?;
/// for row in scanner {
///     let row = row?;
///     println!("{}", row.row());
/// }
/// ```
pub struct ResultScanner {
    inner: Box<dyn Iterator<Item = Result<RowResult>> + Send>,
    done: bool,
}

impl ResultScanner {
    pub fn new(inner: Box<dyn Iterator<Item = Result<RowResult>> + Send>) -> Self {
        ResultScanner { inner, done: false }
    }

    /// A scanner that yields nothing.
    pub fn empty() -> Self {
        ResultScanner {
            inner: Box::new(std::iter::empty()),
            done: true,
        }
    }

    /// Drain the scanner into a vector, stopping at the first error.
    pub fn collect_rows(self) -> Result<Vec<RowResult>> {
        self.collect()
    }
}

impl Iterator for ResultScanner {
    type Item = Result<RowResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next() {
            Some(Ok(row)) => Some(Ok(row)),
            Some(Err(e)) => {
                self.done = true;
                Some(Err(e))
            },
            None => {
                self.done = true;
                None
            },
        }
    }
}
