//! Line-oriented command shell over the data-access facade
//!
//! One command per line, whitespace separated. Blank lines and lines
//! starting with `#` are skipped. A failing command reports its error and
//! the shell carries on with the next line.
//!
//! ```text
//! create blog article author
//! put blog row1 article:title=Rust author:name=ann
//! get blog row1 article
//! versions blog row1 article:title 3
//! scan blog a m
//! update blog row1 article:title Rust2
//! delete blog row1 article:title
//! drop blog
//! ```

use std::io::{BufRead, Write};

use tracing::warn;

use crate::{
    dao::{ColumnFamilyDataAccess, FamilyMutations},
    util::{Result, Status},
};

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create {
        table: String,
        families: Vec<String>,
    },
    Put {
        table: String,
        row: String,
        mutations: FamilyMutations,
    },
    Get {
        table: String,
        row: String,
        family: Option<String>,
        column: Option<String>,
    },
    Versions {
        table: String,
        row: String,
        family: String,
        column: String,
        max_versions: Option<u32>,
    },
    Scan {
        table: String,
        start: Option<String>,
        stop: Option<String>,
    },
    Update {
        table: String,
        row: String,
        family: String,
        column: String,
        value: String,
    },
    DeleteColumn {
        table: String,
        row: String,
        family: String,
        column: String,
    },
    DeleteRow {
        table: String,
        row: String,
    },
    Disable(String),
    Enable(String),
    Drop(String),
    List,
    Stats,
}

fn usage(text: &str) -> Status {
    Status::invalid_argument(format!("usage: {text}"))
}

/// Split `family:column`.
fn split_column(selector: &str) -> Result<(String, String)> {
    match selector.split_once(':') {
        Some((family, column)) if !family.is_empty() => {
            Ok((family.to_string(), column.to_string()))
        },
        _ => Err(Status::invalid_argument(format!(
            "expected <family>:<column>, got '{selector}'"
        ))),
    }
}

/// Parse one input line. `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let (name, args) = (words[0], &words[1..]);

    let command = match (name, args) {
        ("create", [table, families @ ..]) if !families.is_empty() => Command::Create {
            table: table.to_string(),
            families: families.iter().map(|f| f.to_string()).collect(),
        },
        ("create", _) => return Err(usage("create <table> <family>...")),

        ("put", [table, row, cells @ ..]) if !cells.is_empty() => {
            let mut mutations = FamilyMutations::new();
            for cell in cells {
                let Some((column, value)) = cell.split_once('=') else {
                    return Err(usage("put <table> <row> <family>:<column>=<value>..."));
                };
                let (family, column) = split_column(column)?;
                mutations
                    .entry(family)
                    .or_default()
                    .insert(column, value.as_bytes().to_vec());
            }
            Command::Put {
                table: table.to_string(),
                row: row.to_string(),
                mutations,
            }
        },
        ("put", _) => return Err(usage("put <table> <row> <family>:<column>=<value>...")),

        ("get", [table, row]) => Command::Get {
            table: table.to_string(),
            row: row.to_string(),
            family: None,
            column: None,
        },
        ("get", [table, row, selector]) => {
            let (family, column) = match selector.split_once(':') {
                Some(_) => {
                    let (family, column) = split_column(selector)?;
                    (family, Some(column))
                },
                None => (selector.to_string(), None),
            };
            Command::Get {
                table: table.to_string(),
                row: row.to_string(),
                family: Some(family),
                column,
            }
        },
        ("get", _) => return Err(usage("get <table> <row> [<family>[:<column>]]")),

        ("versions", [table, row, column, rest @ ..]) if rest.len() <= 1 => {
            let (family, column) = split_column(column)?;
            let max_versions = match rest.first() {
                Some(n) => Some(n.parse::<u32>().map_err(|_| {
                    Status::invalid_argument(format!("'{n}' is not a version count"))
                })?),
                None => None,
            };
            Command::Versions {
                table: table.to_string(),
                row: row.to_string(),
                family,
                column,
                max_versions,
            }
        },
        ("versions", _) => return Err(usage("versions <table> <row> <family>:<column> [n]")),

        ("scan", [table, bounds @ ..]) if bounds.len() <= 2 => Command::Scan {
            table: table.to_string(),
            start: bounds.first().map(|s| s.to_string()),
            stop: bounds.get(1).map(|s| s.to_string()),
        },
        ("scan", _) => return Err(usage("scan <table> [<start> [<stop>]]")),

        ("update", [table, row, column, value]) => {
            let (family, column) = split_column(column)?;
            Command::Update {
                table: table.to_string(),
                row: row.to_string(),
                family,
                column,
                value: value.to_string(),
            }
        },
        ("update", _) => return Err(usage("update <table> <row> <family>:<column> <value>")),

        ("delete", [table, row]) => Command::DeleteRow {
            table: table.to_string(),
            row: row.to_string(),
        },
        ("delete", [table, row, column]) => {
            let (family, column) = split_column(column)?;
            Command::DeleteColumn {
                table: table.to_string(),
                row: row.to_string(),
                family,
                column,
            }
        },
        ("delete", _) => return Err(usage("delete <table> <row> [<family>:<column>]")),

        ("disable", [table]) => Command::Disable(table.to_string()),
        ("enable", [table]) => Command::Enable(table.to_string()),
        ("drop", [table]) => Command::Drop(table.to_string()),
        ("disable" | "enable" | "drop", _) => return Err(usage(&format!("{name} <table>"))),

        ("list", []) => Command::List,
        ("stats", []) => Command::Stats,

        _ => {
            return Err(Status::invalid_argument(format!(
                "unknown command '{line}'"
            )));
        },
    };
    Ok(Some(command))
}

/// Runs commands against one [`ColumnFamilyDataAccess`].
pub struct Shell {
    dao: ColumnFamilyDataAccess,
}

/// Outcome of running a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub executed: usize,
    pub failed: usize,
}

impl Shell {
    pub fn new(dao: ColumnFamilyDataAccess) -> Self {
        Shell { dao }
    }

    pub fn dao(&self) -> &ColumnFamilyDataAccess {
        &self.dao
    }

    /// Execute one command, writing its output lines to `out`.
    pub fn execute<W: Write>(&self, command: &Command, out: &mut W) -> Result<()> {
        match command {
            Command::Create { table, families } => {
                self.dao.create_table(table, families.as_slice())?;
                writeln!(out, "created {table}")?;
            },
            Command::Put {
                table,
                row,
                mutations,
            } => {
                self.dao.put(table, row, mutations)?;
                writeln!(out, "ok")?;
            },
            Command::Get {
                table,
                row,
                family,
                column,
            } => {
                let record = self
                    .dao
                    .get(table, row, family.as_deref(), column.as_deref())?;
                for cell in &record.cells {
                    writeln!(out, "{cell}")?;
                }
                writeln!(out, "{} cell(s)", record.cells.len())?;
            },
            Command::Versions {
                table,
                row,
                family,
                column,
                max_versions,
            } => {
                let cells = self
                    .dao
                    .get_with_versions(table, row, family, column, *max_versions)?;
                for cell in &cells {
                    writeln!(out, "{cell}")?;
                }
                writeln!(out, "{} version(s)", cells.len())?;
            },
            Command::Scan { table, start, stop } => {
                let mut rows = 0;
                for row in self.dao.scan(table, start.as_deref(), stop.as_deref())? {
                    writeln!(out, "{}", row?)?;
                    rows += 1;
                }
                writeln!(out, "{rows} row(s)")?;
            },
            Command::Update {
                table,
                row,
                family,
                column,
                value,
            } => {
                self.dao
                    .update(table, row, family, column, value.as_str())?;
                writeln!(out, "ok")?;
            },
            Command::DeleteColumn {
                table,
                row,
                family,
                column,
            } => {
                self.dao.delete_column(table, row, family, column)?;
                writeln!(out, "ok")?;
            },
            Command::DeleteRow { table, row } => {
                self.dao.delete_row(table, row)?;
                writeln!(out, "ok")?;
            },
            Command::Disable(table) => {
                self.dao.disable_table(table)?;
                writeln!(out, "disabled {table}")?;
            },
            Command::Enable(table) => {
                self.dao.enable_table(table)?;
                writeln!(out, "enabled {table}")?;
            },
            Command::Drop(table) => {
                self.dao.drop_table(table)?;
                writeln!(out, "dropped {table}")?;
            },
            Command::List => {
                for table in self.dao.list_tables() {
                    writeln!(out, "{table}")?;
                }
            },
            Command::Stats => {
                writeln!(out, "{}", self.dao.connection().statistics())?;
            },
        }
        Ok(())
    }

    /// Run every line of `input`. Failures are reported on `out` as
    /// `error: ...` and do not stop the run.
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let outcome = match parse_line(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => self.execute(&command, out),
                Err(e) => Err(e),
            };
            summary.executed += 1;
            if let Err(e) = outcome {
                if e.is_io_error() {
                    return Err(e);
                }
                summary.failed += 1;
                warn!(line = index + 1, error = %e, "command failed");
                writeln!(out, "error: {e}")?;
            }
        }
        Ok(summary)
    }
}
