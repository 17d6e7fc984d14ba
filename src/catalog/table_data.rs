use parking_lot::{RwLock, RwLockReadGuard};

use crate::{
    catalog::{RowLocks, TableDescriptor},
    column_family::ColumnFamilySet,
    util::{Result, Status},
};

/// Whether a table accepts data operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Enabled,
    Disabled,
}

/// Runtime state of one table.
///
/// # Lifecycle
///
/// ```text
/// create → Enabled ⇄ Disabled → deleted
/// ```
///
/// Data operations require `Enabled`, deletion requires `Disabled`.
/// A data operation holds an [`EnabledGuard`] from before its first row
/// lock until it returns, so `disable` waits for operations in flight and
/// none can land after it returns.
pub struct TableData {
    name: String,
    families: ColumnFamilySet,
    state: RwLock<TableState>,
    row_locks: RowLocks,
}

impl TableData {
    pub fn new(descriptor: &TableDescriptor, row_lock_stripes: usize) -> Result<Self> {
        TableDescriptor::validate_name(&descriptor.name)?;
        let families = ColumnFamilySet::new(&descriptor.families)?;
        Ok(TableData {
            name: descriptor.name.clone(),
            families,
            state: RwLock::new(TableState::Enabled),
            row_locks: RowLocks::new(row_lock_stripes),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn families(&self) -> &ColumnFamilySet {
        &self.families
    }

    pub fn row_locks(&self) -> &RowLocks {
        &self.row_locks
    }

    pub fn descriptor(&self) -> TableDescriptor {
        TableDescriptor {
            name: self.name.clone(),
            families: self.families.descriptors(),
        }
    }

    pub fn state(&self) -> TableState {
        *self.state.read()
    }

    pub fn is_enabled(&self) -> bool {
        self.state() == TableState::Enabled
    }

    /// Shared hold on the enabled state. Fails with `TableDisabled` unless
    /// the table is enabled.
    ///
    /// Take it once per operation, before any row lock.
    pub fn enabled(&self) -> Result<EnabledGuard<'_>> {
        let state = self.state.read();
        match *state {
            TableState::Enabled => Ok(EnabledGuard { _state: state }),
            TableState::Disabled => Err(Status::table_disabled(&self.name)),
        }
    }

    /// Take the table offline. Fails with `TableNotEnabled` if it already is.
    pub fn disable(&self) -> Result<()> {
        let mut state = self.state.write();
        if *state == TableState::Disabled {
            return Err(Status::table_not_enabled(&self.name));
        }
        *state = TableState::Disabled;
        Ok(())
    }

    /// Bring the table back online. Fails with `TableNotDisabled` if it is
    /// online.
    pub fn enable(&self) -> Result<()> {
        let mut state = self.state.write();
        if *state == TableState::Enabled {
            return Err(Status::table_not_disabled(&self.name));
        }
        *state = TableState::Enabled;
        Ok(())
    }
}

/// Keeps a table enabled while it lives.
#[must_use]
pub struct EnabledGuard<'a> {
    _state: RwLockReadGuard<'a, TableState>,
}
