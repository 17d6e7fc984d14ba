use std::hash::{DefaultHasher, Hash, Hasher};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::util::Slice;

/// Striped row locks.
///
/// A mutation holds the write side of its row's stripe while it touches
/// every family, readers hold the read side while they gather the row. This
/// is what makes a multi-family put or a row delete atomic to readers.
/// Rows hashing to the same stripe contend; they never deadlock because a
/// caller takes exactly one stripe at a time.
pub struct RowLocks {
    stripes: Vec<RwLock<()>>,
}

impl RowLocks {
    pub fn new(stripes: usize) -> Self {
        let stripes = stripes.max(1);
        RowLocks {
            stripes: (0..stripes).map(|_| RwLock::new(())).collect(),
        }
    }

    pub fn read(&self, row: &Slice) -> RwLockReadGuard<'_, ()> {
        self.stripes[self.stripe(row)].read()
    }

    pub fn write(&self, row: &Slice) -> RwLockWriteGuard<'_, ()> {
        self.stripes[self.stripe(row)].write()
    }

    pub fn len(&self) -> usize {
        self.stripes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stripes.is_empty()
    }

    fn stripe(&self, row: &Slice) -> usize {
        let mut hasher = DefaultHasher::new();
        row.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }
}
