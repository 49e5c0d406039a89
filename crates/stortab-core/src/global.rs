//! Process-wide storage table
//!
//! The table is installed once at startup; there is no implicit load on
//! first use. Library code takes `&StorageTable` and never reads the
//! global itself.

use once_cell::sync::OnceCell;

use crate::error::{Result, StorageError};
use crate::storage::StorageTable;

static STORAGE_TABLE: OnceCell<StorageTable> = OnceCell::new();

/// Install the process-wide table
///
/// Only the first call succeeds, later calls return
/// [`StorageError::AlreadyInstalled`] and drop their table.
pub fn install(table: StorageTable) -> Result<&'static StorageTable> {
    STORAGE_TABLE
        .set(table)
        .map_err(|_| StorageError::AlreadyInstalled)?;
    log::debug!("Installed process-wide storage table");
    STORAGE_TABLE.get().ok_or(StorageError::AlreadyInstalled)
}

/// The installed table, if any
pub fn get() -> Option<&'static StorageTable> {
    STORAGE_TABLE.get()
}
