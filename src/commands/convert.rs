//! Convert command implementation

use std::path::Path;
use stortab_core::StorageTable;

/// Write the loaded table to `output`
pub fn cmd_convert(table: &StorageTable, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    table.save_file(output)?;
    println!(
        "Saved {} storage entries to {:?}",
        table.entry_count(),
        output
    );
    Ok(())
}
