//! Query command implementation

use stortab_core::{StorageConfig, StorageTable};

/// Resolve a (platform, storage) pair and print the configuration
pub fn cmd_query(
    table: &StorageTable,
    platform: &str,
    storage: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorageConfig::resolved(table, platform, storage)?;
    config.dump();

    println!("Storage Configuration");
    println!("=====================");
    println!();
    println!("Platform:        {}", config.platform());
    println!("Storage:         {}", config.storage_name());
    println!("Storage type:    {}", config.storage_type());
    println!("Memory type:     {}", config.memory_type());
    println!("Addressing:      {}-bit", config.addressing_width());
    println!(
        "Auto format:     {}",
        if config.is_support_auto_format() {
            "Supported"
        } else {
            "Not supported"
        }
    );

    let operation = if config.is_nand_operation() {
        "NAND"
    } else if config.is_emmc_operation() {
        "eMMC"
    } else if config.is_sdmmc_operation() {
        "SD/MMC"
    } else {
        "other"
    };
    println!("Operation:       {}", operation);

    Ok(())
}
