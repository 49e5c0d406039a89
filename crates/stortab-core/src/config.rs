//! Resolved storage configuration
//!
//! A [`StorageConfig`] is the snapshot a flashing session holds: the
//! attributes of one (platform, storage name) pair copied out of the
//! [`StorageTable`]. Callers compare the active selection against it with
//! [`StorageConfig::has_changed`] and re-resolve, reinitializing any
//! storage-dependent driver state, when it reports a change.

use crate::error::{Result, StorageError};
use crate::storage::{MemoryType, StorageTable, StorageType, DEFAULT_ADDRESSING_WIDTH};

/// Resolved configuration for one (platform, storage name) pair
///
/// A failed [`resolve`](Self::resolve) never touches the held state, so the
/// last successful resolution stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    platform: String,
    storage_name: String,
    memory_type: MemoryType,
    storage_type: StorageType,
    is_support_auto_format: bool,
    addressing_width: u32,
    resolved: bool,
}

impl StorageConfig {
    /// Create an unresolved configuration
    pub fn new() -> Self {
        Self {
            platform: String::new(),
            storage_name: String::new(),
            memory_type: MemoryType::default(),
            storage_type: StorageType::default(),
            is_support_auto_format: false,
            addressing_width: DEFAULT_ADDRESSING_WIDTH,
            resolved: false,
        }
    }

    /// Create a configuration resolved against `table`
    pub fn resolved(table: &StorageTable, platform: &str, storage_name: &str) -> Result<Self> {
        let mut config = Self::new();
        config.resolve(table, platform, storage_name)?;
        Ok(config)
    }

    /// Resolve a (platform, storage name) pair and take over its attributes
    ///
    /// Fails for unknown pairs. Entries found but flagged `is_support: false`
    /// are rejected as well, with [`StorageError::Unsupported`]: a config is
    /// only handed to flashing code for storage the tool actually supports.
    /// [`StorageTable::query`] still returns such entries.
    pub fn resolve(
        &mut self,
        table: &StorageTable,
        platform: &str,
        storage_name: &str,
    ) -> Result<()> {
        let info = table.query(platform, storage_name)?;
        if !info.is_support() {
            return Err(StorageError::Unsupported {
                platform: platform.to_string(),
                storage: storage_name.to_string(),
            });
        }

        self.platform = platform.to_string();
        self.storage_name = info.storage_name().to_string();
        self.memory_type = info.memory_type();
        self.storage_type = info.storage_type();
        self.is_support_auto_format = info.is_support_auto_format();
        self.addressing_width = info.addressing_width();
        self.resolved = true;

        log::debug!(
            "Resolved storage {}/{}: {} on {}, {}-bit addressing",
            self.platform,
            self.storage_name,
            self.storage_type,
            self.memory_type,
            self.addressing_width
        );
        Ok(())
    }

    /// Check whether a selection differs from the held resolution
    ///
    /// Only the names are compared. Whether the new pair would resolve, or
    /// resolve to the same attributes, does not matter. Before the first
    /// successful resolution every pair counts as changed.
    pub fn has_changed(&self, platform: &str, storage_name: &str) -> bool {
        !self.resolved || self.platform != platform || self.storage_name != storage_name
    }

    /// Whether a resolution has succeeded at least once
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Name of the storage entry registered for `storage_type`
    pub fn storage_name_by_type<'a>(
        &self,
        table: &'a StorageTable,
        storage_type: StorageType,
    ) -> &'a str {
        table.display_name_for(storage_type)
    }

    /// Platform of the held resolution
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Storage name of the held resolution
    pub fn storage_name(&self) -> &str {
        &self.storage_name
    }

    /// Hardware storage medium
    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    /// Physical memory technology
    pub fn memory_type(&self) -> MemoryType {
        self.memory_type
    }

    /// Bus addressing width in bits
    pub fn addressing_width(&self) -> u32 {
        self.addressing_width
    }

    /// NAND programming path
    pub fn is_nand_operation(&self) -> bool {
        self.storage_type == StorageType::Nand
    }

    /// eMMC programming path
    pub fn is_emmc_operation(&self) -> bool {
        self.storage_type == StorageType::Emmc
    }

    /// SD/MMC programming path
    pub fn is_sdmmc_operation(&self) -> bool {
        self.storage_type == StorageType::SdMmc
    }

    /// Whether the resolved storage supports auto format
    pub fn is_support_auto_format(&self) -> bool {
        self.is_support_auto_format
    }

    /// Write the held configuration to the log
    pub fn dump(&self) {
        log::info!(
            "Storage config: platform={} storage={} hw={} mem={} auto_format={} width={}",
            self.platform,
            self.storage_name,
            self.storage_type,
            self.memory_type,
            self.is_support_auto_format,
            self.addressing_width
        );
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new()
    }
}
