//! Storage type definitions
//!
//! The hardware storage medium and physical memory enumerations, their
//! name tables, and the per-entry attribute record.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::StorageError;

/// Default bus addressing width in bits
pub const DEFAULT_ADDRESSING_WIDTH: u32 = 8;

/// Name used for records and reverse lookups with no real name
pub const UNKNOWN_STORAGE_NAME: &str = "Unknown";

/// Hardware storage medium, selects the programming algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StorageType {
    /// Parallel or serial NOR flash
    Nor,
    /// Raw NAND flash
    #[default]
    Nand,
    /// Embedded MMC
    Emmc,
    /// Removable SD/MMC card
    SdMmc,
    /// Universal Flash Storage
    Ufs,
}

static STORAGE_TYPE_NAMES: Lazy<HashMap<&'static str, StorageType>> =
    Lazy::new(|| StorageType::ALL.iter().map(|t| (t.as_str(), *t)).collect());

impl StorageType {
    /// Every known storage type
    pub const ALL: [StorageType; 5] = [
        StorageType::Nor,
        StorageType::Nand,
        StorageType::Emmc,
        StorageType::SdMmc,
        StorageType::Ufs,
    ];

    /// Name as written in definition files
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nor => "NOR",
            Self::Nand => "NAND",
            Self::Emmc => "EMMC",
            Self::SdMmc => "SDMMC",
            Self::Ufs => "UFS",
        }
    }

    /// Look up a storage type by its exact (case-sensitive) name
    pub fn from_name(name: &str) -> Option<Self> {
        STORAGE_TYPE_NAMES.get(name).copied()
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| StorageError::UnknownStorageType(s.to_string()))
    }
}

/// Physical memory technology behind a storage device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum MemoryType {
    /// NOR flash cells
    Nor,
    /// Parallel NAND flash cells
    #[default]
    Nand,
    /// NAND behind a SPI bus
    SpiNand,
    /// eMMC managed NAND
    Emmc,
    /// SD/MMC card
    SdMmc,
    /// UFS managed NAND
    Ufs,
}

static MEMORY_TYPE_NAMES: Lazy<HashMap<&'static str, MemoryType>> =
    Lazy::new(|| MemoryType::ALL.iter().map(|t| (t.as_str(), *t)).collect());

impl MemoryType {
    /// Every known memory type
    pub const ALL: [MemoryType; 6] = [
        MemoryType::Nor,
        MemoryType::Nand,
        MemoryType::SpiNand,
        MemoryType::Emmc,
        MemoryType::SdMmc,
        MemoryType::Ufs,
    ];

    /// Name as written in definition files
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nor => "NOR",
            Self::Nand => "NAND",
            Self::SpiNand => "SPI_NAND",
            Self::Emmc => "EMMC",
            Self::SdMmc => "SDMMC",
            Self::Ufs => "UFS",
        }
    }

    /// Look up a memory type by its exact (case-sensitive) name
    pub fn from_name(name: &str) -> Option<Self> {
        MEMORY_TYPE_NAMES.get(name).copied()
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| StorageError::UnknownMemoryType(s.to_string()))
    }
}

/// Hardware facts for one (platform, storage name) entry
///
/// Built by the entry parser while loading a definition file and never
/// modified afterwards. The table owns every record; callers get shared
/// references or copy the fields into a [`StorageConfig`].
///
/// [`StorageConfig`]: crate::StorageConfig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageInfo {
    pub(crate) storage_name: String,
    pub(crate) is_support: bool,
    pub(crate) is_support_auto_format: bool,
    pub(crate) storage_type: StorageType,
    pub(crate) memory_type: MemoryType,
    pub(crate) addressing_width: u32,
}

impl StorageInfo {
    /// Storage name, unique within its platform
    pub fn storage_name(&self) -> &str {
        &self.storage_name
    }

    /// Whether the flash tool supports this storage on its platform
    pub fn is_support(&self) -> bool {
        self.is_support
    }

    /// Whether the storage can be formatted automatically
    pub fn is_support_auto_format(&self) -> bool {
        self.is_support_auto_format
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
}

impl Default for StorageInfo {
    fn default() -> Self {
        Self {
            storage_name: UNKNOWN_STORAGE_NAME.to_string(),
            is_support: false,
            is_support_auto_format: false,
            storage_type: StorageType::default(),
            memory_type: MemoryType::default(),
            addressing_width: DEFAULT_ADDRESSING_WIDTH,
        }
    }
}
