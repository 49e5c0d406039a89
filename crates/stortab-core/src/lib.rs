//! stortab-core - Storage definition table for flash tools
//!
//! This crate answers the question a flashing tool asks before touching a
//! device: "is this (platform, storage) combination known, and how must I
//! address it?". It loads a storage definition file into a two-level table
//! keyed by platform and storage name, and hands out small resolved
//! configurations that callers hold and re-check for changes.
//!
//! # Example
//!
//! ```ignore
//! use stortab_core::{StorageConfig, StorageTable};
//!
//! let table = StorageTable::load_file("storage_setting.ron")?;
//! let mut config = StorageConfig::new();
//! config.resolve(&table, "MT6765", "emmc0")?;
//! assert!(config.is_emmc_operation());
//!
//! // Later, when the user picks another device:
//! if config.has_changed("MT6765", "nand0") {
//!     config.resolve(&table, "MT6765", "nand0")?;
//!     // reinitialize storage drivers here
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod global;
pub mod storage;

pub use config::StorageConfig;
pub use error::{Result, StorageError};
pub use storage::{MemoryType, StorageInfo, StorageTable, StorageType};
