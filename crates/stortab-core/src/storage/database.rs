//! Storage definition table
//!
//! This module provides the `StorageTable` type, built once from a RON (or
//! TOML) definition file and read-only afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::entry::StorageEntryDef;
use super::types::{StorageInfo, StorageType, UNKNOWN_STORAGE_NAME};
use crate::error::{Result, StorageError};

// ============================================================================
// Document types (intermediate format)
// ============================================================================

/// Platform node: a platform name and its storage entries
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlatformDef {
    name: String,
    #[serde(default)]
    storages: Vec<StorageEntryDef>,
}

/// Root node of a definition file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StorageFileDef {
    #[serde(default)]
    platforms: Vec<PlatformDef>,
}

// ============================================================================
// Storage table
// ============================================================================

/// Storage entries of one platform, keyed by storage name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformStorages {
    name: String,
    storages: BTreeMap<String, StorageInfo>,
}

impl PlatformStorages {
    fn new(name: String) -> Self {
        Self {
            name,
            storages: BTreeMap::new(),
        }
    }

    /// Platform name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Find a storage entry by exact name
    pub fn get(&self, storage_name: &str) -> Option<&StorageInfo> {
        self.storages.get(storage_name)
    }

    /// Iterate over the entries, ordered by storage name
    pub fn iter(&self) -> impl Iterator<Item = &StorageInfo> {
        self.storages.values()
    }

    /// Number of entries for this platform
    pub fn len(&self) -> usize {
        self.storages.len()
    }

    /// Check if the platform has no entries
    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }
}

/// Storage definition table
///
/// Platforms keep file order; lookups are exact and case-sensitive on both
/// levels. A secondary index maps each storage type to the name of the
/// last loaded entry of that type.
#[derive(Debug, Clone, Default)]
pub struct StorageTable {
    platforms: Vec<PlatformStorages>,
    storage_operation_map: BTreeMap<StorageType, String>,
    skipped: usize,
}

impl StorageTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a definition file, TOML if the extension is `.toml`, RON otherwise
    ///
    /// Fails if the file cannot be read or the document itself is malformed.
    /// Entries with unknown type names are skipped with a warning.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        let table = if is_toml(path) {
            Self::from_toml_str(&content)?
        } else {
            Self::from_ron_str(&content)?
        };

        log::debug!(
            "Loaded {} storage entries for {} platforms from {}",
            table.entry_count(),
            table.platform_count(),
            path.display()
        );
        Ok(table)
    }

    /// Build a table from a RON document
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let doc: StorageFileDef = ron::from_str(content)?;
        Ok(Self::from_document(doc))
    }

    /// Build a table from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let doc: StorageFileDef = toml::from_str(content)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: StorageFileDef) -> Self {
        let mut table = Self::new();

        for platform in doc.platforms {
            let idx = match table.platforms.iter().position(|p| p.name == platform.name) {
                Some(idx) => {
                    log::warn!(
                        "Platform '{}' is defined more than once, merging entries",
                        platform.name
                    );
                    idx
                }
                None => {
                    table
                        .platforms
                        .push(PlatformStorages::new(platform.name.clone()));
                    table.platforms.len() - 1
                }
            };

            for entry in &platform.storages {
                let info = match entry.parse() {
                    Ok(info) => info,
                    Err(e) => {
                        log::warn!(
                            "Skipping storage '{}' on platform '{}': {}",
                            entry.display_name(),
                            platform.name,
                            e
                        );
                        table.skipped += 1;
                        continue;
                    }
                };

                log::debug!(
                    "{}: {} ({}/{}, {}-bit)",
                    platform.name,
                    info.storage_name,
                    info.storage_type,
                    info.memory_type,
                    info.addressing_width
                );

                table
                    .storage_operation_map
                    .insert(info.storage_type, info.storage_name.clone());

                let storages = &mut table.platforms[idx].storages;
                if storages
                    .insert(info.storage_name.clone(), info)
                    .is_some()
                {
                    log::warn!(
                        "Storage '{}' is defined more than once for platform '{}', keeping the last one",
                        entry.display_name(),
                        platform.name
                    );
                }
            }
        }

        table
    }

    /// Look up the record for a (platform, storage name) pair
    pub fn query(&self, platform: &str, storage_name: &str) -> Result<&StorageInfo> {
        let storages = self
            .platform(platform)
            .ok_or_else(|| StorageError::UnknownPlatform {
                platform: platform.to_string(),
            })?;

        storages
            .get(storage_name)
            .ok_or_else(|| StorageError::UnknownStorage {
                platform: platform.to_string(),
                storage: storage_name.to_string(),
            })
    }

    /// Find a platform by exact name
    pub fn platform(&self, name: &str) -> Option<&PlatformStorages> {
        self.platforms.iter().find(|p| p.name == name)
    }

    /// Iterate over platforms in file order
    pub fn platforms(&self) -> impl Iterator<Item = &PlatformStorages> {
        self.platforms.iter()
    }

    /// Display name registered for a storage type, or `"Unknown"`
    pub fn display_name_for(&self, storage_type: StorageType) -> &str {
        self.storage_operation_map
            .get(&storage_type)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_STORAGE_NAME)
    }

    /// The storage type to display name index
    pub fn storage_operation_map(&self) -> &BTreeMap<StorageType, String> {
        &self.storage_operation_map
    }

    /// Number of platforms
    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    /// Number of storage entries across all platforms
    pub fn entry_count(&self) -> usize {
        self.platforms.iter().map(PlatformStorages::len).sum()
    }

    /// Number of entries rejected while loading
    pub fn skipped_entries(&self) -> usize {
        self.skipped
    }

    /// Check if the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Write the whole table to the log
    pub fn dump(&self) {
        log::info!(
            "Storage table: {} platforms, {} entries",
            self.platform_count(),
            self.entry_count()
        );
        for platform in &self.platforms {
            log::info!("[{}]", platform.name);
            for info in platform.iter() {
                log::info!(
                    "  {:<16} support={} auto_format={} hw={} mem={} width={}",
                    info.storage_name,
                    info.is_support,
                    info.is_support_auto_format,
                    info.storage_type,
                    info.memory_type,
                    info.addressing_width
                );
            }
        }
        for (ty, name) in &self.storage_operation_map {
            log::info!("  {} -> {}", ty, name);
        }
    }

    fn to_document(&self) -> StorageFileDef {
        StorageFileDef {
            platforms: self
                .platforms
                .iter()
                .map(|p| PlatformDef {
                    name: p.name.clone(),
                    storages: p.iter().map(StorageEntryDef::from).collect(),
                })
                .collect(),
        }
    }

    /// Serialize the table as a RON document
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(&self.to_document(), ron::ser::PrettyConfig::default())
            .map_err(|e| StorageError::Serialize(e.to_string()))
    }

    /// Serialize the table as a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(&self.to_document())
            .map_err(|e| StorageError::Serialize(e.to_string()))
    }

    /// Save the table, TOML if the extension is `.toml`, RON otherwise
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_toml(path) {
            self.to_toml_string()?
        } else {
            self.to_ron_string()?
        };
        fs::write(path, content).map_err(|e| StorageError::io(path, e))
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryType;

    const SAMPLE: &str = r#"
    (
        platforms: [
            (
                name: "MT6765",
                storages: [
                    (name: "emmc0", is_support: true, auto_format: false,
                     hw_type: "EMMC", mem_type: "EMMC", addressing: 8),
                    (name: "nand0", is_support: true, auto_format: true,
                     hw_type: "NAND", mem_type: "NAND", addressing: 16),
                    (name: "bogus", is_support: true,
                     hw_type: "FLOPPY", mem_type: "NAND"),
                ],
            ),
            (
                name: "MT8127",
                storages: [
                    (name: "emmc0", is_support: false,
                     hw_type: "EMMC", mem_type: "EMMC", addressing: 32),
                    (name: "sd0", is_support: true,
                     hw_type: "SDMMC", mem_type: "SDMMC"),
                ],
            ),
        ],
    )
    "#;

    #[test]
    fn test_load_ron() {
        let table = StorageTable::from_ron_str(SAMPLE).unwrap();

        assert_eq!(table.platform_count(), 2);
        assert_eq!(table.entry_count(), 4);
        assert_eq!(table.skipped_entries(), 1);

        let info = table.query("MT6765", "nand0").unwrap();
        assert_eq!(info.storage_name(), "nand0");
        assert!(info.is_support());
        assert!(info.is_support_auto_format());
        assert_eq!(info.storage_type(), StorageType::Nand);
        assert_eq!(info.memory_type(), MemoryType::Nand);
        assert_eq!(info.addressing_width(), 16);

        let sd = table.query("MT8127", "sd0").unwrap();
        assert_eq!(sd.addressing_width(), 8);
    }

    #[test]
    fn test_same_name_on_two_platforms() {
        let table = StorageTable::from_ron_str(SAMPLE).unwrap();
        let a = table.query("MT6765", "emmc0").unwrap();
        let b = table.query("MT8127", "emmc0").unwrap();
        assert_eq!(a.addressing_width(), 8);
        assert_eq!(b.addressing_width(), 32);
        assert!(!b.is_support());
    }

    #[test]
    fn test_bad_entry_is_skipped() {
        let table = StorageTable::from_ron_str(SAMPLE).unwrap();
        let err = table.query("MT6765", "bogus").unwrap_err();
        assert!(matches!(err, StorageError::UnknownStorage { .. }));
        assert_eq!(table.platform("MT6765").unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let ron = r#"(platforms: [(name: "MT6765", storages: [
            (name: "emmc0", is_support: true, hw_type: "EMMC", mem_type: "EMMC"),
            (name: "no_hw", is_support: true, mem_type: "EMMC"),
            (name: "neg", is_support: true, hw_type: "NAND", mem_type: "NAND", addressing: -1),
            (name: 1, hw_type: "NOR", mem_type: "NOR"),
        ])])"#;
        let table = StorageTable::from_ron_str(ron).unwrap();

        assert_eq!(table.entry_count(), 1);
        assert_eq!(table.skipped_entries(), 3);
        assert!(table.query("MT6765", "emmc0").unwrap().is_support());
        assert!(table.query("MT6765", "no_hw").is_err());
        assert!(table.query("MT6765", "neg").is_err());
        assert_eq!(table.display_name_for(StorageType::Nand), "Unknown");
    }

    #[test]
    fn test_malformed_toml_entry_is_skipped() {
        let toml = r#"
[[platforms]]
name = "MT6765"

[[platforms.storages]]
name = "emmc0"
hw_type = "EMMC"
mem_type = "EMMC"

[[platforms.storages]]
name = "bad"
hw_type = "EMMC"
mem_type = "EMMC"
addressing = "wide"
"#;
        let table = StorageTable::from_toml_str(toml).unwrap();
        assert_eq!(table.entry_count(), 1);
        assert_eq!(table.skipped_entries(), 1);
    }

    #[test]
    fn test_query_not_found() {
        let table = StorageTable::from_ron_str(SAMPLE).unwrap();

        let err = table.query("MT9999", "emmc0").unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, StorageError::UnknownPlatform { ref platform } if platform == "MT9999"));

        let err = table.query("MT6765", "sd0").unwrap_err();
        assert!(err.is_not_found());

        // exact match only
        assert!(table.query("mt6765", "emmc0").is_err());
        assert!(table.query("MT6765", "emmc").is_err());
        assert!(table.query("MT6765", "EMMC0").is_err());

        assert_eq!(table.entry_count(), 4);
    }

    #[test]
    fn test_display_name_for() {
        let table = StorageTable::from_ron_str(SAMPLE).unwrap();
        assert_eq!(table.display_name_for(StorageType::Nand), "nand0");
        assert_eq!(table.display_name_for(StorageType::SdMmc), "sd0");
        assert_eq!(table.display_name_for(StorageType::Emmc), "emmc0");
        assert_eq!(table.display_name_for(StorageType::Ufs), "Unknown");
        assert_eq!(table.display_name_for(StorageType::Nor), "Unknown");
        assert_eq!(table.storage_operation_map().len(), 3);
    }

    #[test]
    fn test_display_name_last_writer_wins() {
        let ron = r#"(platforms: [
            (name: "A", storages: [(name: "first", hw_type: "UFS", mem_type: "UFS")]),
            (name: "B", storages: [(name: "second", hw_type: "UFS", mem_type: "UFS")]),
        ])"#;
        let table = StorageTable::from_ron_str(ron).unwrap();
        assert_eq!(table.display_name_for(StorageType::Ufs), "second");
    }

    #[test]
    fn test_duplicate_platform_and_storage() {
        let ron = r#"(platforms: [
            (name: "A", storages: [(name: "x", hw_type: "NOR", mem_type: "NOR")]),
            (name: "B", storages: []),
            (name: "A", storages: [
                (name: "y", hw_type: "NAND", mem_type: "SPI_NAND"),
                (name: "x", hw_type: "NOR", mem_type: "NOR", addressing: 24),
            ]),
        ])"#;
        let table = StorageTable::from_ron_str(ron).unwrap();
        assert_eq!(table.platform_count(), 2);
        let names: Vec<_> = table.platforms().map(|p| p.name()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(table.platform("A").unwrap().len(), 2);
        assert_eq!(table.query("A", "x").unwrap().addressing_width(), 24);
        assert!(table.platform("B").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            StorageTable::from_ron_str("(platforms: [(storages: [])])"),
            Err(StorageError::Ron(_))
        ));
        assert!(matches!(
            StorageTable::from_ron_str("(platforms: 5)"),
            Err(StorageError::Ron(_))
        ));
        assert!(StorageTable::from_ron_str("not ron at all").is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StorageTable::load_file(dir.path().join("missing.ron")).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn test_load_toml() {
        let toml = r#"
[[platforms]]
name = "MT6765"

[[platforms.storages]]
name = "emmc0"
is_support = true
hw_type = "EMMC"
mem_type = "EMMC"

[[platforms.storages]]
name = "ufs0"
is_support = true
auto_format = true
hw_type = "UFS"
mem_type = "UFS"
addressing = 32
"#;
        let table = StorageTable::from_toml_str(toml).unwrap();
        assert_eq!(table.entry_count(), 2);
        let ufs = table.query("MT6765", "ufs0").unwrap();
        assert_eq!(ufs.storage_type(), StorageType::Ufs);
        assert!(ufs.is_support_auto_format());
        assert_eq!(ufs.addressing_width(), 32);
    }

    #[test]
    fn test_save_and_reload() {
        let table = StorageTable::from_ron_str(SAMPLE).unwrap();
        let dir = tempfile::tempdir().unwrap();

        for file in ["out.ron", "out.toml"] {
            let path = dir.path().join(file);
            table.save_file(&path).unwrap();
            let reloaded = StorageTable::load_file(&path).unwrap();

            assert_eq!(reloaded.skipped_entries(), 0);
            assert_eq!(reloaded.entry_count(), table.entry_count());
            for (a, b) in table.platforms().zip(reloaded.platforms()) {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_shipped_definitions() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../storage_setting.ron");
        let table = StorageTable::load_file(path).unwrap();

        assert_eq!(table.skipped_entries(), 0);
        assert_eq!(table.platform_count(), 3);
        let spi_nand = table.query("MT8167", "SPI_NAND").unwrap();
        assert_eq!(spi_nand.storage_type(), StorageType::Nand);
        assert_eq!(spi_nand.memory_type(), MemoryType::SpiNand);
        assert!(!table.query("MT8167", "NOR").unwrap().is_support());
    }
}
