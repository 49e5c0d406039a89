//! Storage entry parsing
//!
//! Converts one storage node of a definition document into a
//! [`StorageInfo`] and back. Every attribute is read leniently: a missing
//! or mistyped attribute, or an unknown type name, only rejects its own
//! entry and never the whole document.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::types::{MemoryType, StorageInfo, StorageType, DEFAULT_ADDRESSING_WIDTH};
use crate::error::{Result, StorageError};

/// One attribute of a storage node
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Attr<T> {
    /// Not present in the node
    Missing,
    /// Present but not of the expected type
    Invalid,
    /// Present and well-typed
    Value(T),
}

impl<T> Default for Attr<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T: Clone> Attr<T> {
    fn required(&self, attribute: &'static str) -> Result<T> {
        match self {
            Self::Value(v) => Ok(v.clone()),
            Self::Missing => Err(StorageError::MissingAttribute(attribute)),
            Self::Invalid => Err(StorageError::InvalidAttribute(attribute)),
        }
    }

    fn or(&self, attribute: &'static str, default: T) -> Result<T> {
        match self {
            Self::Value(v) => Ok(v.clone()),
            Self::Missing => Ok(default),
            Self::Invalid => Err(StorageError::InvalidAttribute(attribute)),
        }
    }
}

impl<T: Serialize> Serialize for Attr<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            _ => Err(serde::ser::Error::custom("storage attribute has no value")),
        }
    }
}

/// Deserialize an attribute, turning a value of the wrong type into `Invalid`
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Attr<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ValueOrOther<T> {
        Value(T),
        Other(IgnoredAny),
    }

    match ValueOrOther::<T>::deserialize(deserializer)? {
        ValueOrOther::Value(v) => Ok(Attr::Value(v)),
        ValueOrOther::Other(_) => Ok(Attr::Invalid),
    }
}

/// One storage node as it appears in the definition file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub(crate) struct StorageEntryDef {
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) name: Attr<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) is_support: Attr<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) auto_format: Attr<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) hw_type: Attr<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) mem_type: Attr<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) addressing: Attr<u32>,
}

impl StorageEntryDef {
    /// Name for log messages, even when the node has no usable name
    pub(crate) fn display_name(&self) -> &str {
        match &self.name {
            Attr::Value(name) => name,
            _ => "<unnamed>",
        }
    }

    /// Parse this node into a record
    ///
    /// Nothing is returned on failure, so a rejected entry can never be
    /// half-published into the table.
    pub(crate) fn parse(&self) -> Result<StorageInfo> {
        let storage_name = self.name.required("name")?;
        let storage_type: StorageType = self.hw_type.required("hw_type")?.parse()?;
        let memory_type: MemoryType = self.mem_type.required("mem_type")?.parse()?;

        Ok(StorageInfo {
            storage_name,
            is_support: self.is_support.or("is_support", false)?,
            is_support_auto_format: self.auto_format.or("auto_format", false)?,
            storage_type,
            memory_type,
            addressing_width: self.addressing.or("addressing", DEFAULT_ADDRESSING_WIDTH)?,
        })
    }
}

impl From<&StorageInfo> for StorageEntryDef {
    fn from(info: &StorageInfo) -> Self {
        Self {
            name: Attr::Value(info.storage_name.clone()),
            is_support: Attr::Value(info.is_support),
            auto_format: Attr::Value(info.is_support_auto_format),
            hw_type: Attr::Value(info.storage_type.as_str().to_string()),
            mem_type: Attr::Value(info.memory_type.as_str().to_string()),
            addressing: Attr::Value(info.addressing_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(hw: &str, mem: &str) -> StorageEntryDef {
        StorageEntryDef {
            name: Attr::Value("emmc0".to_string()),
            is_support: Attr::Value(true),
            auto_format: Attr::Value(false),
            hw_type: Attr::Value(hw.to_string()),
            mem_type: Attr::Value(mem.to_string()),
            addressing: Attr::Value(8),
        }
    }

    fn from_ron(s: &str) -> StorageEntryDef {
        ron::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_emmc_entry() {
        let info = entry("EMMC", "EMMC").parse().unwrap();
        assert_eq!(info.storage_name(), "emmc0");
        assert!(info.is_support());
        assert!(!info.is_support_auto_format());
        assert_eq!(info.storage_type(), StorageType::Emmc);
        assert_eq!(info.memory_type(), MemoryType::Emmc);
        assert_eq!(info.addressing_width(), 8);
    }

    #[test]
    fn test_unknown_hw_type() {
        let err = entry("EMMC5", "EMMC").parse().unwrap_err();
        assert!(matches!(err, StorageError::UnknownStorageType(ref n) if n == "EMMC5"));
    }

    #[test]
    fn test_unknown_mem_type() {
        let err = entry("NAND", "MLC").parse().unwrap_err();
        assert!(matches!(err, StorageError::UnknownMemoryType(ref n) if n == "MLC"));
    }

    #[test]
    fn test_defaults_from_ron() {
        let def = from_ron(r#"(name: "nand0", hw_type: "NAND", mem_type: "SPI_NAND")"#);
        assert_eq!(def.is_support, Attr::Missing);
        let info = def.parse().unwrap();
        assert!(!info.is_support());
        assert!(!info.is_support_auto_format());
        assert_eq!(info.addressing_width(), 8);
    }

    #[test]
    fn test_missing_type_attribute() {
        let def = from_ron(r#"(name: "bad", is_support: true, mem_type: "EMMC")"#);
        assert_eq!(def.hw_type, Attr::Missing);
        assert!(matches!(
            def.parse(),
            Err(StorageError::MissingAttribute("hw_type"))
        ));

        let def = from_ron(r#"(name: "bad", hw_type: "EMMC")"#);
        assert!(matches!(
            def.parse(),
            Err(StorageError::MissingAttribute("mem_type"))
        ));
    }

    #[test]
    fn test_mistyped_attributes() {
        let def = from_ron(
            r#"(name: "bad", hw_type: "EMMC", mem_type: "EMMC", addressing: -1)"#,
        );
        assert_eq!(def.addressing, Attr::Invalid);
        assert!(matches!(
            def.parse(),
            Err(StorageError::InvalidAttribute("addressing"))
        ));

        let def = from_ron(r#"(name: "bad", is_support: "yes", hw_type: "NOR", mem_type: "NOR")"#);
        assert!(matches!(
            def.parse(),
            Err(StorageError::InvalidAttribute("is_support"))
        ));

        let def = from_ron(r#"(name: 7, hw_type: "NOR", mem_type: "NOR")"#);
        assert_eq!(def.display_name(), "<unnamed>");
        assert!(matches!(def.parse(), Err(StorageError::InvalidAttribute("name"))));
    }

    #[test]
    fn test_write_back_matches_source() {
        let mut def = entry("SDMMC", "SDMMC");
        def.auto_format = Attr::Value(true);
        def.addressing = Attr::Value(32);
        let info = def.parse().unwrap();
        assert_eq!(StorageEntryDef::from(&info), def);
    }
}
