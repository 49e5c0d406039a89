//! Error types for stortab-core

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, querying or resolving storage definitions
#[derive(Debug, Error)]
pub enum StorageError {
    /// The definition file could not be read or written
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// File that was being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// RON syntax or structure error in the definition document
    #[error("Parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// TOML syntax or structure error in the definition document
    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The table could not be written back
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A storage entry lacks a required attribute
    #[error("missing attribute '{0}'")]
    MissingAttribute(&'static str),

    /// A storage entry attribute has a value of the wrong type
    #[error("invalid value for attribute '{0}'")]
    InvalidAttribute(&'static str),

    /// A storage entry names a hardware storage type that is not known
    #[error("unknown storage type '{0}'")]
    UnknownStorageType(String),

    /// A storage entry names a memory type that is not known
    #[error("unknown memory type '{0}'")]
    UnknownMemoryType(String),

    /// No platform with this name was loaded
    #[error("platform '{platform}' is not defined in the storage table")]
    UnknownPlatform {
        /// Requested platform
        platform: String,
    },

    /// The platform exists but has no storage with this name
    #[error("storage '{storage}' is not defined for platform '{platform}'")]
    UnknownStorage {
        /// Requested platform
        platform: String,
        /// Requested storage name
        storage: String,
    },

    /// The entry exists but is flagged as unsupported
    #[error("storage '{storage}' is not supported on platform '{platform}'")]
    Unsupported {
        /// Requested platform
        platform: String,
        /// Requested storage name
        storage: String,
    },

    /// The process-wide table was already installed
    #[error("storage table already installed")]
    AlreadyInstalled,
}

impl StorageError {
    /// True for the lookup failures (unknown platform or storage name)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownPlatform { .. } | Self::UnknownStorage { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage table operations
pub type Result<T> = std::result::Result<T, StorageError>;
