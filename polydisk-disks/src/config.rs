//! Disk configuration
//!
//! Every disk is built from an explicit config value. Unset permission modes
//! fall back to the constants below when the disk is constructed.
//!
//! ```toml
//! default = "files"
//!
//! [disks.files]
//! driver = "local"
//! prefix = "storage"
//! file_private = 0o600
//!
//! [disks.scratch]
//! driver = "memory"
//! ```

use polydisk_core::{DiskError, DiskResult, Permissions, Visibility};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::{DiskRegistry, LocalDisk, MemoryDisk};

pub const DEFAULT_FILE_PUBLIC: u32 = 0o644;
pub const DEFAULT_FILE_PRIVATE: u32 = 0o600;
pub const DEFAULT_DIRECTORY_PUBLIC: u32 = 0o777;
pub const DEFAULT_DIRECTORY_PRIVATE: u32 = 0o700;

/// Local disk configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub file_public: Option<u32>,
    pub file_private: Option<u32>,
    pub directory_public: Option<u32>,
    pub directory_private: Option<u32>,
    /// Root directory; empty means the process working directory.
    pub prefix: String,
}

impl LocalConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Modes with the fallbacks applied.
    pub fn permissions(&self) -> LocalPermissions {
        LocalPermissions {
            file_public: Permissions::new(self.file_public.unwrap_or(DEFAULT_FILE_PUBLIC)),
            file_private: Permissions::new(self.file_private.unwrap_or(DEFAULT_FILE_PRIVATE)),
            directory_public: Permissions::new(
                self.directory_public.unwrap_or(DEFAULT_DIRECTORY_PUBLIC),
            ),
            directory_private: Permissions::new(
                self.directory_private.unwrap_or(DEFAULT_DIRECTORY_PRIVATE),
            ),
        }
    }
}

/// Resolved permission modes of a local disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalPermissions {
    pub file_public: Permissions,
    pub file_private: Permissions,
    pub directory_public: Permissions,
    pub directory_private: Permissions,
}

impl LocalPermissions {
    pub fn file(&self, visibility: Visibility) -> Permissions {
        match visibility {
            Visibility::Public => self.file_public,
            Visibility::Private => self.file_private,
        }
    }

    pub fn directory(&self, visibility: Visibility) -> Permissions {
        match visibility {
            Visibility::Public => self.directory_public,
            Visibility::Private => self.directory_private,
        }
    }
}

impl Default for LocalPermissions {
    fn default() -> Self {
        LocalConfig::default().permissions()
    }
}

/// Object-store disk configuration; the client is injected separately
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStoreConfig {
    pub bucket: String,
    pub prefix: String,
}

/// Memory disk configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub prefix: String,
}

/// One named disk in a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "driver", rename_all = "lowercase")]
pub enum DiskConfig {
    Local(LocalConfig),
    Memory(MemoryConfig),
}

/// A set of named disks and the one used by default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub default: Option<String>,
    pub disks: BTreeMap<String, DiskConfig>,
}

impl StorageConfig {
    pub fn from_toml_str(s: &str) -> DiskResult<Self> {
        toml::from_str(s).map_err(|e| DiskError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> DiskResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DiskError::from_io(e, path.display().to_string()))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> DiskResult<String> {
        toml::to_string_pretty(self).map_err(|e| DiskError::Config(e.to_string()))
    }

    /// Construct every disk and register it.
    ///
    /// Without an explicit `default`, the first disk in name order is the
    /// default.
    pub fn build(&self) -> DiskResult<DiskRegistry> {
        let mut registry = DiskRegistry::new();

        for (name, config) in &self.disks {
            match config {
                DiskConfig::Local(c) => {
                    registry.register(name, Arc::new(LocalDisk::new(c.clone())))
                }
                DiskConfig::Memory(c) => {
                    registry.register(name, Arc::new(MemoryDisk::in_memory(c.clone())))
                }
            }
        }

        if let Some(default) = &self.default {
            registry.set_default(default)?;
        }

        Ok(registry)
    }
}
