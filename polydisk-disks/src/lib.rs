//! Disks for polydisk
//!
//! A local filesystem disk, an object-store disk over an injected client,
//! and the in-memory object store used as a scratch disk and in tests.

pub mod client;
pub mod config;
mod local;
mod memory;
mod object_store;

pub use client::{DeleteObject, HeadObject, ObjectAttributes, ObjectClient, ObjectSummary};
pub use config::{
    DiskConfig, LocalConfig, LocalPermissions, MemoryConfig, ObjectStoreConfig, StorageConfig,
};
pub use local::LocalDisk;
pub use memory::{MemoryClient, MemoryDisk};
pub use object_store::ObjectStoreDisk;

use polydisk_core::{DiskError, DiskRef, DiskResult};
use std::collections::HashMap;

/// Named disks with one designated default
pub struct DiskRegistry {
    disks: HashMap<String, DiskRef>,
    default: Option<String>,
}

impl DiskRegistry {
    pub fn new() -> Self {
        Self {
            disks: HashMap::new(),
            default: None,
        }
    }

    /// Add or replace a disk. The first disk registered becomes the default.
    pub fn register(&mut self, name: impl Into<String>, disk: DiskRef) {
        let name = name.into();
        if self.default.is_none() {
            self.default = Some(name.clone());
        }
        self.disks.insert(name, disk);
    }

    pub fn set_default(&mut self, name: &str) -> DiskResult<()> {
        if !self.disks.contains_key(name) {
            return Err(DiskError::DiskNotFound(name.to_string()));
        }
        self.default = Some(name.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<DiskRef> {
        self.disks.get(name).cloned()
    }

    pub fn get_or_err(&self, name: &str) -> DiskResult<DiskRef> {
        self.get(name)
            .ok_or_else(|| DiskError::DiskNotFound(name.to_string()))
    }

    pub fn default_disk(&self) -> DiskResult<DiskRef> {
        self.default
            .as_deref()
            .and_then(|name| self.get(name))
            .ok_or(DiskError::NoDefaultDisk)
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Registered names in sorted order.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.disks.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn remove(&mut self, name: &str) -> Option<DiskRef> {
        if self.default.as_deref() == Some(name) {
            self.default = None;
        }
        self.disks.remove(name)
    }
}

impl Default for DiskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
