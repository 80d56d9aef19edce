//! Visibility and attribute value types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DiskError;

/// Public/private intent for a write.
///
/// Only disks with a permission model interpret it; it never changes the
/// key or path an object is stored under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

impl FromStr for Visibility {
    type Err = DiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(DiskError::InvalidArgument(format!("unknown visibility: {other}"))),
        }
    }
}

/// Unix-style permission bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub mode: u32,
}

impl Permissions {
    pub fn new(mode: u32) -> Self {
        Self { mode }
    }
}

/// Size and modification time of a stored file.
///
/// `last_modified` is a Unix timestamp in seconds, 0 when unknown. The zero
/// value stands for "nothing known" and is what the derived accessors
/// return for missing files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub size: u64,
    pub last_modified: i64,
}

impl Attributes {
    pub fn new(size: u64, last_modified: i64) -> Self {
        Self { size, last_modified }
    }

    pub fn from_datetime(size: u64, modified: Option<DateTime<Utc>>) -> Self {
        Self {
            size,
            last_modified: modified.map(|m| m.timestamp()).unwrap_or(0),
        }
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        if self.last_modified == 0 {
            return None;
        }
        DateTime::from_timestamp(self.last_modified, 0)
    }

    pub fn is_zero(&self) -> bool {
        self.size == 0 && self.last_modified == 0
    }
}
