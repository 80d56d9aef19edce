//! Object-store client capability
//!
//! The narrow set of calls [`crate::ObjectStoreDisk`] makes against an
//! object store. A network client for a real S3-compatible service and
//! [`crate::MemoryClient`] both satisfy it; credentials, endpoints and the
//! wire protocol are the implementor's business.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use polydisk_core::{ByteStream, DiskResult};

/// One entry of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Result of a get-object-attributes call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectAttributes {
    pub object_size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Result of a head-object call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadObject {
    pub content_length: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Result of a delete-object call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteObject {
    /// Whether the store reports that something was actually removed.
    pub delete_marker: bool,
}

#[async_trait]
pub trait ObjectClient: Send + Sync {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> DiskResult<()>;

    /// Fetch an object body. Errors may surface either from the call or
    /// while the returned stream is drained.
    async fn get_object(&self, bucket: &str, key: &str) -> DiskResult<ByteStream>;

    async fn get_object_attributes(&self, bucket: &str, key: &str) -> DiskResult<ObjectAttributes>;

    async fn head_object(&self, bucket: &str, key: &str) -> DiskResult<HeadObject>;

    async fn delete_object(&self, bucket: &str, key: &str) -> DiskResult<DeleteObject>;

    /// Every object whose key starts with `prefix`, at any depth.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> DiskResult<Vec<ObjectSummary>>;
}
