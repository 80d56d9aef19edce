//! Disk trait

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

use crate::{
    error::DiskResult,
    file::File,
    metadata::{Attributes, Visibility},
};

/// Byte stream type
pub type ByteStream = Pin<Box<dyn Stream<Item = DiskResult<Bytes>> + Send>>;

/// Shared, type-erased disk
pub type DiskRef = Arc<dyn Disk>;

/// The primitive operations every disk implements directly.
///
/// Everything else (prepend, append, copy, move, recursive listings, ...)
/// lives in [`crate::DiskExt`] and is built from these primitives only.
///
/// A disk is rooted at a path prefix (its [`cwd`](Disk::cwd)). All paths
/// passed to these methods are relative to that root. [`prefix`](Disk::prefix)
/// produces an independent disk with a different root and never mutates
/// `self`.
///
/// # Implementors
///
/// - `LocalDisk` - host filesystem with permission bits
/// - `ObjectStoreDisk` - flat key space behind an injected client
/// - `MemoryDisk` - the object-store disk wired to the in-memory client
#[async_trait]
pub trait Disk: Send + Sync {
    /// Write `content` as the full body of `path`, creating whatever the
    /// disk needs for intermediate directories.
    async fn put(&self, path: &str, content: Bytes, visibility: Visibility) -> DiskResult<()>;

    /// Read the full body of `path`. Fails with `NotFound` when absent.
    async fn get(&self, path: &str) -> DiskResult<Bytes>;

    async fn attributes(&self, path: &str) -> DiskResult<Attributes>;

    async fn exists(&self, path: &str) -> bool;

    /// Delete each path in order, stopping at the first failure.
    async fn delete(&self, paths: &[&str]) -> DiskResult<()>;

    /// Files directly inside `dir`.
    async fn files(&self, dir: &str) -> DiskResult<Vec<File>>;

    /// Directories directly inside `dir`, each as a disk scoped to it.
    async fn directories(&self, dir: &str) -> DiskResult<Vec<DiskRef>>;

    async fn make_directory(&self, dir: &str, visibility: Visibility) -> DiskResult<()>;

    async fn delete_directory(&self, dir: &str) -> DiskResult<()>;

    /// Location of `path` in the underlying medium.
    fn path(&self, path: &str) -> String;

    /// A new disk over the same medium rooted at `root`.
    fn prefix(&self, root: &str) -> DiskRef;

    /// The root this disk is scoped to, empty when unscoped.
    fn cwd(&self) -> &str;

    /// A shared handle to an equivalent disk, used to bind file handles.
    fn clone_disk(&self) -> DiskRef;
}
