//! File handles

use bytes::Bytes;
use std::fmt;

use crate::{
    common::DiskExt,
    disk::DiskRef,
    error::DiskResult,
    metadata::Visibility,
    path,
};

/// A file on a disk: the disk, the directory and the name.
///
/// Every operation forwards to the disk with [`full_name`](File::full_name);
/// the handle itself holds no other state.
#[derive(Clone)]
pub struct File {
    disk: DiskRef,
    dir: String,
    name: String,
}

impl File {
    pub fn new(disk: DiskRef, dir: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            disk,
            dir: dir.into(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn disk(&self) -> &DiskRef {
        &self.disk
    }

    /// `dir/name`, or just `name` when the directory is empty.
    pub fn full_name(&self) -> String {
        path::join(&self.dir, &self.name)
    }

    pub async fn put(&self, content: impl Into<Bytes>, visibility: Visibility) -> DiskResult<()> {
        self.disk.put(&self.full_name(), content.into(), visibility).await
    }

    pub async fn get(&self) -> DiskResult<Bytes> {
        self.disk.get(&self.full_name()).await
    }

    pub async fn exists(&self) -> bool {
        self.disk.exists(&self.full_name()).await
    }

    pub async fn delete(&self) -> DiskResult<()> {
        self.disk.delete(&[self.full_name().as_str()]).await
    }

    pub async fn size(&self) -> u64 {
        self.disk.size(&self.full_name()).await
    }

    pub async fn last_modified(&self) -> i64 {
        self.disk.last_modified(&self.full_name()).await
    }

    pub fn path(&self) -> String {
        self.disk.path(&self.full_name())
    }

    pub async fn prepend(&self, content: impl Into<Bytes>) -> DiskResult<()> {
        self.disk.prepend(&self.full_name(), content.into()).await
    }

    pub async fn append(&self, content: impl Into<Bytes>) -> DiskResult<()> {
        self.disk.append(&self.full_name(), content.into()).await
    }

    /// Copy this file to `target`, a path on the same disk.
    pub async fn copy(&self, target: &str) -> DiskResult<()> {
        self.disk.copy(&self.full_name(), target).await
    }

    /// Move this file to `target`, a path on the same disk.
    pub async fn move_to(&self, target: &str) -> DiskResult<()> {
        self.disk.move_to(&self.full_name(), target).await
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("disk", &self.disk.cwd())
            .field("dir", &self.dir)
            .field("name", &self.name)
            .finish()
    }
}
