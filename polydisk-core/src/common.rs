//! Derived operations shared by every disk
//!
//! [`DiskExt`] is implemented once, for every [`Disk`], purely in terms of
//! the primitive contract. None of these operations are atomic: each is a
//! sequence of primitive calls, and the first failing primitive's error is
//! returned as-is with no cleanup of what already happened.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};

use crate::{
    disk::{Disk, DiskRef},
    error::DiskResult,
    file::File,
    metadata::Visibility,
    path,
};

#[async_trait]
pub trait DiskExt: Disk {
    async fn missing(&self, path: &str) -> bool {
        !self.exists(path).await
    }

    /// Rewrite `path` as `content` followed by its current body.
    ///
    /// Fails with the read error when `path` does not exist.
    async fn prepend(&self, path: &str, content: Bytes) -> DiskResult<()> {
        let existing = self.get(path).await?;
        let body = concat(&content, &existing);
        self.put(path, body, Visibility::Public).await
    }

    /// Rewrite `path` as its current body followed by `content`.
    ///
    /// Fails with the read error when `path` does not exist.
    async fn append(&self, path: &str, content: Bytes) -> DiskResult<()> {
        let existing = self.get(path).await?;
        let body = concat(&existing, &content);
        self.put(path, body, Visibility::Public).await
    }

    /// Copy the body of `source` to `destination` with public visibility.
    async fn copy(&self, source: &str, destination: &str) -> DiskResult<()> {
        let content = self.get(source).await?;
        self.put(destination, content, Visibility::Public).await
    }

    /// Copy, then delete the source. A failed delete leaves both files.
    async fn move_to(&self, source: &str, destination: &str) -> DiskResult<()> {
        self.copy(source, destination).await?;
        self.delete(&[source]).await
    }

    async fn size(&self, path: &str) -> u64 {
        self.attributes(path).await.map(|a| a.size).unwrap_or(0)
    }

    async fn last_modified(&self, path: &str) -> i64 {
        self.attributes(path)
            .await
            .map(|a| a.last_modified)
            .unwrap_or(0)
    }

    /// Child directories of `dir` plus their own children.
    ///
    /// The walk stops two levels below `dir`; deeper directories are not
    /// returned.
    async fn all_directories(&self, dir: &str) -> DiskResult<Vec<DiskRef>> {
        let direct = self.directories(dir).await?;
        let mut all = direct.clone();

        for child in &direct {
            all.extend(child.directories("").await?);
        }

        Ok(all)
    }

    /// Files in `dir` plus the files of every directory from
    /// [`all_directories`](DiskExt::all_directories), so the same depth
    /// limit applies.
    async fn all_files(&self, dir: &str) -> DiskResult<Vec<File>> {
        let mut files = self.files(dir).await?;

        for child in self.all_directories(dir).await? {
            files.extend(child.files("").await?);
        }

        Ok(files)
    }

    /// A handle to `path`, split on its last separator.
    fn file(&self, path: &str) -> File {
        let (dir, name) = path::split(path);
        File::new(self.clone_disk(), dir, name)
    }
}

impl<D: Disk + ?Sized> DiskExt for D {}

fn concat(head: &[u8], tail: &[u8]) -> Bytes {
    let mut body = BytesMut::with_capacity(head.len() + tail.len());
    body.extend_from_slice(head);
    body.extend_from_slice(tail);
    body.freeze()
}
