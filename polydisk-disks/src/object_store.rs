//! Object-store disk
//!
//! Maps logical paths onto flat keys (`root/path`) in a single bucket of an
//! S3-compatible store. Directories exist only as zero-byte marker objects
//! or implicitly through the keys below them.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use polydisk_core::{
    path::{self, DELIMITER},
    Attributes, Disk, DiskError, DiskExt, DiskRef, DiskResult, File, Visibility,
};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::client::ObjectClient;
use crate::config::ObjectStoreConfig;

/// Disk backed by an injected [`ObjectClient`]
///
/// Generic over the client so the in-memory fake and test doubles plug in
/// without boxing; `ObjectStoreDisk` alone means a `dyn ObjectClient`.
pub struct ObjectStoreDisk<C: ObjectClient + ?Sized = dyn ObjectClient> {
    client: Arc<C>,
    bucket: String,
    root: String,
}

impl<C: ObjectClient + ?Sized + 'static> ObjectStoreDisk<C> {
    pub fn new(client: Arc<C>, config: ObjectStoreConfig) -> Self {
        Self {
            client,
            bucket: config.bucket,
            root: config.prefix,
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn key(&self, path: &str) -> String {
        path::join(&self.root, path)
    }

    fn scoped(&self, root: String) -> Self {
        Self {
            client: Arc::clone(&self.client),
            bucket: self.bucket.clone(),
            root,
        }
    }

    /// Objects below `dir` as `(remainder, size)`, where the remainder is the
    /// key with the directory prefix stripped.
    async fn listing(&self, dir: &str) -> DiskResult<Vec<(String, u64)>> {
        let mut prefix = self.key(dir);
        if !prefix.is_empty() {
            prefix.push(DELIMITER);
        }

        let objects = self.client.list_objects(&self.bucket, &prefix).await?;

        Ok(objects
            .into_iter()
            .filter_map(|object| {
                let rest = object.key.strip_prefix(prefix.as_str()).unwrap_or(&object.key);
                (!rest.is_empty()).then(|| (rest.to_string(), object.size))
            })
            .collect())
    }
}

impl<C: ObjectClient + ?Sized> Clone for ObjectStoreDisk<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            bucket: self.bucket.clone(),
            root: self.root.clone(),
        }
    }
}

impl<C: ObjectClient + ?Sized> fmt::Debug for ObjectStoreDisk<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreDisk")
            .field("bucket", &self.bucket)
            .field("root", &self.root)
            .finish()
    }
}

#[async_trait]
impl<C: ObjectClient + ?Sized + 'static> Disk for ObjectStoreDisk<C> {
    /// Visibility has no meaning for the store and is ignored.
    async fn put(&self, path: &str, content: Bytes, _visibility: Visibility) -> DiskResult<()> {
        self.client
            .put_object(&self.bucket, &self.key(path), content)
            .await
    }

    async fn get(&self, path: &str) -> DiskResult<Bytes> {
        let mut stream = self.client.get_object(&self.bucket, &self.key(path)).await?;

        let mut body = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk?);
        }
        Ok(body.freeze())
    }

    /// Asks for the object attributes first and falls back to a head call
    /// when that fails or reports an empty object. Errors only when both
    /// calls fail.
    async fn attributes(&self, path: &str) -> DiskResult<Attributes> {
        let key = self.key(path);
        let attributes = self.client.get_object_attributes(&self.bucket, &key).await;

        if let Ok(a) = &attributes {
            if a.object_size > 0 {
                return Ok(Attributes::from_datetime(a.object_size, a.last_modified));
            }
        }

        tracing::debug!("falling back to head call for attributes of {}", key);
        let head = self.client.head_object(&self.bucket, &key).await;

        match (attributes, head) {
            (Ok(a), Ok(h)) => Ok(Attributes::from_datetime(
                h.content_length,
                a.last_modified.or(h.last_modified),
            )),
            (Err(_), Ok(h)) => Ok(Attributes::from_datetime(h.content_length, h.last_modified)),
            (Ok(a), Err(_)) => Ok(Attributes::from_datetime(0, a.last_modified)),
            (Err(_), Err(e)) => Err(e),
        }
    }

    async fn exists(&self, path: &str) -> bool {
        self.client
            .head_object(&self.bucket, &self.key(path))
            .await
            .is_ok()
    }

    /// Deletes each key in order. A delete the store accepts without
    /// reporting a removal fails with [`DiskError::NotConfirmed`].
    async fn delete(&self, paths: &[&str]) -> DiskResult<()> {
        for p in paths {
            let key = self.key(p);
            let result = self.client.delete_object(&self.bucket, &key).await?;
            if !result.delete_marker {
                return Err(DiskError::NotConfirmed(key));
            }
        }
        Ok(())
    }

    async fn files(&self, dir: &str) -> DiskResult<Vec<File>> {
        let disk = self.clone_disk();

        Ok(self
            .listing(dir)
            .await?
            .into_iter()
            .filter(|(rest, size)| !rest.contains(DELIMITER) && *size > 0)
            .map(|(rest, _)| File::new(Arc::clone(&disk), dir, rest))
            .collect())
    }

    async fn directories(&self, dir: &str) -> DiskResult<Vec<DiskRef>> {
        let base = self.key(dir);
        let listing = self.listing(dir).await?;

        let mut seen = BTreeSet::new();
        let mut directories = Vec::new();
        for (rest, size) in &listing {
            if !rest.contains(DELIMITER) && *size > 0 {
                continue;
            }
            let name = path::first_segment(rest);
            if seen.insert(name) {
                directories.push(self.prefix(&path::join(&base, name)));
            }
        }

        Ok(directories)
    }

    async fn make_directory(&self, dir: &str, _visibility: Visibility) -> DiskResult<()> {
        self.client
            .put_object(&self.bucket, &self.key(dir), Bytes::new())
            .await
    }

    /// Deletes every file, then every directory marker, then the marker of
    /// `dir` itself. Stops at the first failure, leaving the rest in place.
    ///
    /// The walk reaches only two levels below `dir`, so objects nested
    /// deeper survive a successful call.
    async fn delete_directory(&self, dir: &str) -> DiskResult<()> {
        let files = self.all_files(dir).await?;
        tracing::debug!("deleting {} files below {}", files.len(), self.key(dir));
        for file in &files {
            file.delete().await?;
        }

        let directories = self.all_directories(dir).await?;
        tracing::debug!(
            "deleting {} directory markers below {}",
            directories.len(),
            self.key(dir)
        );
        for directory in &directories {
            directory.delete(&[""]).await?;
        }

        // Implicit directories have no marker of their own.
        match self.delete(&[dir]).await {
            Err(DiskError::NotConfirmed(key)) => {
                tracing::debug!("no marker for {}", key);
                Ok(())
            }
            other => other,
        }
    }

    /// The full object key.
    fn path(&self, path: &str) -> String {
        self.key(path)
    }

    fn prefix(&self, root: &str) -> DiskRef {
        Arc::new(self.scoped(root.to_string()))
    }

    fn cwd(&self) -> &str {
        &self.root
    }

    fn clone_disk(&self) -> DiskRef {
        Arc::new(self.clone())
    }
}
