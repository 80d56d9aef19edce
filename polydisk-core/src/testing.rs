//! Minimal disks for exercising the contract crate in isolation

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::{path, Attributes, Disk, DiskError, DiskRef, DiskResult, File, Visibility};

/// Flat map of full paths to bodies; directories exist implicitly.
#[derive(Clone, Default)]
pub(crate) struct MapDisk {
    root: String,
    entries: Arc<Mutex<BTreeMap<String, Bytes>>>,
}

impl MapDisk {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn with_root(&self, root: &str) -> Self {
        Self {
            root: root.to_string(),
            entries: self.entries.clone(),
        }
    }

    fn key(&self, p: &str) -> String {
        path::join(&self.root, p)
    }

    fn below(&self, dir: &str) -> Vec<String> {
        let prefix = format!("{}/", self.key(dir));
        self.entries
            .lock()
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix).map(String::from))
            .collect()
    }
}

#[async_trait]
impl Disk for MapDisk {
    async fn put(&self, path: &str, content: Bytes, _visibility: Visibility) -> DiskResult<()> {
        self.entries.lock().insert(self.key(path), content);
        Ok(())
    }

    async fn get(&self, path: &str) -> DiskResult<Bytes> {
        let key = self.key(path);
        self.entries
            .lock()
            .get(&key)
            .cloned()
            .ok_or(DiskError::NotFound(key))
    }

    async fn attributes(&self, path: &str) -> DiskResult<Attributes> {
        let body = self.get(path).await?;
        Ok(Attributes::new(body.len() as u64, 1))
    }

    async fn exists(&self, path: &str) -> bool {
        self.entries.lock().contains_key(&self.key(path))
    }

    async fn delete(&self, paths: &[&str]) -> DiskResult<()> {
        for p in paths {
            let key = self.key(p);
            if self.entries.lock().remove(&key).is_none() {
                return Err(DiskError::NotFound(key));
            }
        }
        Ok(())
    }

    async fn files(&self, dir: &str) -> DiskResult<Vec<File>> {
        Ok(self
            .below(dir)
            .into_iter()
            .filter(|rest| !rest.contains(path::DELIMITER))
            .map(|name| File::new(self.clone_disk(), dir, name))
            .collect())
    }

    async fn directories(&self, dir: &str) -> DiskResult<Vec<DiskRef>> {
        let names: BTreeSet<String> = self
            .below(dir)
            .iter()
            .filter(|rest| rest.contains(path::DELIMITER))
            .map(|rest| path::first_segment(rest).to_string())
            .collect();

        Ok(names
            .iter()
            .map(|name| self.prefix(&path::join(&self.key(dir), name)))
            .collect())
    }

    async fn make_directory(&self, _dir: &str, _visibility: Visibility) -> DiskResult<()> {
        Ok(())
    }

    async fn delete_directory(&self, dir: &str) -> DiskResult<()> {
        let prefix = format!("{}/", self.key(dir));
        self.entries.lock().retain(|k, _| !k.starts_with(&prefix));
        Ok(())
    }

    fn path(&self, path: &str) -> String {
        self.key(path)
    }

    fn prefix(&self, root: &str) -> DiskRef {
        Arc::new(self.with_root(root))
    }

    fn cwd(&self) -> &str {
        &self.root
    }

    fn clone_disk(&self) -> DiskRef {
        Arc::new(self.clone())
    }
}

/// [`MapDisk`] whose deletes always fail.
#[derive(Clone, Default)]
pub(crate) struct FlakyDeleteDisk {
    inner: MapDisk,
}

impl FlakyDeleteDisk {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Disk for FlakyDeleteDisk {
    async fn put(&self, path: &str, content: Bytes, visibility: Visibility) -> DiskResult<()> {
        self.inner.put(path, content, visibility).await
    }

    async fn get(&self, path: &str) -> DiskResult<Bytes> {
        self.inner.get(path).await
    }

    async fn attributes(&self, path: &str) -> DiskResult<Attributes> {
        self.inner.attributes(path).await
    }

    async fn exists(&self, path: &str) -> bool {
        self.inner.exists(path).await
    }

    async fn delete(&self, paths: &[&str]) -> DiskResult<()> {
        Err(DiskError::PermissionDenied(paths.join(",")))
    }

    async fn files(&self, dir: &str) -> DiskResult<Vec<File>> {
        self.inner.files(dir).await
    }

    async fn directories(&self, dir: &str) -> DiskResult<Vec<DiskRef>> {
        self.inner.directories(dir).await
    }

    async fn make_directory(&self, dir: &str, visibility: Visibility) -> DiskResult<()> {
        self.inner.make_directory(dir, visibility).await
    }

    async fn delete_directory(&self, dir: &str) -> DiskResult<()> {
        self.inner.delete_directory(dir).await
    }

    fn path(&self, path: &str) -> String {
        self.inner.path(path)
    }

    fn prefix(&self, root: &str) -> DiskRef {
        Arc::new(Self {
            inner: self.inner.with_root(root),
        })
    }

    fn cwd(&self) -> &str {
        self.inner.cwd()
    }

    fn clone_disk(&self) -> DiskRef {
        Arc::new(self.clone())
    }
}
