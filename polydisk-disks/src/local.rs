//! Local filesystem disk

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use polydisk_core::{
    path, Attributes, Disk, DiskError, DiskRef, DiskResult, File, Visibility,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::{LocalConfig, LocalPermissions};

/// Local filesystem disk
///
/// Files and directories map 1:1 onto the host filesystem below the
/// configured prefix. Visibility picks the permission mode used when a file
/// or directory is created.
#[derive(Debug, Clone)]
pub struct LocalDisk {
    config: LocalConfig,
    permissions: LocalPermissions,
}

impl LocalDisk {
    pub fn new(config: LocalConfig) -> Self {
        let permissions = config.permissions();
        Self { config, permissions }
    }

    pub fn config(&self) -> &LocalConfig {
        &self.config
    }

    pub fn permissions(&self) -> LocalPermissions {
        self.permissions
    }

    fn to_real_path(&self, path: &str) -> PathBuf {
        let joined = path::join(&self.config.prefix, path);
        if joined.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(joined)
        }
    }

    /// Names of the entries of `dir` and whether each is a directory.
    ///
    /// A directory that cannot be read lists as empty.
    async fn entries(&self, dir: &str) -> Vec<(String, bool)> {
        let mut read_dir = match fs::read_dir(self.to_real_path(dir)).await {
            Ok(read_dir) => read_dir,
            Err(_) => return Vec::new(),
        };

        let mut entries = Vec::new();
        while let Ok(Some(entry)) = read_dir.next_entry().await {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            entries.push((entry.file_name().to_string_lossy().into_owned(), is_dir));
        }
        entries.sort();
        entries
    }

    async fn write(&self, path: &str, content: &[u8], visibility: Visibility) -> DiskResult<()> {
        let real = self.to_real_path(path);
        let io_err = |e| DiskError::from_io(e, real.display().to_string());

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(self.permissions.file(visibility).mode);
        #[cfg(not(unix))]
        let _ = visibility;

        let mut file = options.open(&real).await.map_err(io_err)?;
        file.write_all(content).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;
        Ok(())
    }
}

#[async_trait]
impl Disk for LocalDisk {
    async fn put(&self, path: &str, content: Bytes, visibility: Visibility) -> DiskResult<()> {
        self.make_directory(path::parent(path), visibility).await?;
        self.write(path, &content, visibility).await
    }

    async fn get(&self, path: &str) -> DiskResult<Bytes> {
        let real = self.to_real_path(path);
        fs::read(&real)
            .await
            .map(Bytes::from)
            .map_err(|e| DiskError::from_io(e, real.display().to_string()))
    }

    /// Never fails: anything the filesystem refuses to stat reports the
    /// zero value.
    async fn attributes(&self, path: &str) -> DiskResult<Attributes> {
        match fs::metadata(self.to_real_path(path)).await {
            Ok(meta) => {
                let modified = meta.modified().ok().map(DateTime::<Utc>::from);
                Ok(Attributes::from_datetime(meta.len(), modified))
            }
            Err(_) => Ok(Attributes::default()),
        }
    }

    async fn exists(&self, path: &str) -> bool {
        fs::metadata(self.to_real_path(path)).await.is_ok()
    }

    /// Removes files and empty directories. A directory with entries fails.
    async fn delete(&self, paths: &[&str]) -> DiskResult<()> {
        for p in paths {
            let real = self.to_real_path(p);
            let io_err = |e| DiskError::from_io(e, real.display().to_string());

            let meta = fs::symlink_metadata(&real).await.map_err(io_err)?;
            if meta.is_dir() {
                fs::remove_dir(&real).await.map_err(io_err)?;
            } else {
                fs::remove_file(&real).await.map_err(io_err)?;
            }
        }
        Ok(())
    }

    async fn files(&self, dir: &str) -> DiskResult<Vec<File>> {
        Ok(self
            .entries(dir)
            .await
            .into_iter()
            .filter(|(_, is_dir)| !is_dir)
            .map(|(name, _)| File::new(self.clone_disk(), dir, name))
            .collect())
    }

    async fn directories(&self, dir: &str) -> DiskResult<Vec<DiskRef>> {
        let base = path::join(&self.config.prefix, dir);
        Ok(self
            .entries(dir)
            .await
            .into_iter()
            .filter(|(_, is_dir)| *is_dir)
            .map(|(name, _)| self.prefix(&path::join(&base, &name)))
            .collect())
    }

    async fn make_directory(&self, dir: &str, visibility: Visibility) -> DiskResult<()> {
        let real = self.to_real_path(dir);
        let mode = self.permissions.directory(visibility).mode;
        tracing::debug!("creating directory {} with mode {:o}", real.display(), mode);

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(mode);

        builder
            .create(&real)
            .await
            .map_err(|e| DiskError::from_io(e, real.display().to_string()))
    }

    async fn delete_directory(&self, dir: &str) -> DiskResult<()> {
        let real = self.to_real_path(dir);
        fs::remove_dir_all(&real)
            .await
            .map_err(|e| DiskError::from_io(e, real.display().to_string()))
    }

    /// Absolute filesystem path of `path`.
    fn path(&self, path: &str) -> String {
        let real = self.to_real_path(path);
        let absolute = if real.is_absolute() {
            real
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&real))
                .unwrap_or(real)
        };
        absolute.display().to_string()
    }

    fn prefix(&self, root: &str) -> DiskRef {
        let mut config = self.config.clone();
        config.prefix = root.to_string();
        Arc::new(Self {
            config,
            permissions: self.permissions,
        })
    }

    fn cwd(&self) -> &str {
        &self.config.prefix
    }

    fn clone_disk(&self) -> DiskRef {
        Arc::new(self.clone())
    }
}
