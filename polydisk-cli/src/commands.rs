// SPDX-License-Identifier: AGPL-3.0-or-later
//! CLI command implementations

use bytes::Bytes;
use chrono::{DateTime, Utc};
use console::style;
use polydisk_core::{
    path, Attributes, Disk, DiskError, DiskExt, DiskRef, DiskResult, Visibility,
};
use polydisk_disks::{DiskRegistry, LocalConfig, LocalDisk, StorageConfig};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tokio::io::AsyncReadExt;

const CONFIG_FILE: &str = "polydisk.toml";

/// Build the registry from `config`, else from the user config file, else a
/// single local disk rooted at the working directory.
pub fn load_registry(config: Option<&Path>) -> DiskResult<DiskRegistry> {
    if let Some(path) = config {
        tracing::debug!("loading disks from {}", path.display());
        return StorageConfig::load(path)?.build();
    }

    if let Some(dirs) = directories::ProjectDirs::from("dev", "hyperpolymath", "polydisk") {
        let path = dirs.config_dir().join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!("loading disks from {}", path.display());
            return StorageConfig::load(&path)?.build();
        }
    }

    Ok(fallback_registry())
}

fn fallback_registry() -> DiskRegistry {
    let mut registry = DiskRegistry::new();
    registry.register("local", Arc::new(LocalDisk::new(LocalConfig::default())));
    registry
}

fn visibility(private: bool) -> Visibility {
    if private {
        Visibility::Private
    } else {
        Visibility::Public
    }
}

async fn read_content(content: Option<String>) -> DiskResult<Bytes> {
    match content {
        Some(c) => Ok(Bytes::from(c)),
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            Ok(Bytes::from(buf))
        }
    }
}

/// Format a timestamp for display
fn format_time(dt: Option<DateTime<Utc>>) -> String {
    dt.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format file size
fn format_size(size: u64, human: bool) -> String {
    if human {
        bytesize::ByteSize(size).to_string()
    } else {
        size.to_string()
    }
}

/// `full` relative to `root`, for listings of scoped views.
fn relative_name(root: &str, full: &str) -> String {
    full.strip_prefix(root)
        .map(|rest| rest.trim_start_matches(path::DELIMITER))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(full)
        .to_string()
}

#[derive(Tabled)]
struct LsEntry {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
    #[tabled(rename = "Name")]
    name: String,
}

/// List directory contents
pub async fn ls(
    disk: &DiskRef,
    dir: &str,
    long: bool,
    recursive: bool,
    human: bool,
) -> DiskResult<()> {
    tracing::debug!("listing {:?} on {:?}", dir, disk.cwd());

    let (directories, files) = if recursive {
        (disk.all_directories(dir).await?, disk.all_files(dir).await?)
    } else {
        (disk.directories(dir).await?, disk.files(dir).await?)
    };

    let root = path::join(disk.cwd(), dir);
    let mut entries = Vec::with_capacity(directories.len() + files.len());

    for d in &directories {
        entries.push(LsEntry {
            kind: style("d").cyan().to_string(),
            size: "-".to_string(),
            modified: "-".to_string(),
            name: format!("{}/", relative_name(&root, d.cwd())),
        });
    }

    for file in &files {
        let attributes = file.disk().attributes(&file.full_name()).await.unwrap_or_default();
        let full = path::join(file.disk().cwd(), &file.full_name());
        entries.push(LsEntry {
            kind: "-".to_string(),
            size: format_size(attributes.size, human),
            modified: format_time(attributes.modified()),
            name: relative_name(&root, &full),
        });
    }

    if entries.is_empty() {
        println!("(empty directory)");
    } else if long {
        println!("{}", Table::new(entries));
    } else {
        for entry in entries {
            println!("{}", entry.name);
        }
    }

    Ok(())
}

/// Display file contents
pub async fn cat(disk: &DiskRef, path: &str) -> DiskResult<()> {
    let content = disk.get(path).await?;
    std::io::stdout().write_all(&content)?;
    Ok(())
}

pub async fn put(
    disk: &DiskRef,
    path: &str,
    content: Option<String>,
    private: bool,
) -> DiskResult<()> {
    let content = read_content(content).await?;
    let size = content.len() as u64;
    disk.put(path, content, visibility(private)).await?;
    println!("Wrote {} ({})", path, bytesize::ByteSize(size));
    Ok(())
}

pub async fn append(disk: &DiskRef, path: &str, content: Option<String>) -> DiskResult<()> {
    disk.append(path, read_content(content).await?).await?;
    println!("Appended to {}", path);
    Ok(())
}

pub async fn prepend(disk: &DiskRef, path: &str, content: Option<String>) -> DiskResult<()> {
    disk.prepend(path, read_content(content).await?).await?;
    println!("Prepended to {}", path);
    Ok(())
}

/// Copy files
pub async fn cp(disk: &DiskRef, source: &str, dest: &str) -> DiskResult<()> {
    disk.copy(source, dest).await?;
    println!("Copied {} -> {}", source, dest);
    Ok(())
}

/// Move/rename files
pub async fn mv(disk: &DiskRef, source: &str, dest: &str) -> DiskResult<()> {
    disk.move_to(source, dest).await?;
    println!("Moved {} -> {}", source, dest);
    Ok(())
}

/// Remove files
pub async fn rm(disk: &DiskRef, paths: &[String]) -> DiskResult<()> {
    for path in paths {
        disk.delete(&[path.as_str()]).await?;
        println!("Removed {}", path);
    }
    Ok(())
}

pub async fn mkdir(disk: &DiskRef, dir: &str, private: bool) -> DiskResult<()> {
    disk.make_directory(dir, visibility(private)).await?;
    println!("Created {}", dir);
    Ok(())
}

pub async fn rmdir(disk: &DiskRef, dir: &str) -> DiskResult<()> {
    disk.delete_directory(dir).await?;
    println!("Removed {}", dir);
    Ok(())
}

/// Show file information
pub async fn stat(disk: &DiskRef, path: &str) -> DiskResult<()> {
    if disk.missing(path).await {
        return Err(DiskError::NotFound(path.to_string()));
    }

    let attributes: Attributes = disk.attributes(path).await?;

    println!("  Path: {}", disk.path(path));
    println!("  Size: {} ({})", attributes.size, bytesize::ByteSize(attributes.size));
    println!("  Modified: {}", format_time(attributes.modified()));

    Ok(())
}

#[derive(Tabled)]
struct DiskEntry {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "Root")]
    root: String,
}

/// List configured disks
pub fn disks(registry: &DiskRegistry) -> DiskResult<()> {
    let entries: Vec<DiskEntry> = registry
        .list()
        .into_iter()
        .filter_map(|name| registry.get(name).map(|disk| (name, disk)))
        .map(|(name, disk)| DiskEntry {
            name: name.to_string(),
            default: if registry.default_name() == Some(name) {
                style("*").green().to_string()
            } else {
                String::new()
            },
            root: disk.path(""),
        })
        .collect();

    if entries.is_empty() {
        println!("No disks configured");
    } else {
        println!("{}", Table::new(entries));
    }

    Ok(())
}
