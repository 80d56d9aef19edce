//! In-memory object store
//!
//! [`MemoryClient`] keeps objects in a map and answers every
//! [`ObjectClient`] call; [`MemoryDisk`] is the object-store disk wired to
//! it. Nothing is persisted.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use polydisk_core::{ByteStream, DiskError, DiskResult};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::client::{
    DeleteObject, HeadObject, ObjectAttributes, ObjectClient, ObjectSummary,
};
use crate::config::{MemoryConfig, ObjectStoreConfig};
use crate::object_store::ObjectStoreDisk;

/// Object-store disk over a fresh [`MemoryClient`]
pub type MemoryDisk = ObjectStoreDisk<MemoryClient>;

impl ObjectStoreDisk<MemoryClient> {
    pub fn in_memory(config: MemoryConfig) -> Self {
        ObjectStoreDisk::new(
            Arc::new(MemoryClient::new()),
            ObjectStoreConfig {
                bucket: String::new(),
                prefix: config.prefix,
            },
        )
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    content: Bytes,
    last_modified: DateTime<Utc>,
}

/// Object client holding every object in memory
///
/// Bucket names are accepted and ignored; all objects share one key space.
#[derive(Debug, Default)]
pub struct MemoryClient {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    fn lookup(&self, key: &str) -> DiskResult<StoredObject> {
        self.objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| DiskError::NotFound(key.to_string()))
    }
}

#[async_trait]
impl ObjectClient for MemoryClient {
    async fn put_object(&self, _bucket: &str, key: &str, body: Bytes) -> DiskResult<()> {
        let object = StoredObject {
            content: body,
            last_modified: Utc::now(),
        };
        self.objects.write().insert(key.to_string(), object);
        Ok(())
    }

    async fn get_object(&self, _bucket: &str, key: &str) -> DiskResult<ByteStream> {
        let object = self.lookup(key)?;
        let body = futures::stream::once(async move { Ok::<_, DiskError>(object.content) });
        Ok(Box::pin(body))
    }

    async fn get_object_attributes(
        &self,
        _bucket: &str,
        key: &str,
    ) -> DiskResult<ObjectAttributes> {
        let object = self.lookup(key)?;
        Ok(ObjectAttributes {
            object_size: object.content.len() as u64,
            last_modified: Some(object.last_modified),
        })
    }

    async fn head_object(&self, _bucket: &str, key: &str) -> DiskResult<HeadObject> {
        let object = self.lookup(key)?;
        Ok(HeadObject {
            content_length: object.content.len() as u64,
            last_modified: Some(object.last_modified),
        })
    }

    /// Reports a removal when any stored key starts with `key`, checked
    /// before the object itself is removed.
    async fn delete_object(&self, _bucket: &str, key: &str) -> DiskResult<DeleteObject> {
        let mut objects = self.objects.write();
        let delete_marker = objects.keys().any(|k| k.starts_with(key));
        objects.remove(key);
        Ok(DeleteObject { delete_marker })
    }

    async fn list_objects(&self, _bucket: &str, prefix: &str) -> DiskResult<Vec<ObjectSummary>> {
        Ok(self
            .objects
            .read()
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, object)| ObjectSummary {
                key: k.clone(),
                size: object.content.len() as u64,
                last_modified: Some(object.last_modified),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use polydisk_core::{Disk, DiskExt, Visibility};

    #[tokio::test]
    async fn test_put_and_get_object() {
        let client = MemoryClient::new();
        client.put_object("b", "k", Bytes::from_static(b"body")).await.unwrap();

        let mut stream = client.get_object("other-bucket", "k").await.unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), Bytes::from_static(b"body"));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let client = MemoryClient::new();
        assert!(client.get_object("b", "k").await.is_err());
        assert!(client.head_object("b", "k").await.unwrap_err().is_not_found());
        assert!(client.get_object_attributes("b", "k").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_marker_follows_key_prefix() {
        let client = MemoryClient::new();
        client.put_object("b", "dir/file", Bytes::from_static(b"x"))
            .await
            .unwrap();

        assert!(client.delete_object("b", "dir").await.unwrap().delete_marker);
        assert!(!client.delete_object("b", "other").await.unwrap().delete_marker);
        assert!(client.delete_object("b", "dir/file").await.unwrap().delete_marker);
        assert!(!client.delete_object("b", "dir/file").await.unwrap().delete_marker);
        assert!(client.is_empty());
    }

    #[tokio::test]
    async fn test_list_objects_by_prefix() {
        let client = MemoryClient::new();
        for key in ["a/1", "a/2/3", "ab", "b"] {
            client.put_object("b", key, Bytes::from_static(b"x"))
                .await
                .unwrap();
        }

        let keys: Vec<_> = client
            .list_objects("b", "a/")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();

        assert_eq!(keys, vec!["a/1", "a/2/3"]);
        assert_eq!(client.list_objects("b", "").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_memory_disk_roundtrip() {
        let disk = MemoryDisk::in_memory(MemoryConfig::default());
        disk.put("a/b.txt", Bytes::from_static(b"hello"), Visibility::Public)
            .await
            .unwrap();

        assert_eq!(disk.get("a/b.txt").await.unwrap(), Bytes::from_static(b"hello"));
        assert_eq!(disk.size("a/b.txt").await, 5);
        assert_eq!(disk.client().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_disk_uses_prefix() {
        let disk = MemoryDisk::in_memory(MemoryConfig { prefix: "root".into() });
        disk.put("f", Bytes::from_static(b"x"), Visibility::Public)
            .await
            .unwrap();

        assert_eq!(disk.cwd(), "root");
        assert!(disk.client().head_object("", "root/f").await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_marker_falls_back_to_head() {
        let disk = MemoryDisk::in_memory(MemoryConfig::default());
        disk.make_directory("dir", Visibility::Public).await.unwrap();

        let attributes = disk.attributes("dir").await.unwrap();
        assert_eq!(attributes.size, 0);
        assert!(attributes.last_modified > 0);
    }
}
