//! Storage Router Module
//!
//! Stateless coordinator over the two storage tiers. Validates each request,
//! fans it out to the memory and/or durable tier, and merges the answers.
//!
//! Disk calls block, so they run on the blocking thread pool; two-tier
//! operations start the disk future first and work the memory tier while it
//! runs.

use std::sync::Arc;

use tokio::sync::{Notify, RwLock};
use tokio::task;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::models::{KeyValue, StorageRow};
use crate::storage::{DiskStore, MemoryStore};

// == Storage Router ==
/// Routes operations across the memory and durable tiers.
///
/// Holds no state of its own beyond the tier handles and the sweeper wakeup.
#[derive(Clone)]
pub struct StorageRouter {
    memory: Arc<RwLock<MemoryStore>>,
    disk: Arc<DiskStore>,
    sweep: Arc<Notify>,
}

impl StorageRouter {
    /// Creates a router over the given tiers. `sweep` is signalled after
    /// every memory-tier write so the sweeper can reclaim promptly.
    pub fn new(memory: Arc<RwLock<MemoryStore>>, disk: Arc<DiskStore>, sweep: Arc<Notify>) -> Self {
        Self {
            memory,
            disk,
            sweep,
        }
    }

    // == Set ==
    /// Stores a value in exactly one tier, selected by `persistent`.
    ///
    /// Rejects an empty key or an empty value. `ttl_seconds` only applies to
    /// the memory tier; durable entries live until deleted.
    pub async fn set(
        &self,
        key: &str,
        value: &str,
        group: &str,
        ttl_seconds: i64,
        persistent: bool,
    ) -> Result<bool> {
        if key.is_empty() || value.is_empty() {
            return Err(CacheError::InvalidRequest(
                "Key and value must not be empty".to_string(),
            ));
        }

        if persistent {
            debug!(key = %key, "routing SET to durable tier");
            let disk = Arc::clone(&self.disk);
            let (key, value, group) = (key.to_string(), value.to_string(), group.to_string());
            task::spawn_blocking(move || disk.set(&key, &value, &group)).await?
        } else {
            debug!(key = %key, "routing SET to memory tier");
            let stored = self.memory.write().await.set(
                key.to_string(),
                value.to_string(),
                group.to_string(),
                ttl_seconds,
            );
            self.sweep.notify_one();
            Ok(stored)
        }
    }

    // == Get Key ==
    /// Looks a key up in the memory tier first; only a miss (empty value)
    /// falls through to the durable tier. The found value is not promoted
    /// back into memory.
    pub async fn get_key(&self, key: &str) -> Result<String> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest(
                "Key must not be empty".to_string(),
            ));
        }

        let from_memory = self.memory.read().await.get(key);
        if !from_memory.is_empty() {
            debug!(key = %key, "GET KEY served by memory tier");
            return Ok(from_memory);
        }

        debug!(key = %key, "memory miss, querying durable tier");
        let disk = Arc::clone(&self.disk);
        let key = key.to_string();
        task::spawn_blocking(move || disk.get(&key)).await?
    }

    // == Get Group ==
    /// Queries both tiers concurrently and concatenates their answers,
    /// memory entries first. A key present in both tiers appears twice;
    /// the union is deliberately not deduplicated.
    pub async fn get_group(&self, group: &str) -> Result<Vec<KeyValue>> {
        if group.is_empty() {
            return Err(CacheError::InvalidRequest(
                "Group must not be empty".to_string(),
            ));
        }

        let disk = Arc::clone(&self.disk);
        let disk_group = group.to_string();
        let disk_task = task::spawn_blocking(move || disk.get_group(&disk_group));

        let mut merged = self.memory.read().await.get_group(group);
        let memory_hits = merged.len();
        merged.extend(disk_task.await??);

        debug!(
            group = %group,
            memory = memory_hits,
            total = merged.len(),
            "GET GROUP merged"
        );
        Ok(merged)
    }

    // == Delete Key ==
    /// Dispatches the delete to both tiers concurrently and returns the sum
    /// of their removal counts: 0, 1, or 2. A result of 2 means both tiers
    /// held the key.
    pub async fn delete_key(&self, key: &str) -> Result<u64> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest(
                "Key must not be empty".to_string(),
            ));
        }

        let disk = Arc::clone(&self.disk);
        let disk_key = key.to_string();
        let disk_task = task::spawn_blocking(move || disk.delete(&disk_key));

        let from_memory = self.memory.write().await.delete(key);
        let from_disk = disk_task.await??;

        debug!(key = %key, from_memory, from_disk, "DELETE KEY");
        Ok(from_memory + from_disk)
    }

    // == Delete Group ==
    /// Dispatches the group delete to both tiers concurrently and returns
    /// the sum of the per-tier counts.
    pub async fn delete_group(&self, group: &str) -> Result<u64> {
        if group.is_empty() {
            return Err(CacheError::InvalidRequest(
                "Group must not be empty".to_string(),
            ));
        }

        let disk = Arc::clone(&self.disk);
        let disk_group = group.to_string();
        let disk_task = task::spawn_blocking(move || disk.delete_group(&disk_group));

        let from_memory = self.memory.write().await.delete_group(group);
        let from_disk = disk_task.await??;

        debug!(group = %group, from_memory, from_disk, "DELETE GROUP");
        Ok(from_memory + from_disk)
    }

    // == List ==
    /// Snapshots both tiers concurrently; memory entries first.
    pub async fn list(&self) -> Result<Vec<StorageRow>> {
        let disk = Arc::clone(&self.disk);
        let disk_task = task::spawn_blocking(move || disk.list());

        let mut merged = self.memory.read().await.list();
        merged.extend(disk_task.await??);
        Ok(merged)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MAX_BYTES: usize = 1024 * 1024;

    fn router() -> StorageRouter {
        let memory = Arc::new(RwLock::new(MemoryStore::new(TEST_MAX_BYTES)));
        let disk = Arc::new(DiskStore::open_in_memory().unwrap());
        StorageRouter::new(memory, disk, Arc::new(Notify::new()))
    }

    #[tokio::test]
    async fn test_router_set_memory_then_get() {
        let router = router();

        assert!(router.set("k", "v", "g", 3600, false).await.unwrap());
        assert_eq!(router.get_key("k").await.unwrap(), "v");
    }

    #[tokio::test]
    async fn test_router_set_routes_to_one_tier_only() {
        let router = router();

        router.set("mem", "1", "g", 0, false).await.unwrap();
        router.set("dur", "2", "g", 0, true).await.unwrap();

        // Each tier holds exactly its own key.
        assert_eq!(router.memory.read().await.get("mem"), "1");
        assert_eq!(router.memory.read().await.get("dur"), "");
        assert_eq!(router.disk.get("dur").unwrap(), "2");
        assert_eq!(router.disk.get("mem").unwrap(), "");
    }

    #[tokio::test]
    async fn test_router_get_key_falls_through_to_disk() {
        let router = router();

        router.set("p", "x", "g", 0, true).await.unwrap();
        assert_eq!(router.get_key("p").await.unwrap(), "x");

        // The durable hit is not promoted into memory.
        assert_eq!(router.memory.read().await.get("p"), "");
    }

    #[tokio::test]
    async fn test_router_get_key_memory_shadows_disk() {
        let router = router();

        router.set("k", "durable", "g", 0, true).await.unwrap();
        router.set("k", "fresh", "g", 0, false).await.unwrap();

        assert_eq!(router.get_key("k").await.unwrap(), "fresh");
    }

    #[tokio::test]
    async fn test_router_get_key_absent_everywhere() {
        let router = router();
        assert_eq!(router.get_key("nope").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_router_get_group_unions_both_tiers() {
        let router = router();

        router.set("a", "1", "G", 0, false).await.unwrap();
        router.set("b", "2", "G", 0, true).await.unwrap();
        router.set("c", "3", "other", 0, false).await.unwrap();

        let result = router.get_group("G").await.unwrap();
        assert_eq!(result.len(), 2);
        // Memory contribution comes first.
        assert_eq!(result[0].key, "a");
        assert_eq!(result[1].key, "b");
    }

    #[tokio::test]
    async fn test_router_get_group_keeps_cross_tier_duplicates() {
        let router = router();

        router.set("k", "in-memory", "G", 0, false).await.unwrap();
        router.set("k", "on-disk", "G", 0, true).await.unwrap();

        let result = router.get_group("G").await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].value, "in-memory");
        assert_eq!(result[1].value, "on-disk");
    }

    #[tokio::test]
    async fn test_router_delete_key_sums_tier_counts() {
        let router = router();

        router.set("both", "m", "g", 0, false).await.unwrap();
        router.set("both", "d", "g", 0, true).await.unwrap();
        router.set("memonly", "m", "g", 0, false).await.unwrap();

        assert_eq!(router.delete_key("both").await.unwrap(), 2);
        assert_eq!(router.delete_key("memonly").await.unwrap(), 1);
        assert_eq!(router.delete_key("absent").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_router_delete_group_sums_tier_counts() {
        let router = router();

        router.set("a", "1", "G", 0, false).await.unwrap();
        router.set("b", "2", "G", 0, false).await.unwrap();
        router.set("c", "3", "G", 0, true).await.unwrap();

        assert_eq!(router.delete_group("G").await.unwrap(), 3);
        assert!(router.get_group("G").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_router_list_merges_memory_first() {
        let router = router();

        router.set("m", "1", "G", 0, false).await.unwrap();
        router.set("d", "2", "H", 0, true).await.unwrap();

        let rows = router.list().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "m");
        assert_eq!(rows[1].key, "d");
        assert_eq!(rows[1].group, "H");
    }

    #[tokio::test]
    async fn test_router_validation_rejects_empty_fields() {
        let router = router();

        assert!(matches!(
            router.set("", "v", "g", 0, false).await,
            Err(CacheError::InvalidRequest(_))
        ));
        assert!(matches!(
            router.set("k", "", "g", 0, false).await,
            Err(CacheError::InvalidRequest(_))
        ));
        assert!(matches!(
            router.get_key("").await,
            Err(CacheError::InvalidRequest(_))
        ));
        assert!(matches!(
            router.get_group("").await,
            Err(CacheError::InvalidRequest(_))
        ));
        assert!(matches!(
            router.delete_key("").await,
            Err(CacheError::InvalidRequest(_))
        ));
        assert!(matches!(
            router.delete_group("").await,
            Err(CacheError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_router_empty_group_on_set_is_allowed() {
        let router = router();

        assert!(router.set("k", "v", "", 0, false).await.unwrap());
        assert_eq!(router.get_key("k").await.unwrap(), "v");
    }
}
