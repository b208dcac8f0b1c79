use async_trait::async_trait;

use crate::domain::entities::CachedResponse;
use crate::domain::value_objects::CachePartition;

/// Partitioned response cache with strict FIFO eviction by insertion order.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, partition: CachePartition, key: &str) -> Option<CachedResponse>;
    /// Re-inserting an existing key counts as a fresh insertion of that key.
    async fn put(&self, partition: CachePartition, key: String, response: CachedResponse);
    /// Makes room BEFORE an insertion so the bound is never transiently
    /// exceeded; removes oldest-inserted entries first.
    async fn evict_if_over_limit(&self, partition: CachePartition, limit: usize);
    async fn clear(&self, partition: CachePartition);
    async fn clear_all(&self);
    async fn entry_count(&self, partition: CachePartition) -> usize;
    async fn total_entries(&self) -> usize;
    /// Activation cleanup: drops caches stamped with another generation.
    async fn drop_stale_generations(&self);
}
