use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::application::ports::CacheStore;
use crate::domain::entities::CachedResponse;
use crate::domain::value_objects::CachePartition;
use crate::shared::config::CacheConfig;

/// One partition's storage. `order` tracks insertion order for eviction;
/// an entry appears in `order` exactly once.
#[derive(Default)]
struct Shelf {
    entries: HashMap<String, CachedResponse>,
    order: VecDeque<String>,
}

impl Shelf {
    fn get(&self, key: &str) -> Option<CachedResponse> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: String, response: CachedResponse) {
        if self.entries.insert(key.clone(), response).is_some() {
            self.order.retain(|existing| existing != &key);
        }
        self.order.push_back(key);
    }

    /// Removes oldest-inserted entries until an insertion would stay
    /// within `limit`.
    fn evict_for(&mut self, limit: usize) -> usize {
        let mut evicted = 0;
        while self.order.len() >= limit.max(1) {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            evicted += 1;
        }
        evicted
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// In-memory partitioned cache with strict FIFO eviction. Shelves are keyed
/// by their versioned name so a generation cutover can retire everything an
/// older worker left behind.
pub struct PartitionedCache {
    shelves: RwLock<HashMap<String, Shelf>>,
    prefix: String,
    version: String,
}

impl PartitionedCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            shelves: RwLock::new(HashMap::new()),
            prefix: config.prefix.clone(),
            version: config.version.clone(),
        }
    }

    fn shelf_name(&self, partition: CachePartition) -> String {
        partition.cache_name(&self.prefix, &self.version)
    }

    fn current_names(&self) -> Vec<String> {
        CachePartition::all()
            .iter()
            .map(|partition| self.shelf_name(*partition))
            .collect()
    }
}

#[async_trait]
impl CacheStore for PartitionedCache {
    async fn get(&self, partition: CachePartition, key: &str) -> Option<CachedResponse> {
        let shelves = self.shelves.read().await;
        shelves.get(&self.shelf_name(partition))?.get(key)
    }

    async fn put(&self, partition: CachePartition, key: String, response: CachedResponse) {
        let mut shelves = self.shelves.write().await;
        shelves
            .entry(self.shelf_name(partition))
            .or_default()
            .put(key, response);
    }

    async fn evict_if_over_limit(&self, partition: CachePartition, limit: usize) {
        let mut shelves = self.shelves.write().await;
        if let Some(shelf) = shelves.get_mut(&self.shelf_name(partition)) {
            let evicted = shelf.evict_for(limit);
            if evicted > 0 {
                debug!(partition = %partition, evicted, limit, "evicted oldest entries");
            }
        }
    }

    async fn clear(&self, partition: CachePartition) {
        let mut shelves = self.shelves.write().await;
        shelves.remove(&self.shelf_name(partition));
    }

    async fn clear_all(&self) {
        self.shelves.write().await.clear();
    }

    async fn entry_count(&self, partition: CachePartition) -> usize {
        let shelves = self.shelves.read().await;
        shelves
            .get(&self.shelf_name(partition))
            .map(Shelf::len)
            .unwrap_or(0)
    }

    async fn total_entries(&self) -> usize {
        let shelves = self.shelves.read().await;
        shelves.values().map(Shelf::len).sum()
    }

    async fn drop_stale_generations(&self) {
        let keep = self.current_names();
        let mut shelves = self.shelves.write().await;
        let before = shelves.len();
        shelves.retain(|name, _| keep.contains(name));
        let dropped = before - shelves.len();
        if dropped > 0 {
            debug!(dropped, version = %self.version, "retired stale cache generations");
        }
    }
}
