use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::application::ports::SyncScheduler;
use crate::shared::error::AppError;

/// Host-side sync registration. A registered tag means the queue has work;
/// the tag stays set until a replay pass drains it.
#[derive(Default)]
pub struct SyncTagRegistry {
    tags: RwLock<HashSet<String>>,
}

impl SyncTagRegistry {
    pub async fn is_registered(&self, tag: &str) -> bool {
        self.tags.read().await.contains(tag)
    }

    pub async fn complete(&self, tag: &str) {
        self.tags.write().await.remove(tag);
    }
}

#[async_trait]
impl SyncScheduler for SyncTagRegistry {
    async fn register(&self, tag: &str) -> Result<(), AppError> {
        let inserted = self.tags.write().await.insert(tag.to_string());
        if inserted {
            debug!(tag, "sync tag registered");
        }
        Ok(())
    }
}
