use async_trait::async_trait;

use crate::shared::error::AppError;

/// Platform background-sync registration. The tag registered after queueing
/// is what later wakes the sync engine.
#[async_trait]
pub trait SyncScheduler: Send + Sync {
    async fn register(&self, tag: &str) -> Result<(), AppError>;
}
