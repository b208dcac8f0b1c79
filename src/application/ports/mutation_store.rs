use async_trait::async_trait;

use crate::domain::entities::{MutationDraft, QueuedMutation};
use crate::domain::value_objects::MutationId;
use crate::shared::error::AppError;

/// Durable FIFO queue of pending mutations. Append and removal are
/// transactional; a failed append must surface to the caller.
#[async_trait]
pub trait MutationStore: Send + Sync {
    async fn enqueue(&self, draft: MutationDraft) -> Result<QueuedMutation, AppError>;
    /// All pending entries in enqueue order.
    async fn pending(&self) -> Result<Vec<QueuedMutation>, AppError>;
    async fn remove(&self, id: MutationId) -> Result<(), AppError>;
    /// Bumps the attempt counter, returning the new value.
    async fn record_failure(&self, id: MutationId) -> Result<u32, AppError>;
    async fn queue_len(&self) -> Result<u64, AppError>;
}
