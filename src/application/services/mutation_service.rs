use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::ports::{MutationStore, NetworkError, NetworkGateway, SyncScheduler};
use crate::domain::entities::{FetchRequest, FetchResponse, MutationDraft};
use crate::shared::error::AppError;

/// Handles every non-GET request. Tries the network directly; when the
/// network is unreachable, a POST/PATCH/DELETE is serialized into the
/// durable queue and the caller gets an accepted-but-queued answer instead
/// of an error. At-least-once, fire-and-forget: the caller is told the
/// action is pending, not confirmed.
pub struct MutationService {
    network: Arc<dyn NetworkGateway>,
    store: Arc<dyn MutationStore>,
    scheduler: Arc<dyn SyncScheduler>,
    sync_tag: String,
}

impl MutationService {
    pub fn new(
        network: Arc<dyn NetworkGateway>,
        store: Arc<dyn MutationStore>,
        scheduler: Arc<dyn SyncScheduler>,
        sync_tag: String,
    ) -> Self {
        Self {
            network,
            store,
            scheduler,
            sync_tag,
        }
    }

    pub async fn handle(&self, request: FetchRequest) -> Result<FetchResponse, AppError> {
        match self.network.send(&request).await {
            Ok(response) => Ok(response),
            Err(NetworkError::Offline(reason)) if request.method.is_mutation() => {
                debug!(
                    url = %request.url,
                    method = %request.method,
                    reason = %reason,
                    "mutation failed at network layer, queueing"
                );

                let draft = MutationDraft::from_request(&request);
                // A failed append is the one failure that must reach the
                // caller; queueing never fails silently.
                let queued = self.store.enqueue(draft).await?;

                if let Err(err) = self.scheduler.register(&self.sync_tag).await {
                    warn!(tag = %self.sync_tag, error = %err, "background sync registration failed");
                }

                debug!(id = %queued.id, local_id = %queued.local_id, "mutation queued");
                Ok(FetchResponse::queued())
            }
            Err(NetworkError::Offline(_)) => {
                // Idempotent methods are not queued; the caller gets the
                // structured offline error.
                Ok(FetchResponse::offline())
            }
            Err(NetworkError::Invalid(reason)) => Err(AppError::InvalidInput(reason)),
        }
    }
}
