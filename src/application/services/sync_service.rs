use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::application::ports::{ClientNotifier, MutationStore, NetworkGateway};
use crate::domain::entities::SyncReport;
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;

/// Retry behavior for a replay pass. The defaults mirror the original
/// worker: unlimited attempts and no backoff, every trigger retries the
/// full remaining queue.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: Option<u32>,
    pub base_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_backoff: Duration::from_millis(config.base_backoff_ms),
        }
    }

    fn backoff_for(&self, consecutive_failures: u32) -> Option<Duration> {
        if self.base_backoff.is_zero() || consecutive_failures == 0 {
            return None;
        }
        let exponent = consecutive_failures.saturating_sub(1).min(8);
        let millis = (self.base_backoff.as_millis() as u64).saturating_mul(1 << exponent);
        let jitter = rand::thread_rng().gen_range(0..=(millis / 5).max(1));
        Some(Duration::from_millis(millis.saturating_add(jitter)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            base_backoff: Duration::ZERO,
        }
    }
}

/// Replays the delivery queue in strict enqueue order. Ordering matters:
/// edits and deletes must land after the creations they depend on, and the
/// queue's insertion order reflects causal user-action order.
pub struct SyncService {
    store: Arc<dyn MutationStore>,
    network: Arc<dyn NetworkGateway>,
    clients: Arc<dyn ClientNotifier>,
    policy: RetryPolicy,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn MutationStore>,
        network: Arc<dyn NetworkGateway>,
        clients: Arc<dyn ClientNotifier>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            store,
            network,
            clients,
            policy,
        }
    }

    /// One full pass: successes leave the queue, failures stay, nothing is
    /// duplicated. The report is broadcast to every open client.
    pub async fn replay_queue(&self) -> Result<SyncReport, AppError> {
        let pending = self.store.pending().await?;
        let mut report = SyncReport::default();
        let mut consecutive_failures = 0u32;

        for entry in pending {
            if let Some(delay) = self.policy.backoff_for(consecutive_failures) {
                tokio::time::sleep(delay).await;
            }

            let request = entry.to_request();
            let delivered = matches!(
                self.network.send(&request).await,
                Ok(response) if response.is_success()
            );

            if delivered {
                self.store.remove(entry.id).await?;
                report.replayed_count += 1;
                consecutive_failures = 0;
                continue;
            }

            consecutive_failures += 1;
            let attempts = self.store.record_failure(entry.id).await?;
            if self
                .policy
                .max_attempts
                .is_some_and(|cap| attempts >= cap)
            {
                warn!(
                    id = %entry.id,
                    url = %entry.url,
                    attempts,
                    "dropping mutation after exhausting retry attempts"
                );
                self.store.remove(entry.id).await?;
                report.dropped_count += 1;
            } else {
                debug!(id = %entry.id, url = %entry.url, attempts, "replay failed, retained");
                report.failed_count += 1;
            }
        }

        info!(
            replayed = report.replayed_count,
            failed = report.failed_count,
            dropped = report.dropped_count,
            "queue replay complete"
        );
        self.clients.sync_complete(&report).await;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        MockClientNotifier, MockNetwork, MemoryMutationStore,
    };
    use crate::domain::entities::{FetchRequest, MutationDraft};
    use serde_json::json;

    async fn enqueue(store: &MemoryMutationStore, url: &str) {
        let request = FetchRequest::post_json(url, &json!({"n": url}));
        store.enqueue(MutationDraft::from_request(&request)).await.unwrap();
    }

    fn service(
        store: Arc<MemoryMutationStore>,
        network: Arc<MockNetwork>,
        policy: RetryPolicy,
    ) -> (SyncService, Arc<MockClientNotifier>) {
        let clients = Arc::new(MockClientNotifier::default());
        (
            SyncService::new(store, network, clients.clone(), policy),
            clients,
        )
    }

    #[tokio::test]
    async fn test_replay_issues_calls_in_enqueue_order() {
        let store = Arc::new(MemoryMutationStore::default());
        enqueue(&store, "/api/v1/a").await;
        enqueue(&store, "/api/v1/b").await;
        enqueue(&store, "/api/v1/c").await;

        let network = Arc::new(MockNetwork::respond_with(200, json!({"ok": true})));
        let (service, _) = service(store.clone(), network.clone(), RetryPolicy::default());

        let report = service.replay_queue().await.unwrap();

        assert_eq!(report.replayed_count, 3);
        assert_eq!(
            network.called_urls(),
            vec!["/api/v1/a", "/api/v1/b", "/api/v1/c"]
        );
        assert_eq!(store.queue_len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_entry_is_retained_exactly() {
        let store = Arc::new(MemoryMutationStore::default());
        enqueue(&store, "/api/v1/a").await;
        enqueue(&store, "/api/v1/b").await;
        enqueue(&store, "/api/v1/c").await;

        let network = Arc::new(MockNetwork::respond_with(200, json!({"ok": true})));
        network.fail_url("/api/v1/b");
        let (service, clients) = service(store.clone(), network, RetryPolicy::default());

        let report = service.replay_queue().await.unwrap();

        assert_eq!(report.replayed_count, 2);
        assert_eq!(report.failed_count, 1);
        let remaining = store.pending().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].url, "/api/v1/b");
        assert_eq!(remaining[0].attempts, 1);

        let broadcasts = clients.sync_reports().await;
        assert_eq!(broadcasts.len(), 1);
        assert_eq!(broadcasts[0].failed_count, 1);
    }

    #[tokio::test]
    async fn test_non_2xx_reply_counts_as_failure() {
        let store = Arc::new(MemoryMutationStore::default());
        enqueue(&store, "/api/v1/a").await;

        let network = Arc::new(MockNetwork::respond_with(500, json!({})));
        let (service, _) = service(store.clone(), network, RetryPolicy::default());

        let report = service.replay_queue().await.unwrap();
        assert_eq!(report.failed_count, 1);
        assert_eq!(store.queue_len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_attempt_cap_drops_entry() {
        let store = Arc::new(MemoryMutationStore::default());
        enqueue(&store, "/api/v1/a").await;

        let network = Arc::new(MockNetwork::offline());
        let policy = RetryPolicy {
            max_attempts: Some(2),
            base_backoff: Duration::ZERO,
        };
        let (service, _) = service(store.clone(), network, policy);

        let first = service.replay_queue().await.unwrap();
        assert_eq!(first.failed_count, 1);
        assert_eq!(first.dropped_count, 0);

        let second = service.replay_queue().await.unwrap();
        assert_eq!(second.failed_count, 0);
        assert_eq!(second.dropped_count, 1);
        assert_eq!(store.queue_len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_queue_still_broadcasts() {
        let store = Arc::new(MemoryMutationStore::default());
        let network = Arc::new(MockNetwork::offline());
        let (service, clients) = service(store, network, RetryPolicy::default());

        let report = service.replay_queue().await.unwrap();
        assert!(report.is_clean());
        assert_eq!(clients.sync_reports().await.len(), 1);
    }

    #[test]
    fn test_backoff_grows_and_is_capped() {
        let policy = RetryPolicy {
            max_attempts: None,
            base_backoff: Duration::from_millis(100),
        };
        assert!(policy.backoff_for(0).is_none());
        let first = policy.backoff_for(1).unwrap();
        let ninth = policy.backoff_for(9).unwrap();
        let fortieth = policy.backoff_for(40).unwrap();
        assert!(first >= Duration::from_millis(100));
        assert!(ninth >= Duration::from_millis(100 * 256));
        // The exponent saturates; huge failure streaks do not overflow.
        assert!(fortieth <= Duration::from_millis(100 * 256 + 100 * 256 / 5 + 1));
    }
}
