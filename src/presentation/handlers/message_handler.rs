use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ports::{CacheStore, NetworkGateway, NotificationPresenter};
use crate::application::services::{FetchService, LifecycleService};
use crate::domain::entities::FetchRequest;
use crate::presentation::dto::{ClientCommand, StatusMessage};
use crate::shared::config::PushConfig;
use crate::shared::error::Result;

/// Dispatches client window commands. Commands with nothing to report
/// answer `None`; the rest produce a status message for the sender.
pub struct MessageHandler {
    fetch: Arc<FetchService>,
    cache: Arc<dyn CacheStore>,
    lifecycle: Arc<LifecycleService>,
    presenter: Arc<dyn NotificationPresenter>,
    network: Arc<dyn NetworkGateway>,
    push: PushConfig,
}

impl MessageHandler {
    pub fn new(
        fetch: Arc<FetchService>,
        cache: Arc<dyn CacheStore>,
        lifecycle: Arc<LifecycleService>,
        presenter: Arc<dyn NotificationPresenter>,
        network: Arc<dyn NetworkGateway>,
        push: PushConfig,
    ) -> Self {
        Self {
            fetch,
            cache,
            lifecycle,
            presenter,
            network,
            push,
        }
    }

    pub async fn handle(&self, command: ClientCommand) -> Result<Option<StatusMessage>> {
        match command {
            ClientCommand::SkipWaiting => {
                self.lifecycle.skip_waiting();
                Ok(None)
            }
            ClientCommand::CacheUrls { urls } => {
                let cached = self.fetch.precache(&urls).await;
                info!(cached, requested = urls.len(), "client-requested precache");
                Ok(None)
            }
            ClientCommand::ClearCache { partition } => {
                match partition {
                    Some(partition) => self.cache.clear(partition).await,
                    None => self.cache.clear_all().await,
                }
                Ok(Some(StatusMessage::CacheCleared))
            }
            ClientCommand::GetCacheSize => Ok(Some(StatusMessage::CacheSize {
                entries: self.cache.total_entries().await,
            })),
            ClientCommand::PushSubscribe { subscription } => {
                Ok(Some(self.subscribe(subscription).await))
            }
            ClientCommand::SetBadge { count } => {
                self.presenter.set_badge(count).await?;
                Ok(None)
            }
            ClientCommand::ClearBadge => {
                self.presenter.clear_badge().await?;
                Ok(None)
            }
        }
    }

    /// Registers the push subscription with the server. Failure comes back
    /// as a message, not an error, so the window can surface it.
    async fn subscribe(&self, subscription: serde_json::Value) -> StatusMessage {
        let request = FetchRequest::post_json(self.push.subscribe_endpoint.clone(), &subscription);
        match self.network.send(&request).await {
            Ok(response) if response.is_success() => StatusMessage::PushSubscribed,
            Ok(response) => {
                warn!(status = response.status, "push subscription rejected");
                StatusMessage::PushError {
                    message: format!("subscription rejected with status {}", response.status),
                }
            }
            Err(err) => {
                warn!(error = %err, "push subscription not delivered");
                StatusMessage::PushError {
                    message: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        MockNetwork, MockPresenter, MockScheduler, MemoryMutationStore,
    };
    use crate::application::services::MutationService;
    use crate::domain::entities::FetchResponse;
    use crate::domain::value_objects::CachePartition;
    use crate::infrastructure::cache::PartitionedCache;
    use crate::shared::config::{CacheConfig, RoutingConfig};
    use serde_json::json;

    struct Fixture {
        handler: MessageHandler,
        cache: Arc<PartitionedCache>,
        presenter: Arc<MockPresenter>,
        lifecycle: Arc<LifecycleService>,
    }

    fn fixture(network: Arc<MockNetwork>) -> Fixture {
        let cache = Arc::new(PartitionedCache::new(&CacheConfig::default()));
        let presenter = Arc::new(MockPresenter::default());
        let mutations = Arc::new(MutationService::new(
            network.clone(),
            Arc::new(MemoryMutationStore::default()),
            Arc::new(MockScheduler::default()),
            "test-sync".to_string(),
        ));
        let fetch = Arc::new(FetchService::new(
            RoutingConfig::default(),
            CacheConfig::default(),
            cache.clone(),
            network.clone(),
            mutations,
        ));
        let lifecycle = Arc::new(LifecycleService::new(
            fetch.clone(),
            cache.clone(),
            &RoutingConfig::default(),
        ));
        let handler = MessageHandler::new(
            fetch,
            cache.clone(),
            lifecycle.clone(),
            presenter.clone(),
            network,
            PushConfig::default(),
        );
        Fixture {
            handler,
            cache,
            presenter,
            lifecycle,
        }
    }

    #[tokio::test]
    async fn test_clear_cache_targets_one_partition() {
        let network = Arc::new(MockNetwork::offline());
        network.route("/assets/app.css", FetchResponse::new(200, Vec::new(), "x".into()));
        network.route("/api/v1/chats", FetchResponse::new(200, Vec::new(), "y".into()));
        let f = fixture(network);
        f.handler
            .handle(ClientCommand::CacheUrls {
                urls: vec!["/assets/app.css".to_string()],
            })
            .await
            .unwrap();
        f.handler
            .handle(ClientCommand::GetCacheSize)
            .await
            .unwrap();

        let reply = f
            .handler
            .handle(ClientCommand::ClearCache {
                partition: Some(CachePartition::Api),
            })
            .await
            .unwrap();

        assert_eq!(reply, Some(StatusMessage::CacheCleared));
        assert_eq!(f.cache.entry_count(CachePartition::Static).await, 1);
    }

    #[tokio::test]
    async fn test_cache_size_reports_all_partitions() {
        let network = Arc::new(MockNetwork::offline());
        network.route("/assets/app.css", FetchResponse::new(200, Vec::new(), "x".into()));
        let f = fixture(network);
        f.handler
            .handle(ClientCommand::CacheUrls {
                urls: vec!["/assets/app.css".to_string()],
            })
            .await
            .unwrap();

        let reply = f.handler.handle(ClientCommand::GetCacheSize).await.unwrap();
        assert_eq!(reply, Some(StatusMessage::CacheSize { entries: 1 }));
    }

    #[tokio::test]
    async fn test_push_subscribe_round_trip() {
        let network = Arc::new(MockNetwork::respond_with(201, json!({"id": "sub-1"})));
        let f = fixture(network);

        let reply = f
            .handler
            .handle(ClientCommand::PushSubscribe {
                subscription: json!({"endpoint": "https://push.example.com/t0k3n"}),
            })
            .await
            .unwrap();
        assert_eq!(reply, Some(StatusMessage::PushSubscribed));
    }

    #[tokio::test]
    async fn test_push_subscribe_offline_reports_error() {
        let f = fixture(Arc::new(MockNetwork::offline()));

        let reply = f
            .handler
            .handle(ClientCommand::PushSubscribe {
                subscription: json!({"endpoint": "https://push.example.com/t0k3n"}),
            })
            .await
            .unwrap();
        assert!(matches!(reply, Some(StatusMessage::PushError { .. })));
    }

    #[tokio::test]
    async fn test_skip_waiting_flags_the_lifecycle() {
        let f = fixture(Arc::new(MockNetwork::offline()));
        assert!(!f.lifecycle.skip_waiting_requested());

        f.handler.handle(ClientCommand::SkipWaiting).await.unwrap();
        assert!(f.lifecycle.skip_waiting_requested());
    }

    #[tokio::test]
    async fn test_badge_commands_reach_the_presenter() {
        let f = fixture(Arc::new(MockNetwork::offline()));

        f.handler
            .handle(ClientCommand::SetBadge { count: 4 })
            .await
            .unwrap();
        assert_eq!(f.presenter.badge().await, Some(4));

        f.handler.handle(ClientCommand::ClearBadge).await.unwrap();
        assert_eq!(f.presenter.badge().await, None);
    }
}
