use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::mpsc;
use tracing::info;

use crate::application::ports::{
    CacheStore, MutationStore, NetworkGateway, NotificationPresenter, SyncScheduler, WindowGateway,
};
use crate::application::services::{
    FetchService, LifecycleService, MutationService, NotificationService, RetryPolicy,
    ShareService, SyncService,
};
use crate::infrastructure::cache::PartitionedCache;
use crate::infrastructure::jobs::{SyncJob, SyncTagRegistry};
use crate::infrastructure::network::HttpGateway;
use crate::infrastructure::offline::SqliteMutationStore;
use crate::presentation::handlers::MessageHandler;
use crate::presentation::ipc::BroadcastClientBridge;
use crate::shared::config::WorkerConfig;
use crate::shared::error::Result;

/// Host-supplied adapters: what the platform shows and which windows exist
/// is outside this crate.
pub struct PlatformAdapters {
    pub presenter: Arc<dyn NotificationPresenter>,
    pub windows: Arc<dyn WindowGateway>,
}

/// Fully wired worker. Construct once at startup and hand out the pieces
/// the host needs.
pub struct WorkerState {
    pub config: WorkerConfig,
    pub cache: Arc<dyn CacheStore>,
    pub mutation_store: Arc<dyn MutationStore>,
    pub registry: Arc<SyncTagRegistry>,
    pub bridge: Arc<BroadcastClientBridge>,
    pub fetch: Arc<FetchService>,
    pub sync: Arc<SyncService>,
    pub notifications: Arc<NotificationService>,
    pub share: Arc<ShareService>,
    pub lifecycle: Arc<LifecycleService>,
    pub messages: Arc<MessageHandler>,
    sync_job: Arc<SyncJob>,
}

impl WorkerState {
    pub async fn new(config: WorkerConfig, platform: PlatformAdapters) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;
        let sqlite_store = SqliteMutationStore::new(pool);
        sqlite_store.ensure_schema().await?;
        let mutation_store: Arc<dyn MutationStore> = Arc::new(sqlite_store);

        let cache: Arc<dyn CacheStore> = Arc::new(PartitionedCache::new(&config.cache));
        let network: Arc<dyn NetworkGateway> = Arc::new(HttpGateway::new(&config.network)?);
        let registry = Arc::new(SyncTagRegistry::default());
        let bridge = Arc::new(BroadcastClientBridge::default());

        // The queue is durable but the tag registry is not. Mutations queued
        // by a previous run must re-arm the tag, or no trigger replays them.
        let queued = mutation_store.queue_len().await?;
        if queued > 0 {
            registry.register(&config.sync.sync_tag).await?;
            info!(queued, "pending mutations from a previous run, sync tag armed");
        }

        let mutations = Arc::new(MutationService::new(
            network.clone(),
            mutation_store.clone(),
            registry.clone(),
            config.sync.sync_tag.clone(),
        ));
        let fetch = Arc::new(FetchService::new(
            config.routing.clone(),
            config.cache.clone(),
            cache.clone(),
            network.clone(),
            mutations.clone(),
        ));
        let sync = Arc::new(SyncService::new(
            mutation_store.clone(),
            network.clone(),
            bridge.clone(),
            RetryPolicy::from_config(&config.sync),
        ));
        let notifications = Arc::new(NotificationService::new(
            platform.presenter.clone(),
            platform.windows,
            bridge.clone(),
            mutations,
            network.clone(),
            config.push.clone(),
        ));
        let share = Arc::new(ShareService::new(config.push.app_route.clone()));
        let lifecycle = Arc::new(LifecycleService::new(
            fetch.clone(),
            cache.clone(),
            &config.routing,
        ));
        let messages = Arc::new(MessageHandler::new(
            fetch.clone(),
            cache.clone(),
            lifecycle.clone(),
            platform.presenter,
            network,
            config.push.clone(),
        ));
        let sync_job = Arc::new(SyncJob::new(
            sync.clone(),
            fetch.clone(),
            bridge.clone(),
            registry.clone(),
            &config.sync,
            &config.routing,
        ));

        info!(queued, "worker state ready");
        Ok(Self {
            config,
            cache,
            mutation_store,
            registry,
            bridge,
            fetch,
            sync,
            notifications,
            share,
            lifecycle,
            messages,
            sync_job,
        })
    }

    /// Starts the background loop. The returned sender is the connectivity
    /// signal: send `()` whenever the host observes the network coming back.
    pub fn spawn_sync_job(&self) -> mpsc::Sender<()> {
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(self.sync_job.clone().run(rx));
        tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{MockPresenter, MockWindows};

    fn memory_config() -> WorkerConfig {
        let mut config = WorkerConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;
        config
    }

    fn adapters() -> PlatformAdapters {
        PlatformAdapters {
            presenter: Arc::new(MockPresenter::default()),
            windows: Arc::new(MockWindows::default()),
        }
    }

    #[tokio::test]
    async fn test_state_wires_up_against_a_fresh_database() {
        let state = WorkerState::new(memory_config(), adapters()).await.unwrap();
        assert_eq!(state.mutation_store.queue_len().await.unwrap(), 0);
        assert_eq!(state.cache.total_entries().await, 0);
        assert!(!state.lifecycle.skip_waiting_requested());
        assert!(!state.registry.is_registered(&state.config.sync.sync_tag).await);
    }

    #[tokio::test]
    async fn test_mutations_queued_by_a_previous_run_arm_the_sync_tag() {
        use crate::domain::entities::{FetchRequest, MutationDraft};
        use serde_json::json;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("queue.db").display());

        // First run: a mutation gets stranded in the durable queue.
        {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&url)
                .await
                .unwrap();
            let store = SqliteMutationStore::new(pool.clone());
            store.ensure_schema().await.unwrap();
            let request = FetchRequest::post_json("/api/v1/messages", &json!({"body": "held"}));
            store.enqueue(MutationDraft::from_request(&request)).await.unwrap();
            pool.close().await;
        }

        // Second run: a fresh registry must come up armed, or reconnect
        // triggers would skip the stranded entry forever.
        let mut config = WorkerConfig::default();
        config.database.url = url;
        config.database.max_connections = 1;
        let state = WorkerState::new(config, adapters()).await.unwrap();

        assert_eq!(state.mutation_store.queue_len().await.unwrap(), 1);
        assert!(state.registry.is_registered(&state.config.sync.sync_tag).await);
    }
}
