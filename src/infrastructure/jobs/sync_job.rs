use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::tag_registry::SyncTagRegistry;
use crate::application::ports::ClientNotifier;
use crate::application::services::{FetchService, SyncService};
use crate::domain::entities::FetchRequest;
use crate::shared::config::{RoutingConfig, SyncConfig};

/// Long-running worker loop: replays the delivery queue when connectivity
/// returns and refreshes the cacheable API endpoints on a timer. Errors are
/// logged and the loop keeps running.
pub struct SyncJob {
    sync: Arc<SyncService>,
    fetch: Arc<FetchService>,
    clients: Arc<dyn ClientNotifier>,
    registry: Arc<SyncTagRegistry>,
    sync_tag: String,
    endpoints: Vec<String>,
    interval: Duration,
    auto_sync: bool,
}

impl SyncJob {
    pub fn new(
        sync: Arc<SyncService>,
        fetch: Arc<FetchService>,
        clients: Arc<dyn ClientNotifier>,
        registry: Arc<SyncTagRegistry>,
        config: &SyncConfig,
        routing: &RoutingConfig,
    ) -> Self {
        Self {
            sync,
            fetch,
            clients,
            registry,
            sync_tag: config.sync_tag.clone(),
            endpoints: routing.cacheable_api.clone(),
            interval: Duration::from_secs(config.sync_interval_secs),
            auto_sync: config.auto_sync,
        }
    }

    pub async fn run(self: Arc<Self>, mut reconnect: mpsc::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so startup stays quiet.
        ticker.tick().await;

        info!(
            interval_secs = self.interval.as_secs(),
            auto_sync = self.auto_sync,
            "sync job started"
        );
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.auto_sync {
                        self.replay_once().await;
                        self.refresh_once().await;
                    }
                }
                signal = reconnect.recv() => {
                    match signal {
                        Some(()) => self.replay_once().await,
                        None => {
                            info!("reconnect channel closed, sync job stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Connectivity returned: replay if the tag is armed. The tag stays
    /// armed while failures remain so the next reconnect retries them.
    pub async fn replay_once(&self) {
        if !self.registry.is_registered(&self.sync_tag).await {
            debug!(tag = %self.sync_tag, "no sync registration, nothing to replay");
            return;
        }

        let started = Instant::now();
        match self.sync.replay_queue().await {
            Ok(report) => {
                if report.failed_count == 0 {
                    self.registry.complete(&self.sync_tag).await;
                }
                info!(
                    replayed = report.replayed_count,
                    failed = report.failed_count,
                    dropped = report.dropped_count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "replay pass finished"
                );
            }
            Err(err) => {
                error!(error = %err, "replay pass failed");
            }
        }
    }

    /// Timer tick: re-fetch the cacheable endpoints so their cached copies
    /// stay warm, then nudge open clients to re-render.
    pub async fn refresh_once(&self) {
        let started = Instant::now();
        let mut refreshed = 0usize;
        for endpoint in &self.endpoints {
            match self.fetch.handle(FetchRequest::get(endpoint.clone())).await {
                Ok(response) if response.is_success() => refreshed += 1,
                Ok(response) => {
                    debug!(endpoint = %endpoint, status = response.status, "refresh skipped");
                }
                Err(err) => {
                    debug!(endpoint = %endpoint, error = %err, "refresh failed");
                }
            }
        }

        self.clients.periodic_refresh().await;
        info!(
            refreshed,
            total = self.endpoints.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "periodic refresh finished"
        );
    }
}
