use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use super::fetch_service::FetchService;
use crate::application::ports::CacheStore;
use crate::shared::config::RoutingConfig;
use crate::shared::error::Result;

/// Worker generations: `install` warms the shell cache, `activate` retires
/// caches left behind by a previous generation. There is no teardown hook;
/// termination is platform-driven.
pub struct LifecycleService {
    fetch: Arc<FetchService>,
    cache: Arc<dyn CacheStore>,
    shell_urls: Vec<String>,
    skip_waiting: AtomicBool,
}

impl LifecycleService {
    pub fn new(fetch: Arc<FetchService>, cache: Arc<dyn CacheStore>, routing: &RoutingConfig) -> Self {
        Self {
            fetch,
            cache,
            shell_urls: routing.shell_urls.clone(),
            skip_waiting: AtomicBool::new(false),
        }
    }

    /// Cold init: precache the application shell, best-effort per URL.
    pub async fn install(&self) -> Result<usize> {
        let cached = self.fetch.precache(&self.shell_urls).await;
        info!(cached, total = self.shell_urls.len(), "install precache complete");
        Ok(cached)
    }

    /// Generation cutover: drop caches stamped with an older version.
    pub async fn activate(&self) -> Result<()> {
        self.cache.drop_stale_generations().await;
        info!("activated, stale cache generations dropped");
        Ok(())
    }

    pub fn skip_waiting(&self) {
        self.skip_waiting.store(true, Ordering::SeqCst);
    }

    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }
}
