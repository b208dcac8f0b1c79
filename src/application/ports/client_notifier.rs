use async_trait::async_trait;

use crate::domain::entities::SyncReport;

/// Fan-out to every open client page. Delivery is best-effort; a page that
/// closed mid-broadcast is simply skipped.
#[async_trait]
pub trait ClientNotifier: Send + Sync {
    async fn sync_complete(&self, report: &SyncReport);
    async fn periodic_refresh(&self);
    async fn navigate(&self, route: &str);
}
