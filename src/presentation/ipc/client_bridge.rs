use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::application::ports::ClientNotifier;
use crate::domain::entities::SyncReport;
use crate::presentation::dto::StatusMessage;

/// Fans worker status out to every subscribed client window. Sending with
/// no windows open is not an error; the message is simply dropped.
pub struct BroadcastClientBridge {
    tx: broadcast::Sender<StatusMessage>,
}

impl BroadcastClientBridge {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusMessage> {
        self.tx.subscribe()
    }

    fn send(&self, message: StatusMessage) {
        if self.tx.send(message).is_err() {
            debug!("no client windows subscribed, status dropped");
        }
    }
}

impl Default for BroadcastClientBridge {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl ClientNotifier for BroadcastClientBridge {
    async fn sync_complete(&self, report: &SyncReport) {
        self.send(StatusMessage::from_sync_report(report));
    }

    async fn periodic_refresh(&self) {
        self.send(StatusMessage::PeriodicRefresh);
    }

    async fn navigate(&self, route: &str) {
        self.send(StatusMessage::Navigate {
            route: route.to_string(),
        });
    }
}
