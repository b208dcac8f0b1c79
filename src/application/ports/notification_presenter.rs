use async_trait::async_trait;

use crate::domain::entities::RenderedNotification;
use crate::shared::error::AppError;

/// Platform notification surface, implemented by the embedding host.
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    async fn show(&self, notification: &RenderedNotification) -> Result<(), AppError>;
    async fn set_badge(&self, count: u32) -> Result<(), AppError>;
    async fn clear_badge(&self) -> Result<(), AppError>;
}
