use async_trait::async_trait;

use crate::domain::value_objects::{ChatId, WindowId};
use crate::shared::error::AppError;

/// Open client windows as seen by the host; used to route notification
/// clicks to an existing view before opening a new one.
#[async_trait]
pub trait WindowGateway: Send + Sync {
    async fn find_window_for_chat(&self, chat_id: ChatId) -> Option<WindowId>;
    async fn any_window(&self) -> Option<WindowId>;
    async fn focus(&self, window: WindowId) -> Result<(), AppError>;
    async fn open(&self, route: &str) -> Result<(), AppError>;
}
