use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CallId, ChatId};

/// Platform limit on rendered notification actions.
pub const MAX_ACTIONS: usize = 2;

/// Contextual data carried by a push payload and echoed back on interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NotificationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChatId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<CallId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_total: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An inbound push payload before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub silent: bool,
    #[serde(default)]
    pub data: NotificationData,
}

/// Action buttons offered on a rendered notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    Reply,
    Dismiss,
    Answer,
    Reject,
}

/// What the dispatcher hands to the platform notification API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedNotification {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
    pub badge: Option<String>,
    /// Group tag; the platform replaces a visible notification with the same tag.
    pub tag: String,
    pub actions: Vec<NotificationAction>,
    pub require_interaction: bool,
    pub silent: bool,
    pub vibrate: Option<Vec<u32>>,
    pub data: NotificationData,
}

impl RenderedNotification {
    /// Enforces the two-action platform constraint.
    pub fn with_actions(mut self, actions: Vec<NotificationAction>) -> Self {
        self.actions = actions;
        self.actions.truncate(MAX_ACTIONS);
        self
    }
}

/// A user interaction with a visible notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NotificationResponse {
    Dismiss,
    Reply { text: String },
    Answer,
    Reject,
    /// Notification body click, no explicit action.
    Open,
}
