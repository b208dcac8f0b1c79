use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use super::mutation_service::MutationService;
use crate::application::ports::{
    ClientNotifier, NetworkGateway, NotificationPresenter, WindowGateway,
};
use crate::domain::entities::{
    FetchRequest, NotificationAction, NotificationData, NotificationPayload, NotificationResponse,
    RenderedNotification,
};
use crate::domain::value_objects::ChatId;
use crate::shared::config::PushConfig;
use crate::shared::error::AppError;

/// Turns push payloads into platform notifications and routes the user's
/// interaction back into the delivery pipeline.
pub struct NotificationService {
    presenter: Arc<dyn NotificationPresenter>,
    windows: Arc<dyn WindowGateway>,
    clients: Arc<dyn ClientNotifier>,
    mutations: Arc<MutationService>,
    network: Arc<dyn NetworkGateway>,
    config: PushConfig,
}

impl NotificationService {
    pub fn new(
        presenter: Arc<dyn NotificationPresenter>,
        windows: Arc<dyn WindowGateway>,
        clients: Arc<dyn ClientNotifier>,
        mutations: Arc<MutationService>,
        network: Arc<dyn NetworkGateway>,
        config: PushConfig,
    ) -> Self {
        Self {
            presenter,
            windows,
            clients,
            mutations,
            network,
            config,
        }
    }

    /// Maps a payload to what the platform will show. Pushes for the same
    /// chat share a tag so they collapse into one visible notification.
    pub fn render(&self, payload: &NotificationPayload) -> RenderedNotification {
        let tag = payload
            .tag
            .clone()
            .or_else(|| payload.data.chat_id.map(|chat| format!("chat-{}", chat)))
            .unwrap_or_else(|| self.config.default_tag.clone());

        let is_call = payload.data.call_id.is_some();
        // Fixed preference: call actions override the generic pair.
        let actions = if is_call {
            vec![NotificationAction::Answer, NotificationAction::Reject]
        } else if payload.data.chat_id.is_some() {
            vec![NotificationAction::Reply, NotificationAction::Dismiss]
        } else {
            Vec::new()
        };

        RenderedNotification {
            title: payload.title.clone(),
            body: payload.body.clone(),
            icon: payload.icon.clone(),
            badge: payload.badge.clone(),
            tag,
            actions: Vec::new(),
            require_interaction: is_call,
            silent: payload.silent,
            vibrate: if is_call {
                Some(vec![200, 100, 200])
            } else {
                None
            },
            data: payload.data.clone(),
        }
        .with_actions(actions)
    }

    pub async fn on_push(&self, payload: NotificationPayload) -> Result<(), AppError> {
        if let Some(unread) = payload.data.unread_total {
            // Badge support is optional on the platform side.
            if let Err(err) = self.presenter.set_badge(unread).await {
                debug!(error = %err, "badge update not applied");
            }
        }

        let rendered = self.render(&payload);
        self.presenter.show(&rendered).await
    }

    pub async fn on_response(
        &self,
        response: NotificationResponse,
        data: NotificationData,
    ) -> Result<(), AppError> {
        match response {
            NotificationResponse::Dismiss => Ok(()),
            NotificationResponse::Reply { text } => self.send_reply(text, data).await,
            NotificationResponse::Answer => {
                let Some(call_id) = data.call_id else {
                    return Ok(());
                };
                let route = format!("{}{}", self.config.call_route_prefix, call_id);
                self.focus_or_open(&route, None).await
            }
            NotificationResponse::Reject => {
                let Some(call_id) = data.call_id else {
                    return Ok(());
                };
                let request = FetchRequest::post_json(
                    self.config.call_reject_endpoint.clone(),
                    &json!({ "call_id": call_id }),
                );
                // Rejecting a call the caller already hung up on is fine.
                if let Err(err) = self.network.send(&request).await {
                    warn!(call_id = %call_id, error = %err, "call reject not delivered");
                }
                Ok(())
            }
            NotificationResponse::Open => {
                let (route, chat) = match data.chat_id {
                    Some(chat) => (
                        format!("{}{}", self.config.chat_route_prefix, chat),
                        Some(chat),
                    ),
                    None => (self.config.app_route.clone(), None),
                };
                self.focus_or_open(&route, chat).await
            }
        }
    }

    /// Mark-seen side effect when the user swipes the notification away.
    pub async fn on_close(&self, data: NotificationData) {
        let Some(chat_id) = data.chat_id else {
            return;
        };
        let request = FetchRequest::post_json(
            self.config.seen_endpoint.clone(),
            &json!({ "chat_id": chat_id }),
        );
        if let Err(err) = self.network.send(&request).await {
            debug!(chat_id = %chat_id, error = %err, "mark-seen not delivered");
        }
    }

    /// Inline replies go through the mutation handler so a reply composed
    /// offline is queued and replayed instead of silently lost.
    async fn send_reply(&self, text: String, data: NotificationData) -> Result<(), AppError> {
        let Some(chat_id) = data.chat_id else {
            debug!("reply without chat id ignored");
            return Ok(());
        };

        let request = FetchRequest::post_json(
            self.config.message_endpoint.clone(),
            &json!({ "chat_id": chat_id, "body": text }),
        );
        self.mutations.handle(request).await.map(|_| ())
    }

    /// Focus a window already on the route's chat, else focus any window
    /// and tell it to navigate, else open a fresh one.
    async fn focus_or_open(&self, route: &str, chat: Option<ChatId>) -> Result<(), AppError> {
        if let Some(chat) = chat {
            if let Some(window) = self.windows.find_window_for_chat(chat).await {
                return self.windows.focus(window).await;
            }
        }

        if let Some(window) = self.windows.any_window().await {
            self.windows.focus(window).await?;
            self.clients.navigate(route).await;
            return Ok(());
        }

        self.windows.open(route).await
    }
}
