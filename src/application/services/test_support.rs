//! Port mocks shared by the service test modules.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{
    ClientNotifier, MutationStore, NetworkError, NetworkGateway, NotificationPresenter,
    SyncScheduler, WindowGateway,
};
use crate::domain::entities::{
    FetchRequest, FetchResponse, MutationDraft, QueuedMutation, RenderedNotification, SyncReport,
};
use crate::domain::value_objects::{ChatId, MutationId, WindowId};
use crate::shared::error::AppError;

/// Scriptable network: URL-keyed responses, a default response, and a set
/// of URLs that fail at the transport layer. Unrouted URLs are offline.
#[derive(Default)]
pub struct MockNetwork {
    routes: Mutex<HashMap<String, FetchResponse>>,
    default_response: Mutex<Option<FetchResponse>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<FetchRequest>>,
}

impl MockNetwork {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn respond_with(status: u16, body: serde_json::Value) -> Self {
        let mock = Self::default();
        *mock.default_response.lock().unwrap() = Some(FetchResponse::new(
            status,
            vec![("content-type".to_string(), "application/json".to_string())],
            body.to_string().into(),
        ));
        mock
    }

    pub fn route(&self, url: &str, response: FetchResponse) {
        self.routes.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn clear_routes(&self) {
        self.routes.lock().unwrap().clear();
        *self.default_response.lock().unwrap() = None;
    }

    pub fn fail_url(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn called_urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

#[async_trait]
impl NetworkGateway for MockNetwork {
    async fn send(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        self.calls.lock().unwrap().push(request.clone());

        if self.failing.lock().unwrap().contains(&request.url) {
            return Err(NetworkError::Offline("scripted failure".to_string()));
        }

        let path = request
            .url
            .split_once('?')
            .map(|(head, _)| head)
            .unwrap_or(&request.url);
        let routes = self.routes.lock().unwrap();
        if let Some(response) = routes.get(&request.url).or_else(|| routes.get(path)) {
            return Ok(response.clone());
        }
        drop(routes);

        if let Some(response) = self.default_response.lock().unwrap().clone() {
            return Ok(response);
        }

        Err(NetworkError::Offline("no route".to_string()))
    }
}

/// In-memory stand-in for the durable queue, with a switch that makes the
/// append fail to exercise the persistence boundary.
pub struct MemoryMutationStore {
    entries: Mutex<Vec<QueuedMutation>>,
    next_id: AtomicI64,
    fail_enqueue: bool,
}

impl Default for MemoryMutationStore {
    fn default() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_enqueue: false,
        }
    }
}

impl MemoryMutationStore {
    pub fn failing() -> Self {
        Self {
            fail_enqueue: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl MutationStore for MemoryMutationStore {
    async fn enqueue(&self, draft: MutationDraft) -> Result<QueuedMutation, AppError> {
        if self.fail_enqueue {
            return Err(AppError::Database("enqueue refused".to_string()));
        }
        let id = MutationId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let queued = QueuedMutation {
            id,
            local_id: draft.local_id,
            url: draft.url,
            method: draft.method,
            headers: draft.headers,
            body: draft.body,
            attempts: 0,
            enqueued_at: draft.enqueued_at,
        };
        self.entries.lock().unwrap().push(queued.clone());
        Ok(queued)
    }

    async fn pending(&self) -> Result<Vec<QueuedMutation>, AppError> {
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn remove(&self, id: MutationId) -> Result<(), AppError> {
        self.entries.lock().unwrap().retain(|entry| entry.id != id);
        Ok(())
    }

    async fn record_failure(&self, id: MutationId) -> Result<u32, AppError> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| AppError::NotFound(format!("mutation {}", id)))?;
        entry.attempts += 1;
        Ok(entry.attempts)
    }

    async fn queue_len(&self) -> Result<u64, AppError> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }
}

#[derive(Default)]
pub struct MockScheduler {
    tags: Mutex<Vec<String>>,
}

impl MockScheduler {
    pub async fn registered(&self, tag: &str) -> bool {
        self.tags.lock().unwrap().iter().any(|entry| entry == tag)
    }
}

#[async_trait]
impl SyncScheduler for MockScheduler {
    async fn register(&self, tag: &str) -> Result<(), AppError> {
        self.tags.lock().unwrap().push(tag.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockClientNotifier {
    reports: Mutex<Vec<SyncReport>>,
    refreshes: Mutex<u32>,
    routes: Mutex<Vec<String>>,
}

impl MockClientNotifier {
    pub async fn sync_reports(&self) -> Vec<SyncReport> {
        self.reports.lock().unwrap().clone()
    }

    pub async fn refresh_count(&self) -> u32 {
        *self.refreshes.lock().unwrap()
    }

    pub async fn navigations(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClientNotifier for MockClientNotifier {
    async fn sync_complete(&self, report: &SyncReport) {
        self.reports.lock().unwrap().push(*report);
    }

    async fn periodic_refresh(&self) {
        *self.refreshes.lock().unwrap() += 1;
    }

    async fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

#[derive(Default)]
pub struct MockPresenter {
    notifications: Mutex<Vec<RenderedNotification>>,
    badge_count: Mutex<Option<u32>>,
}

impl MockPresenter {
    pub async fn shown(&self) -> Vec<RenderedNotification> {
        self.notifications.lock().unwrap().clone()
    }

    pub async fn badge(&self) -> Option<u32> {
        *self.badge_count.lock().unwrap()
    }
}

#[async_trait]
impl NotificationPresenter for MockPresenter {
    async fn show(&self, notification: &RenderedNotification) -> Result<(), AppError> {
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn set_badge(&self, count: u32) -> Result<(), AppError> {
        *self.badge_count.lock().unwrap() = Some(count);
        Ok(())
    }

    async fn clear_badge(&self) -> Result<(), AppError> {
        *self.badge_count.lock().unwrap() = None;
        Ok(())
    }
}

#[derive(Default)]
pub struct MockWindows {
    windows: Mutex<Vec<(WindowId, Option<ChatId>)>>,
    focus_log: Mutex<Vec<WindowId>>,
    open_log: Mutex<Vec<String>>,
    next_id: AtomicU64,
}

impl MockWindows {
    pub async fn add_window(&self, chat: Option<ChatId>) -> WindowId {
        let id = WindowId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.windows.lock().unwrap().push((id, chat));
        id
    }

    pub async fn focused(&self) -> Vec<WindowId> {
        self.focus_log.lock().unwrap().clone()
    }

    pub async fn opened_routes(&self) -> Vec<String> {
        self.open_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl WindowGateway for MockWindows {
    async fn find_window_for_chat(&self, chat_id: ChatId) -> Option<WindowId> {
        self.windows
            .lock()
            .unwrap()
            .iter()
            .find(|(_, chat)| *chat == Some(chat_id))
            .map(|(id, _)| *id)
    }

    async fn any_window(&self) -> Option<WindowId> {
        self.windows.lock().unwrap().first().map(|(id, _)| *id)
    }

    async fn focus(&self, window: WindowId) -> Result<(), AppError> {
        self.focus_log.lock().unwrap().push(window);
        Ok(())
    }

    async fn open(&self, route: &str) -> Result<(), AppError> {
        self.open_log.lock().unwrap().push(route.to_string());
        Ok(())
    }
}
