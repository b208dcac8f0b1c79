use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::SharedPayload;
use crate::shared::error::{AppError, Result};

/// A payload the app never picks up (closed before the redirect landed)
/// would otherwise sit here with its file bytes for the worker's lifetime.
const MAX_PARKED: usize = 16;

#[derive(Default)]
struct Slots {
    entries: HashMap<String, SharedPayload>,
    order: VecDeque<String>,
}

/// Receives OS share-sheet content, parks it until the app picks it up,
/// and answers with the redirect route carrying the marker parameter.
/// Parking is bounded; the oldest abandoned payload is displaced first.
pub struct ShareService {
    slots: RwLock<Slots>,
    app_route: String,
}

impl ShareService {
    pub fn new(app_route: String) -> Self {
        Self {
            slots: RwLock::new(Slots::default()),
            app_route,
        }
    }

    pub async fn receive(&self, payload: SharedPayload) -> Result<String> {
        if payload.is_empty() {
            return Err(AppError::InvalidInput(
                "shared payload carries no content".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let mut slots = self.slots.write().await;
        while slots.order.len() >= MAX_PARKED {
            let Some(oldest) = slots.order.pop_front() else {
                break;
            };
            slots.entries.remove(&oldest);
            debug!(id = %oldest, "abandoned share payload dropped");
        }
        slots.order.push_back(id.clone());
        slots.entries.insert(id.clone(), payload);
        Ok(format!("{}?share={}", self.app_route, id))
    }

    /// Consumes the stored payload; a second take returns nothing.
    pub async fn take(&self, id: &str) -> Option<SharedPayload> {
        let mut slots = self.slots.write().await;
        let payload = slots.entries.remove(id)?;
        slots.order.retain(|parked| parked != id);
        Some(payload)
    }
}
