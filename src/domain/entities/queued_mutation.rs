use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::http::{FetchRequest, RequestMode};
use crate::domain::value_objects::{HttpMethod, MutationId};

/// A pending mutation awaiting replay, as stored in the durable queue.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedMutation {
    pub id: MutationId,
    pub local_id: String,
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub attempts: u32,
    pub enqueued_at: DateTime<Utc>,
}

impl QueuedMutation {
    /// Rebuild the original request for replay, identical method/headers/body.
    pub fn to_request(&self) -> FetchRequest {
        FetchRequest {
            url: self.url.clone(),
            method: self.method.clone(),
            headers: self.headers.clone(),
            body: self.body.as_ref().map(|text| text.clone().into()),
            mode: RequestMode::Standard,
        }
    }
}

/// What gets appended to the queue when a mutation fails at the network layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationDraft {
    pub local_id: String,
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub enqueued_at: DateTime<Utc>,
}

impl MutationDraft {
    pub fn from_request(request: &FetchRequest) -> Self {
        // DELETE carries no body; everything else is kept as text.
        let body = if request.method == HttpMethod::Delete {
            None
        } else {
            request.body_text()
        };

        Self {
            local_id: Uuid::new_v4().to_string(),
            url: request.url.clone(),
            method: request.method.clone(),
            headers: request.headers.clone(),
            body,
            enqueued_at: Utc::now(),
        }
    }
}
