use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::http::FetchResponse;

/// A response held in a cache partition together with its insertion time.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub stored_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn from_response(response: &FetchResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers.clone(),
            body: response.body.clone(),
            stored_at: Utc::now(),
        }
    }

    pub fn into_response(self) -> FetchResponse {
        FetchResponse::new(self.status, self.headers, self.body)
    }
}
