use bytes::Bytes;
use serde_json::json;

use crate::domain::value_objects::HttpMethod;

/// Whether a request is a full page load or a subresource fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    #[default]
    Standard,
    Navigate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
    pub mode: RequestMode,
}

impl FetchRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
            mode: RequestMode::Standard,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post_json(url: impl Into<String>, body: &serde_json::Value) -> Self {
        let mut request = Self::new(HttpMethod::Post, url);
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(Bytes::from(body.to_string()));
        request
    }

    pub fn navigate(url: impl Into<String>) -> Self {
        let mut request = Self::get(url);
        request.mode = RequestMode::Navigate;
        request
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Cache key: method plus URL identifies an entry within a partition.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method.as_str(), self.url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Bytes::from(value.to_string()),
        }
    }

    /// Structured offline error returned when no cache fallback exists.
    pub fn offline() -> Self {
        Self::json(503, json!({ "error": "offline", "code": 503 }))
    }

    /// Accepted-but-queued indicator for a mutation held in the delivery queue.
    pub fn queued() -> Self {
        Self::json(202, json!({ "queued": true }))
    }

    /// Last-resort navigation fallback when nothing cached is renderable.
    pub fn inline_offline_page() -> Self {
        Self {
            status: 503,
            headers: vec![(
                "content-type".to_string(),
                "text/html; charset=utf-8".to_string(),
            )],
            body: Bytes::from_static(
                b"<!doctype html><html><body><h1>Offline</h1>\
                  <p>This page is not available without a connection.</p></body></html>",
            ),
        }
    }

    pub fn body_json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_response_shape() {
        let response = FetchResponse::offline();
        assert_eq!(response.status, 503);
        assert_eq!(
            response.body_json().unwrap(),
            json!({ "error": "offline", "code": 503 })
        );
    }

    #[test]
    fn test_queued_response_shape() {
        let response = FetchResponse::queued();
        assert_eq!(response.status, 202);
        assert_eq!(response.body_json().unwrap(), json!({ "queued": true }));
    }

    #[test]
    fn test_cache_key_includes_method() {
        let request = FetchRequest::get("/assets/css/base.css");
        assert_eq!(request.cache_key(), "GET /assets/css/base.css");
    }
}
