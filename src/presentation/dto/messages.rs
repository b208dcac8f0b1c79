use serde::{Deserialize, Serialize};

use crate::domain::entities::SyncReport;
use crate::domain::value_objects::CachePartition;

/// Message a client window sends to the worker. The wire tag matches the
/// web app's `postMessage` protocol, so names stay SCREAMING_SNAKE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientCommand {
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
    #[serde(rename = "CACHE_URLS")]
    CacheUrls { urls: Vec<String> },
    #[serde(rename = "CLEAR_CACHE")]
    ClearCache {
        #[serde(default)]
        partition: Option<CachePartition>,
    },
    #[serde(rename = "GET_CACHE_SIZE")]
    GetCacheSize,
    #[serde(rename = "PUSH_SUBSCRIBE")]
    PushSubscribe { subscription: serde_json::Value },
    #[serde(rename = "SET_BADGE")]
    SetBadge { count: u32 },
    #[serde(rename = "CLEAR_BADGE")]
    ClearBadge,
}

/// Message the worker sends back to client windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatusMessage {
    #[serde(rename = "CACHE_CLEARED")]
    CacheCleared,
    #[serde(rename = "CACHE_SIZE")]
    CacheSize { entries: usize },
    #[serde(rename = "PUSH_SUBSCRIBED")]
    PushSubscribed,
    #[serde(rename = "PUSH_ERROR")]
    PushError { message: String },
    #[serde(rename = "SYNC_COMPLETE")]
    SyncComplete { replayed: u32, failed: u32 },
    #[serde(rename = "PERIODIC_REFRESH")]
    PeriodicRefresh,
    #[serde(rename = "NAVIGATE")]
    Navigate { route: String },
}

impl StatusMessage {
    pub fn from_sync_report(report: &SyncReport) -> Self {
        StatusMessage::SyncComplete {
            replayed: report.replayed_count,
            failed: report.failed_count,
        }
    }
}
