use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkerConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub push: PushConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache generation; caches stamped with another version are dropped on activate.
    pub version: String,
    pub prefix: String,
    pub max_dynamic: usize,
    pub max_media: usize,
    pub max_api: usize,
    pub offline_page: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub api_base: String,
    /// Exact-path allow-list for the static application shell.
    pub shell_urls: Vec<String>,
    /// Path prefixes served cache-first from the static partition.
    pub asset_prefixes: Vec<String>,
    /// File extensions routed to the bounded media partition.
    pub media_extensions: Vec<String>,
    /// API path prefixes that may be served from cache when the network fails.
    pub cacheable_api: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
    pub sync_interval_secs: u64,
    pub sync_tag: String,
    /// None keeps an entry in the queue forever, matching the original behavior.
    pub max_attempts: Option<u32>,
    /// Zero disables backoff between consecutive failing replays.
    pub base_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub origin: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    pub subscribe_endpoint: String,
    pub message_endpoint: String,
    pub seen_endpoint: String,
    pub call_reject_endpoint: String,
    pub app_route: String,
    pub chat_route_prefix: String,
    pub call_route_prefix: String,
    pub default_tag: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            version: "v1".to_string(),
            prefix: "courier".to_string(),
            max_dynamic: 60,
            max_media: 50,
            max_api: 30,
            offline_page: "/offline.html".to_string(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            api_base: "/api/v1".to_string(),
            shell_urls: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/offline.html".to_string(),
                "/manifest.json".to_string(),
                "/assets/css/base.css".to_string(),
                "/assets/js/app.js".to_string(),
            ],
            asset_prefixes: vec![
                "/assets/".to_string(),
                "/icons/".to_string(),
                "/fonts/".to_string(),
            ],
            media_extensions: vec![
                "jpg", "jpeg", "png", "gif", "webp", "avif", "mp4", "webm", "ogg", "mp3", "wav",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            cacheable_api: vec![
                "/api/v1/chats".to_string(),
                "/api/v1/contacts".to_string(),
                "/api/v1/me".to_string(),
            ],
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_sync: true,
            sync_interval_secs: 300,
            sync_tag: "courier-mutation-sync".to_string(),
            max_attempts: None,
            base_backoff_ms: 0,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/courier.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            subscribe_endpoint: "/api/v1/push/subscribe".to_string(),
            message_endpoint: "/api/v1/messages".to_string(),
            seen_endpoint: "/api/v1/messages/seen".to_string(),
            call_reject_endpoint: "/api/v1/calls/reject".to_string(),
            app_route: "/".to_string(),
            chat_route_prefix: "/chats/".to_string(),
            call_route_prefix: "/calls/".to_string(),
            default_tag: "courier".to_string(),
        }
    }
}

impl WorkerConfig {
    pub fn from_json_str(raw: &str) -> crate::shared::error::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
