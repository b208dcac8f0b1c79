use serde::{Deserialize, Serialize};
use std::fmt;

/// A named cache namespace with its own bound and eviction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePartition {
    Static,
    Dynamic,
    Media,
    Api,
}

impl CachePartition {
    pub fn as_str(&self) -> &'static str {
        match self {
            CachePartition::Static => "static",
            CachePartition::Dynamic => "dynamic",
            CachePartition::Media => "media",
            CachePartition::Api => "api",
        }
    }

    pub fn all() -> [CachePartition; 4] {
        [
            CachePartition::Static,
            CachePartition::Dynamic,
            CachePartition::Media,
            CachePartition::Api,
        ]
    }

    /// Versioned cache name, e.g. `courier-static-v1`.
    pub fn cache_name(&self, prefix: &str, version: &str) -> String {
        format!("{}-{}-{}", prefix, self.as_str(), version)
    }
}

impl fmt::Display for CachePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
