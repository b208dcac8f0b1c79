use crate::domain::entities::{FetchRequest, RequestMode};
use crate::domain::value_objects::HttpMethod;
use crate::shared::config::RoutingConfig;

/// How a classified request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Non-GET; handed to the delivery queue's mutation handler.
    Mutation,
    /// Static shell: cache hit wins, network fills the cache once.
    CacheFirst,
    /// Media: cache first against the bounded media partition.
    CacheFirstBounded,
    /// Cacheable API reads: network wins, cache is the offline fallback.
    NetworkFirst,
    /// Uncacheable API: never cached, structured offline error on failure.
    NetworkOnly,
    /// Full page loads with the shell fallback chain.
    Navigation,
    /// Everything else against the dynamic partition.
    StaleWhileRevalidate,
}

/// Classifies fetches by URL, method and mode. Pure; all tables come from config.
#[derive(Debug, Clone)]
pub struct RequestClassifier {
    config: RoutingConfig,
}

impl RequestClassifier {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, request: &FetchRequest) -> Strategy {
        self.classify_parts(&request.url, &request.method, request.mode)
    }

    /// Rules apply in priority order; the first match wins.
    pub fn classify_parts(&self, url: &str, method: &HttpMethod, mode: RequestMode) -> Strategy {
        if !method.is_get() {
            return Strategy::Mutation;
        }

        let path = Self::path_of(url);

        if self.is_shell(path) {
            return Strategy::CacheFirst;
        }

        if self.has_media_extension(path) {
            return Strategy::CacheFirstBounded;
        }

        if path.starts_with(self.config.api_base.as_str()) {
            if self.is_cacheable_api(path) {
                return Strategy::NetworkFirst;
            }
            return Strategy::NetworkOnly;
        }

        if mode == RequestMode::Navigate {
            return Strategy::Navigation;
        }

        Strategy::StaleWhileRevalidate
    }

    fn is_shell(&self, path: &str) -> bool {
        self.config.shell_urls.iter().any(|url| url == path)
            || self
                .config
                .asset_prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
    }

    fn has_media_extension(&self, path: &str) -> bool {
        let Some((_, extension)) = path.rsplit_once('.') else {
            return false;
        };
        let extension = extension.to_ascii_lowercase();
        self.config
            .media_extensions
            .iter()
            .any(|candidate| candidate == &extension)
    }

    fn is_cacheable_api(&self, path: &str) -> bool {
        self.config
            .cacheable_api
            .iter()
            .any(|pattern| path == pattern || path.starts_with(&format!("{}/", pattern)))
    }

    /// Path component only: scheme/host, query and fragment stripped.
    fn path_of(url: &str) -> &str {
        let without_origin = match url.find("://") {
            Some(scheme_end) => {
                let rest = &url[scheme_end + 3..];
                match rest.find('/') {
                    Some(path_start) => &rest[path_start..],
                    None => "/",
                }
            }
            None => url,
        };

        let without_fragment = without_origin
            .split_once('#')
            .map(|(head, _)| head)
            .unwrap_or(without_origin);
        without_fragment
            .split_once('?')
            .map(|(head, _)| head)
            .unwrap_or(without_fragment)
    }
}
