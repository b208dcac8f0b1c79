use std::sync::Arc;

use tracing::debug;

use super::mutation_service::MutationService;
use crate::application::ports::{CacheStore, NetworkError, NetworkGateway};
use crate::domain::entities::{CachedResponse, FetchRequest, FetchResponse};
use crate::domain::routing::{RequestClassifier, Strategy};
use crate::domain::value_objects::CachePartition;
use crate::shared::config::{CacheConfig, RoutingConfig};
use crate::shared::error::AppError;

/// Serves every inbound fetch with the strategy the classifier picks.
/// Caching strategies evict BEFORE inserting so a bounded partition never
/// overshoots its limit, even transiently.
pub struct FetchService {
    classifier: RequestClassifier,
    cache: Arc<dyn CacheStore>,
    network: Arc<dyn NetworkGateway>,
    mutations: Arc<MutationService>,
    config: CacheConfig,
}

impl FetchService {
    pub fn new(
        routing: RoutingConfig,
        cache_config: CacheConfig,
        cache: Arc<dyn CacheStore>,
        network: Arc<dyn NetworkGateway>,
        mutations: Arc<MutationService>,
    ) -> Self {
        Self {
            classifier: RequestClassifier::new(routing),
            cache,
            network,
            mutations,
            config: cache_config,
        }
    }

    pub async fn handle(&self, request: FetchRequest) -> Result<FetchResponse, AppError> {
        match self.classifier.classify(&request) {
            Strategy::Mutation => self.mutations.handle(request).await,
            Strategy::CacheFirst => {
                self.cache_first(request, CachePartition::Static, None).await
            }
            Strategy::CacheFirstBounded => {
                self.cache_first(request, CachePartition::Media, Some(self.config.max_media))
                    .await
            }
            Strategy::NetworkFirst => self.network_first(request).await,
            Strategy::NetworkOnly => self.network_only(request).await,
            Strategy::Navigation => self.navigation(request).await,
            Strategy::StaleWhileRevalidate => self.stale_while_revalidate(request).await,
        }
    }

    /// Best-effort precache of the static shell; returns how many URLs
    /// actually landed in the cache.
    pub async fn precache(&self, urls: &[String]) -> usize {
        let mut cached = 0;
        for url in urls {
            let request = FetchRequest::get(url.clone());
            match self.network.send(&request).await {
                Ok(response) if response.is_success() => {
                    self.store(CachePartition::Static, None, &request, &response)
                        .await;
                    cached += 1;
                }
                Ok(response) => {
                    debug!(url = %url, status = response.status, "precache skipped");
                }
                Err(err) => {
                    debug!(url = %url, error = %err, "precache fetch failed");
                }
            }
        }
        cached
    }

    async fn cache_first(
        &self,
        request: FetchRequest,
        partition: CachePartition,
        limit: Option<usize>,
    ) -> Result<FetchResponse, AppError> {
        let key = request.cache_key();
        if let Some(hit) = self.cache.get(partition, &key).await {
            return Ok(hit.into_response());
        }

        match self.network.send(&request).await {
            Ok(response) => {
                if response.is_success() {
                    self.store(partition, limit, &request, &response).await;
                }
                Ok(response)
            }
            Err(NetworkError::Offline(_)) => Ok(FetchResponse::offline()),
            Err(NetworkError::Invalid(reason)) => Err(AppError::InvalidInput(reason)),
        }
    }

    async fn network_first(&self, request: FetchRequest) -> Result<FetchResponse, AppError> {
        match self.network.send(&request).await {
            Ok(response) => {
                // Refresh the cached copy on every success.
                if response.is_success() {
                    self.store(
                        CachePartition::Api,
                        Some(self.config.max_api),
                        &request,
                        &response,
                    )
                    .await;
                }
                Ok(response)
            }
            Err(NetworkError::Offline(_)) => {
                match self.cache.get(CachePartition::Api, &request.cache_key()).await {
                    Some(hit) => Ok(hit.into_response()),
                    None => Ok(FetchResponse::offline()),
                }
            }
            Err(NetworkError::Invalid(reason)) => Err(AppError::InvalidInput(reason)),
        }
    }

    async fn network_only(&self, request: FetchRequest) -> Result<FetchResponse, AppError> {
        match self.network.send(&request).await {
            Ok(response) => Ok(response),
            Err(NetworkError::Offline(_)) => Ok(FetchResponse::offline()),
            Err(NetworkError::Invalid(reason)) => Err(AppError::InvalidInput(reason)),
        }
    }

    async fn navigation(&self, request: FetchRequest) -> Result<FetchResponse, AppError> {
        match self.network.send(&request).await {
            Ok(response) => {
                if response.is_success() {
                    // Keep the shell entry for `/` fresh for later offline loads.
                    let shell = FetchRequest::get("/");
                    self.store(CachePartition::Static, None, &shell, &response)
                        .await;
                }
                Ok(response)
            }
            Err(NetworkError::Offline(_)) => Ok(self.navigation_fallback().await),
            Err(NetworkError::Invalid(reason)) => Err(AppError::InvalidInput(reason)),
        }
    }

    /// The UI must always receive something renderable for a navigation.
    async fn navigation_fallback(&self) -> FetchResponse {
        let candidates = [
            "GET /".to_string(),
            "GET /index.html".to_string(),
            format!("GET {}", self.config.offline_page),
        ];
        for key in &candidates {
            if let Some(hit) = self.cache.get(CachePartition::Static, key).await {
                return hit.into_response();
            }
        }
        FetchResponse::inline_offline_page()
    }

    async fn stale_while_revalidate(
        &self,
        request: FetchRequest,
    ) -> Result<FetchResponse, AppError> {
        let key = request.cache_key();
        if let Some(hit) = self.cache.get(CachePartition::Dynamic, &key).await {
            self.spawn_revalidation(request);
            return Ok(hit.into_response());
        }

        match self.network.send(&request).await {
            Ok(response) => {
                if response.is_success() {
                    self.store(
                        CachePartition::Dynamic,
                        Some(self.config.max_dynamic),
                        &request,
                        &response,
                    )
                    .await;
                }
                Ok(response)
            }
            Err(NetworkError::Offline(_)) => Ok(FetchResponse::offline()),
            Err(NetworkError::Invalid(reason)) => Err(AppError::InvalidInput(reason)),
        }
    }

    /// Refreshes a dynamic entry in the background while the caller already
    /// holds the stale copy.
    fn spawn_revalidation(&self, request: FetchRequest) {
        let network = Arc::clone(&self.network);
        let cache = Arc::clone(&self.cache);
        let limit = self.config.max_dynamic;

        tokio::spawn(async move {
            match network.send(&request).await {
                Ok(response) if response.is_success() => {
                    cache
                        .evict_if_over_limit(CachePartition::Dynamic, limit)
                        .await;
                    cache
                        .put(
                            CachePartition::Dynamic,
                            request.cache_key(),
                            CachedResponse::from_response(&response),
                        )
                        .await;
                }
                Ok(response) => {
                    debug!(url = %request.url, status = response.status, "revalidation skipped");
                }
                Err(err) => {
                    debug!(url = %request.url, error = %err, "background revalidation failed");
                }
            }
        });
    }

    async fn store(
        &self,
        partition: CachePartition,
        limit: Option<usize>,
        request: &FetchRequest,
        response: &FetchResponse,
    ) {
        if let Some(limit) = limit {
            self.cache.evict_if_over_limit(partition, limit).await;
        }
        self.cache
            .put(
                partition,
                request.cache_key(),
                CachedResponse::from_response(response),
            )
            .await;
    }
}
