use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{FetchRequest, FetchResponse};

/// Transport-level failures. An HTTP response of any status is NOT an error;
/// it comes back as a `FetchResponse` and the caller decides what to do.
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// Transient: the network is unreachable. Mutations get queued on this.
    #[error("network unreachable: {0}")]
    Offline(String),
    /// The request itself cannot be issued (bad URL, unsupported method).
    #[error("invalid request: {0}")]
    Invalid(String),
}

#[async_trait]
pub trait NetworkGateway: Send + Sync {
    async fn send(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError>;
}
