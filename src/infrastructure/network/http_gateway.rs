use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{NetworkError, NetworkGateway};
use crate::domain::entities::{FetchRequest, FetchResponse};
use crate::shared::config::NetworkConfig;
use crate::shared::error::{AppError, Result};

/// Real network edge. Transport-level failures (refused connection,
/// timeout, dropped body) all surface as `Offline` so the strategies treat
/// them uniformly; only a malformed request is `Invalid`.
pub struct HttpGateway {
    client: reqwest::Client,
    origin: String,
}

impl HttpGateway {
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| AppError::Network(err.to_string()))?;
        Ok(Self {
            client,
            origin: config.origin.trim_end_matches('/').to_string(),
        })
    }

    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.origin, url)
        }
    }
}

fn classify(err: reqwest::Error) -> NetworkError {
    if err.is_builder() {
        NetworkError::Invalid(err.to_string())
    } else {
        // is_connect, is_timeout, is_request, is_body: the request never
        // completed, which is indistinguishable from being offline here.
        NetworkError::Offline(err.to_string())
    }
}

#[async_trait]
impl NetworkGateway for HttpGateway {
    async fn send(&self, request: &FetchRequest) -> std::result::Result<FetchResponse, NetworkError> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|_| NetworkError::Invalid(format!("bad method {}", request.method)))?;

        let mut builder = self.client.request(method, self.absolute_url(&request.url));
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|text| (name.to_string(), text.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(classify)?;

        Ok(FetchResponse::new(status, headers, body))
    }
}
