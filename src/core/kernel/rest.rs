use crate::core::classifier::RawResponse;
use crate::core::errors::ExchangeError;
use crate::core::kernel::request::HttpRequest;
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use std::collections::HashMap;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{instrument, trace, warn};

/// Transport for assembled requests
///
/// Implementations only move bytes: they return the raw response whatever
/// its status, and leave classification to the exchange.
#[async_trait]
pub trait RestClient: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> Result<RawResponse, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Retries on connection failures (and timeouts for GET)
    pub max_retries: u32,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(exchange_name: String) -> Self {
        Self {
            exchange_name,
            timeout_seconds: 30,
            max_retries: 3,
            user_agent: "LotusX/1.0".to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone, Debug)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
}

impl ReqwestRest {
    pub fn new(exchange_name: String) -> Result<Self, ExchangeError> {
        RestClientBuilder::new(RestClientConfig::new(exchange_name)).build()
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Resending a POST after a timeout could duplicate an order, so only
    /// idempotent requests retry on timeouts
    fn should_retry(method: &Method, error: &reqwest::Error) -> bool {
        error.is_connect() || (error.is_timeout() && *method == Method::GET)
    }

    async fn send_once(&self, request: &HttpRequest) -> Result<Response, reqwest::Error> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        builder.send().await
    }

    async fn into_raw(
        &self,
        request: &HttpRequest,
        response: Response,
    ) -> Result<RawResponse, ExchangeError> {
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect::<HashMap<_, _>>();
        let body = response.text().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!("Response body: {}", body);

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            url: request.url.clone(),
            method: request.method.to_string(),
            headers,
            body,
        })
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(
        skip(self, request),
        fields(exchange = %self.config.exchange_name, method = %request.method, url = %request.url)
    )]
    async fn execute(&self, request: &HttpRequest) -> Result<RawResponse, ExchangeError> {
        let strategy = ExponentialBackoff::from_millis(50)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(self.config.max_retries as usize);

        let response = RetryIf::start(
            strategy,
            || self.send_once(request),
            |error: &reqwest::Error| {
                let retry = Self::should_retry(&request.method, error);
                if retry {
                    warn!("Transport failure, retrying: {}", error);
                }
                retry
            },
        )
        .await
        .map_err(|e| ExchangeError::NetworkError(format!("Request failed: {}", e)))?;

        self.into_raw(request, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_applies_config() {
        let rest = RestClientBuilder::new(
            RestClientConfig::new("wex".to_string())
                .with_timeout(5)
                .with_max_retries(1)
                .with_user_agent("test-agent".to_string()),
        )
        .build()
        .unwrap();

        assert_eq!(rest.config().timeout_seconds, 5);
        assert_eq!(rest.config().max_retries, 1);
        assert_eq!(rest.config().user_agent, "test-agent");
    }
}
