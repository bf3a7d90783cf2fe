//! reqwest-backed HTTP transport

use crate::{
    config::ServiceConfig,
    constants::USER_AGENT,
    error::ServiceError,
    transport::HttpTransport,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// HTTP transport over a shared `reqwest::Client`
pub struct HttpClientTransport {
    client: Client,
}

impl HttpClientTransport {
    /// Creates a transport using the config's request timeout
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Self::with_timeout(config.request_timeout)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ServiceError::Network)?;

        Ok(Self { client })
    }
}

fn map_send_error(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout
    } else {
        ServiceError::Network(e)
    }
}

#[async_trait]
impl HttpTransport for HttpClientTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        tracing::debug!(url, "Sending GET request");

        let response = self.client.get(url).send().await.map_err(map_send_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ServiceError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(ServiceError::ApiError(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        let body = response.bytes().await.map_err(map_send_error)?;
        Ok(body.to_vec())
    }

    fn transport_name(&self) -> &'static str {
        "http"
    }
}
