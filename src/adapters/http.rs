use crate::domain::model::RawResponse;
use crate::domain::ports::Transport;
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// 依序偏好 XML、JSON、CSV
pub const ACCEPT_HEADER: &str = "application/xml, application/json, text/csv;q=0.9, */*;q=0.8";

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("swim-scrape/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScrapeError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, timeout_secs: f64) -> Result<RawResponse> {
        let timeout = Duration::try_from_secs_f64(timeout_secs).map_err(|e| {
            ScrapeError::InvalidConfigValueError {
                field: "timeout".to_string(),
                value: timeout_secs.to_string(),
                reason: e.to_string(),
            }
        })?;

        tracing::debug!("Making request to: {}", url);
        let network_error = |e: reqwest::Error| {
            tracing::error!("Network error while fetching {}: {}", url, e);
            ScrapeError::Network {
                url: url.to_string(),
                message: e.to_string(),
            }
        };

        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_HEADER)
            .timeout(timeout)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        if !status.is_success() {
            tracing::error!("HTTP error while fetching {}: {}", url, status);
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = response.bytes().await.map_err(network_error)?;

        Ok(RawResponse::new(content_type, body.to_vec()))
    }
}
