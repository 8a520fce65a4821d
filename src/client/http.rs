//! `/run` over HTTP

use super::{RequestError, RunBackend, RunResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Backend that calls `GET {base_url}/run?input=...` on a dsdviz server
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend for the server at `base_url` (e.g. `http://localhost:8080`)
    pub fn new(base_url: impl Into<String>) -> Result<Self, RequestError> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RequestError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RunBackend for HttpBackend {
    async fn run(&self, input: &str) -> Result<RunResult, RequestError> {
        let url = format!("{}/run", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("input", input)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Status { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
