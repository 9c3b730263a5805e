use crate::app::ports::{PageSource, QueryParams};
use crate::config::SourceConfig;
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetches pages over HTTP with a bounded per-request timeout.
pub struct ReqwestSource {
    client: reqwest::Client,
}

impl ReqwestSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for ReqwestSource {
    #[instrument(skip(self, params))]
    async fn fetch(&self, url: &str, params: &QueryParams) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| ScraperError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Fetch {
                url: url.to_string(),
                message: format!("request failed with status: {}", status),
            });
        }

        let body = resp.text().await.map_err(|e| ScraperError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        debug!(bytes = body.len(), "fetched page");
        Ok(body)
    }
}
