use crate::app::ports::{PageSource, QueryParams};
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory page source for offline runs and tests. Pages are keyed by the
/// full request URL including any query string.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    pages: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub fn request_key(url: &str, params: &QueryParams) -> String {
        if params.is_empty() {
            return url.to_string();
        }
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{}?{}", url, query.join("&"))
    }
}

#[async_trait]
impl PageSource for StaticSource {
    async fn fetch(&self, url: &str, params: &QueryParams) -> Result<String> {
        let key = Self::request_key(url, params);
        self.pages.get(&key).cloned().ok_or_else(|| ScraperError::Fetch {
            url: key,
            message: "no such page".to_string(),
        })
    }
}
