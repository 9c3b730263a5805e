use async_trait::async_trait;

use crate::error::Result;

/// Query parameters appended to a page request, in order.
pub type QueryParams = [(String, String)];

/// Supplies raw page markup for a scoreboard or play-by-play URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str, params: &QueryParams) -> Result<String>;
}
