use async_trait::async_trait;
use crate::types::{ArgumentPage, AspectSpace};
use crate::Result;

/// Read-only access to an argument-search service.
///
/// Every `query` passed in is already normalized and is embedded into the
/// request URL as-is.
#[async_trait]
pub trait ArgumentApi: Send + Sync {
    /// Total number of arguments matching the query
    async fn total_size(&self, query: &str) -> Result<u64>;

    /// Fetch a single 1-based page of arguments
    async fn fetch_page(&self, query: &str, page: u64, page_size: u64) -> Result<ArgumentPage>;

    /// Fetch the aspect space used for the bar chart
    async fn fetch_aspect_space(&self, query: &str) -> Result<AspectSpace>;
}
