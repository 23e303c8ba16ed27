pub mod document;
pub mod http_fetcher;

pub use document::{Anchor, Document};
pub use http_fetcher::HttpFetcher;

use async_trait::async_trait;

use crate::app::Result;

/// Plain HTTP GET within one session.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    /// GET with query parameters appended.
    async fn fetch_with_query(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut url = url::Url::parse(url)?;
        url.query_pairs_mut().extend_pairs(query);
        self.fetch(url.as_str()).await
    }
}
