use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, DNT, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;
use tracing::debug;

use crate::app::{KetterError, Result};
use crate::config::HttpConfig;
use crate::fetcher::Fetcher;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
                           image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";

/// A browser-looking HTTP session with its own cookie jar.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .default_headers(Self::default_headers(config)?)
            .build()?;

        Ok(Self { client })
    }

    fn default_headers(config: &HttpConfig) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).map_err(|e| {
                KetterError::Config(format!(
                    "invalid accept_language '{}': {}",
                    config.accept_language, e
                ))
            })?,
        );
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        for (name, value) in [
            ("sec-fetch-dest", "document"),
            ("sec-fetch-mode", "navigate"),
            ("sec-fetch-site", "none"),
            ("sec-fetch-user", "?1"),
        ] {
            headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        }

        Ok(headers)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;
        let body = response.bytes().await?.to_vec();
        Ok(body)
    }
}
