use std::sync::Arc;

use crate::app::error::{KetterError, Result};
use crate::config::Config;
use crate::domain::Resolution;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::gate::{ChromeLauncher, SessionLauncher};
use crate::pipeline::{self, ScrapeRequest};
use crate::search::{self, SearchQuery, SearchSite};

pub struct AppContext {
    pub config: Config,
    pub launcher: Arc<dyn SessionLauncher>,
}

impl AppContext {
    /// Load `~/.config/ketter/config.toml` and drive gates with Chrome.
    pub fn load() -> Result<Self> {
        let config = Config::load().map_err(|e| KetterError::Config(e.to_string()))?;
        Ok(Self::new(config))
    }

    pub fn new(config: Config) -> Self {
        let launcher: Arc<dyn SessionLauncher> = Arc::new(ChromeLauncher::new(config.gate.clone()));
        Self { config, launcher }
    }

    /// A fresh HTTP session. Every run gets its own cookie jar.
    pub fn http_session(&self) -> Result<HttpFetcher> {
        HttpFetcher::new(&self.config.http)
    }

    pub async fn resolve(&self, request: &ScrapeRequest) -> Result<Resolution> {
        // Validate before building any client.
        let plan = pipeline::plan(request)?;
        let fetcher = self.http_session()?;
        pipeline::execute(plan, &fetcher, self.launcher.as_ref(), &self.config.gate).await
    }

    pub async fn search(&self, site: SearchSite, query: &SearchQuery) -> Result<Resolution> {
        let fetcher = self.http_session()?;
        search::search(site, query, &fetcher).await
    }
}
