//! Per-site navigation from a series/season/episode URL to candidate links.
//!
//! Each supported site walks its own page hierarchy:
//!
//! ```text
//! SeasonIndex → SeasonPage → EpisodePage(s) [+ pagination] → QualityPage → link
//! ```
//!
//! States the target URL already settles are skipped. A stage that finds
//! nothing logs a warning and contributes no links; it never fails the run.
//!
//! - [`NetNaija`]: episode pages lead to Sabishare, resolved through a browser
//! - [`LightDl`]: one listing page carrying `SxxEyy` links
//! - [`O2tvSeries`]: paginated seasons, quality pages, captcha redirect

mod lightdl;
mod netnaija;
mod o2tvseries;

pub use lightdl::LightDl;
pub use netnaija::NetNaija;
pub use o2tvseries::O2tvSeries;

use async_trait::async_trait;
use tracing::{debug, error, warn};
use url::Url;

use crate::app::{KetterError, Result};
use crate::domain::{CollectionMode, MatchPattern, SelectorSet, UrlBinding};
use crate::fetcher::{Anchor, Document, Fetcher};
use crate::gate::Gate;

/// Compiled label matchers for one run.
#[derive(Debug, Clone)]
pub struct Matchers {
    /// Labels of season index links, for sites that have a season index.
    pub season: Option<MatchPattern>,
    /// Labels of episode links. Sites that encode both axes in one token
    /// (`S01E02`) only use this one.
    pub episode: MatchPattern,
}

/// Mutable state of one navigation run.
pub struct NavigationContext<'a> {
    pub target: Url,
    pub binding: UrlBinding,
    pub matchers: Matchers,
    pub fetcher: &'a dyn Fetcher,
}

impl NavigationContext<'_> {
    /// Fetch a page, logging and swallowing failures.
    pub async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        debug!("Fetching {}", url);
        match self.fetcher.fetch(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                error!("Failed to fetch {}: {}", url, e);
                None
            }
        }
    }

    /// Fetch a page and return the anchors whose text matches `pattern`.
    pub async fn matching_anchors(&self, url: &str, pattern: &MatchPattern) -> Vec<Anchor> {
        let Some(body) = self.fetch(url).await else {
            return Vec::new();
        };
        Document::parse(&body, url).anchors_matching(pattern)
    }

    pub fn season_pattern(&self) -> Result<&MatchPattern> {
        self.matchers.season.as_ref().ok_or_else(|| {
            KetterError::InvalidInput("this site has no season index matcher".to_string())
        })
    }
}

/// A site-specific walk from target URL to candidate links.
#[async_trait]
pub trait SiteNavigator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Network locations served by this navigator.
    fn hosts(&self) -> &'static [&'static str];

    /// Build the label matchers for the selected seasons and episodes.
    fn matchers(&self, season: &SelectorSet, episode: &SelectorSet) -> Result<Matchers>;

    /// The browser gate standing between candidate links and files, if any.
    fn gate(&self) -> Option<Gate> {
        None
    }

    fn collection(&self) -> CollectionMode {
        CollectionMode::Ordered
    }

    /// Walk the site and return candidate links in discovery order.
    async fn navigate(&self, ctx: &NavigationContext<'_>) -> Vec<String>;
}

/// All supported sites.
pub fn all() -> Vec<Box<dyn SiteNavigator>> {
    vec![Box::new(NetNaija), Box::new(LightDl), Box::new(O2tvSeries)]
}

/// Pick the navigator for a URL's network location.
pub fn for_url(url: &Url) -> Result<Box<dyn SiteNavigator>> {
    let host = url.host_str().unwrap_or_default();
    all()
        .into_iter()
        .find(|navigator| navigator.hosts().contains(&host))
        .ok_or_else(|| KetterError::UnsupportedSite(host.to_string()))
}

/// Log when a stage came back empty.
pub(crate) fn warn_if_empty<T>(found: &[T], site: &str, what: &str, url: &str) {
    if found.is_empty() {
        warn!("{} - no {} match on {}", site, what, url);
    } else {
        debug!("{} - {} {} found on {}", site, found.len(), what, url);
    }
}
