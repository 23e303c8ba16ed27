//! Find a series page by title instead of by URL.
//!
//! Search results are candidate starting points for a scrape: NetNaija
//! yields series, season or episode pages, LightDL yields posts.

mod lightdl;
mod netnaija;

use std::fmt;

use clap::ValueEnum;
use tracing::{info, warn};

use crate::app::{KetterError, Result};
use crate::domain::{CollectionMode, LinkCollector, Resolution};
use crate::fetcher::Fetcher;

/// Sites with a search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchSite {
    #[value(name = "netnaija")]
    NetNaija,
    #[value(name = "lightdl")]
    LightDl,
}

impl fmt::Display for SearchSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchSite::NetNaija => write!(f, "NetNaija"),
            SearchSite::LightDl => write!(f, "LightDL"),
        }
    }
}

/// A validated title search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    series: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl SearchQuery {
    /// Build a query. The series name must contain something besides whitespace.
    pub fn new(series: &str, season: Option<u32>, episode: Option<u32>) -> Result<Self> {
        let series = series.split_whitespace().collect::<Vec<_>>().join(" ");
        if series.is_empty() {
            return Err(KetterError::InvalidInput(
                "series name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            series,
            season,
            episode,
        })
    }

    /// The series name with runs of whitespace collapsed.
    pub fn series(&self) -> &str {
        &self.series
    }
}

/// Search one site and return the matching result links, repeats dropped.
pub async fn search(site: SearchSite, query: &SearchQuery, fetcher: &dyn Fetcher) -> Result<Resolution> {
    info!("Searching {} for '{}'", site, query.series());

    let found = match site {
        SearchSite::NetNaija => netnaija::search(query, fetcher).await?,
        SearchSite::LightDl => lightdl::search(query, fetcher).await?,
    };

    let mut collector = LinkCollector::new(CollectionMode::Deduplicated);
    collector.extend(found);

    let resolution = collector.finish();
    if resolution.is_empty() {
        warn!("{} - no matching results for {}", site, query.series());
    }
    Ok(resolution)
}
