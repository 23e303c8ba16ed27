//! End-to-end resolution of one scrape request.
//!
//! ```text
//! URL + tokens → plan (validate, pick site, build matchers)
//!              → navigate → gate (if the site has one) → collect
//! ```
//!
//! [`plan`] does no I/O, so malformed input is rejected before any request
//! goes out.

use tracing::{info, warn};
use url::Url;

use crate::app::{KetterError, Result};
use crate::domain::{Axis, LinkCollector, Resolution, SelectorSet, UrlBinding};
use crate::fetcher::Fetcher;
use crate::gate::{GateConfig, GateResolver, SessionLauncher};
use crate::navigator::{self, Matchers, NavigationContext, SiteNavigator};

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub struct ScrapeRequest {
    pub url: String,
    pub season: Option<String>,
    pub episode: Option<String>,
}

/// A validated request, ready to run.
pub struct Plan {
    pub navigator: Box<dyn SiteNavigator>,
    pub target: Url,
    pub binding: UrlBinding,
    pub season: SelectorSet,
    pub episode: SelectorSet,
    pub matchers: Matchers,
}

/// Parse a target URL, which must be absolute.
pub fn parse_target(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| KetterError::InvalidInput(format!("'{}' is not an absolute URL: {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(KetterError::InvalidInput(format!(
            "'{}' is not a web address",
            url
        )));
    }

    Ok(parsed)
}

/// Validate a request without touching the network.
pub fn plan(request: &ScrapeRequest) -> Result<Plan> {
    let target = parse_target(&request.url)?;
    let navigator = navigator::for_url(&target)?;
    let binding = UrlBinding::from_url(&target);

    let season = SelectorSet::resolve(Axis::Season, request.season.as_deref(), binding.season)?;
    let episode =
        SelectorSet::resolve(Axis::Episode, request.episode.as_deref(), binding.episode)?;
    let matchers = navigator.matchers(&season, &episode)?;

    Ok(Plan {
        navigator,
        target,
        binding,
        season,
        episode,
        matchers,
    })
}

/// Run a plan: navigate the site, pass gated links through the browser and
/// collect what comes out.
pub async fn execute(
    plan: Plan,
    fetcher: &dyn Fetcher,
    launcher: &dyn SessionLauncher,
    gate_config: &GateConfig,
) -> Result<Resolution> {
    let navigator = plan.navigator;
    let ctx = NavigationContext {
        target: plan.target,
        binding: plan.binding,
        matchers: plan.matchers,
        fetcher,
    };

    info!("Navigating {} from {}", navigator.name(), ctx.target);
    let candidates = navigator.navigate(&ctx).await;
    info!("{} candidate links found", candidates.len());

    let links = match navigator.gate() {
        Some(gate) if !candidates.is_empty() => {
            GateResolver::new(launcher, gate_config)
                .resolve_all(&gate, &candidates)
                .await?
        }
        _ => candidates,
    };

    let mut collector = LinkCollector::new(navigator.collection());
    collector.extend(links);

    let resolution = collector.finish();
    if resolution.is_empty() {
        warn!("{} - no download links available", navigator.name());
    }
    Ok(resolution)
}

/// [`plan`] and [`execute`] in one go.
pub async fn resolve(
    request: &ScrapeRequest,
    fetcher: &dyn Fetcher,
    launcher: &dyn SessionLauncher,
    gate_config: &GateConfig,
) -> Result<Resolution> {
    let plan = plan(request)?;
    execute(plan, fetcher, launcher, gate_config).await
}
