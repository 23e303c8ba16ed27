use std::sync::LazyLock;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::app::Result;
use crate::domain::{MatchPattern, PatternBuilder, SelectorSet};
use crate::fetcher::{Anchor, Document};
use crate::gate::Gate;
use crate::navigator::{warn_if_empty, Matchers, NavigationContext, SiteNavigator};

const BUILDER: PatternBuilder = PatternBuilder::new(1);
const SEASON_LABEL: &str = "^Season {season}$";
const EPISODE_LABEL: &str = r"^Episode {episode}\b";
const PAGINATION: &str = "div.pagination";

static HD_LINK: LazyLock<MatchPattern> = LazyLock::new(|| {
    MatchPattern::new(r"^Click to Download Episode \d{1,6}(.+)? in HD Mp4 Format$")
        .expect("static pattern")
});
static MP4_LINK: LazyLock<MatchPattern> = LazyLock::new(|| {
    MatchPattern::new(r"^Click to Download Episode \d{1,6}(.+)? in Mp4 Format$")
        .expect("static pattern")
});

/// o2tvseries.com. Seasons are paginated; each episode has a quality page
/// whose download link passes through a captcha redirect.
pub struct O2tvSeries;

impl O2tvSeries {
    /// Episode links of a season, across every page of its listing.
    async fn episode_pages(&self, ctx: &NavigationContext<'_>, season_url: &str) -> Vec<Anchor> {
        let Some(body) = ctx.fetch(season_url).await else {
            return Vec::new();
        };

        let (mut episodes, pages) = {
            let document = Document::parse(&body, season_url);
            (
                document.anchors_matching(&ctx.matchers.episode),
                document.links_within(PAGINATION),
            )
        };

        let pages = match pages {
            Some(pages) => other_pages(season_url, pages),
            None => {
                warn!("{} - no pagination on {}", self.name(), season_url);
                Vec::new()
            }
        };

        for page in pages {
            debug!("Following pagination to {}", page);
            episodes.extend(ctx.matching_anchors(&page, &ctx.matchers.episode).await);
        }

        warn_if_empty(&episodes, self.name(), "episode", season_url);
        episodes
    }

    /// The download link on an episode's quality page, HD preferred.
    async fn quality_link(&self, ctx: &NavigationContext<'_>, episode_url: &str) -> Option<String> {
        let body = ctx.fetch(episode_url).await?;
        let document = Document::parse(&body, episode_url);

        let link = document
            .first_anchor_matching(&HD_LINK)
            .or_else(|| {
                debug!("No HD link on {}, trying Mp4", episode_url);
                document.first_anchor_matching(&MP4_LINK)
            })
            .map(|anchor| anchor.href);

        if link.is_none() {
            warn!("{} - no download link on {}", self.name(), episode_url);
        }
        link
    }

    async fn season(&self, ctx: &NavigationContext<'_>, season_url: &str) -> Vec<String> {
        let mut links = Vec::new();
        for episode in self.episode_pages(ctx, season_url).await {
            if let Some(link) = self.quality_link(ctx, &episode.href).await {
                links.push(link);
            }
        }
        links
    }
}

#[async_trait]
impl SiteNavigator for O2tvSeries {
    fn name(&self) -> &'static str {
        "O2tvSeries"
    }

    fn hosts(&self) -> &'static [&'static str] {
        &["o2tvseries.com"]
    }

    fn matchers(&self, season: &SelectorSet, episode: &SelectorSet) -> Result<Matchers> {
        Ok(Matchers {
            season: Some(BUILDER.build(SEASON_LABEL, season, episode)?),
            episode: BUILDER.build(EPISODE_LABEL, season, episode)?,
        })
    }

    fn gate(&self) -> Option<Gate> {
        Some(Gate::O2TV_REDIRECT)
    }

    async fn navigate(&self, ctx: &NavigationContext<'_>) -> Vec<String> {
        let url = ctx.target.as_str();

        if ctx.binding.episode.is_some() {
            return self.quality_link(ctx, url).await.into_iter().collect();
        }

        if ctx.binding.season.is_some() {
            return self.season(ctx, url).await;
        }

        let Ok(season_pattern) = ctx.season_pattern() else {
            return Vec::new();
        };
        let seasons = ctx.matching_anchors(url, season_pattern).await;
        warn_if_empty(&seasons, self.name(), "season", url);

        let mut links = Vec::new();
        for season in seasons {
            links.extend(self.season(ctx, &season.href).await);
        }
        links
    }
}

/// Pagination targets other than the page itself, first occurrence kept.
fn other_pages(current: &str, pages: Vec<Anchor>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for page in pages {
        if page.href.trim_end_matches('/') != current.trim_end_matches('/')
            && !seen.contains(&page.href)
        {
            seen.push(page.href);
        }
    }
    seen
}
