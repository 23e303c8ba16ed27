use async_trait::async_trait;
use tracing::debug;

use crate::app::Result;
use crate::domain::{PatternBuilder, SelectorSet};
use crate::gate::Gate;
use crate::navigator::{warn_if_empty, Matchers, NavigationContext, SiteNavigator};

const BUILDER: PatternBuilder = PatternBuilder::new(1);
const SEASON_LABEL: &str = "^Season {season}$";
const EPISODE_LABEL: &str = "^Season {season} Episode {episode}$";

/// thenetnaija.com. Episode pages hand off to Sabishare via `<episode>/download`.
pub struct NetNaija;

impl NetNaija {
    async fn episodes(&self, ctx: &NavigationContext<'_>, season_url: &str) -> Vec<String> {
        let anchors = ctx
            .matching_anchors(season_url, &ctx.matchers.episode)
            .await;
        warn_if_empty(&anchors, self.name(), "episode", season_url);

        anchors
            .into_iter()
            .map(|anchor| download_url(&anchor.href))
            .collect()
    }
}

#[async_trait]
impl SiteNavigator for NetNaija {
    fn name(&self) -> &'static str {
        "NetNaija"
    }

    fn hosts(&self) -> &'static [&'static str] {
        &["www.thenetnaija.com"]
    }

    fn matchers(&self, season: &SelectorSet, episode: &SelectorSet) -> Result<Matchers> {
        Ok(Matchers {
            season: Some(BUILDER.build(SEASON_LABEL, season, episode)?),
            episode: BUILDER.build(EPISODE_LABEL, season, episode)?,
        })
    }

    fn gate(&self) -> Option<Gate> {
        Some(Gate::SABISHARE)
    }

    async fn navigate(&self, ctx: &NavigationContext<'_>) -> Vec<String> {
        let url = ctx.target.as_str();

        if ctx.target.path().trim_end_matches('/').ends_with("/download") {
            debug!("URL is already a download page");
            return vec![url.to_string()];
        }

        if ctx.binding.episode.is_some() {
            return vec![download_url(url)];
        }

        if ctx.binding.season.is_some() {
            return self.episodes(ctx, url).await;
        }

        let Ok(season_pattern) = ctx.season_pattern() else {
            return Vec::new();
        };
        let seasons = ctx.matching_anchors(url, season_pattern).await;
        warn_if_empty(&seasons, self.name(), "season", url);

        let mut links = Vec::new();
        for season in seasons {
            links.extend(self.episodes(ctx, &season.href).await);
        }
        links
    }
}

fn download_url(episode_url: &str) -> String {
    if episode_url.ends_with('/') {
        format!("{}download", episode_url)
    } else {
        format!("{}/download", episode_url)
    }
}
