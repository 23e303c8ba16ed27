use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{CollectionMode, PatternBuilder, SelectorSet};
use crate::navigator::{warn_if_empty, Matchers, NavigationContext, SiteNavigator};

const BUILDER: PatternBuilder = PatternBuilder::new(1);
/// `S01E02` style labels, not followed by another digit.
const EPISODE_TOKEN: &str = r"s{season}e{episode}(?:\D|$)";

/// lightdl.xyz. A post lists every episode file directly.
pub struct LightDl;

#[async_trait]
impl SiteNavigator for LightDl {
    fn name(&self) -> &'static str {
        "LightDL"
    }

    fn hosts(&self) -> &'static [&'static str] {
        &["www.lightdl.xyz"]
    }

    fn matchers(&self, season: &SelectorSet, episode: &SelectorSet) -> Result<Matchers> {
        Ok(Matchers {
            season: None,
            episode: BUILDER.build(EPISODE_TOKEN, season, episode)?,
        })
    }

    fn collection(&self) -> CollectionMode {
        CollectionMode::Deduplicated
    }

    async fn navigate(&self, ctx: &NavigationContext<'_>) -> Vec<String> {
        let url = ctx.target.as_str();
        let anchors = ctx.matching_anchors(url, &ctx.matchers.episode).await;
        warn_if_empty(&anchors, self.name(), "episode", url);

        anchors.into_iter().map(|anchor| anchor.href).collect()
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::domain::{Axis, UrlBinding};
    use crate::fetcher::testing::StaticFetcher;

    const POST: &str = "https://www.lightdl.xyz/2021/03/the-show.html";

    const LISTING: &str = r#"
        <p><a href="https://dl.example/the.show.s01e01.mkv">The.Show.S01E01.720p</a></p>
        <p><a href="https://dl.example/the.show.s01e02.mkv">The.Show.S01E02.720p</a></p>
        <p><a href="https://dl.example/the.show.s01e12.mkv">The.Show.S01E12.720p</a></p>
        <p><a href="https://dl.example/the.show.s02e02.mkv">The.Show.S02E02.720p</a></p>
        <p><a href="https://dl.example/the.show.s01e02.mkv">Mirror: the.show.s01e02</a></p>
    "#;

    async fn links(season: Option<&str>, episode: Option<&str>) -> Vec<String> {
        let fetcher = StaticFetcher::new().page(POST, LISTING);
        let target = Url::parse(POST).unwrap();
        let binding = UrlBinding::from_url(&target);
        let season = SelectorSet::resolve(Axis::Season, season, binding.season).unwrap();
        let episode = SelectorSet::resolve(Axis::Episode, episode, binding.episode).unwrap();
        let ctx = NavigationContext {
            matchers: LightDl.matchers(&season, &episode).unwrap(),
            target,
            binding,
            fetcher: &fetcher,
        };

        LightDl.navigate(&ctx).await
    }

    #[tokio::test]
    async fn test_combined_token_matching() {
        assert_eq!(
            links(Some("1"), Some("2")).await,
            vec![
                "https://dl.example/the.show.s01e02.mkv",
                "https://dl.example/the.show.s01e02.mkv",
            ]
        );
    }

    #[tokio::test]
    async fn test_wildcard_matches_every_episode() {
        assert_eq!(links(None, None).await.len(), 5);
    }

    #[tokio::test]
    async fn test_episode_only_spans_seasons() {
        assert_eq!(
            links(None, Some("2")).await,
            vec![
                "https://dl.example/the.show.s01e02.mkv",
                "https://dl.example/the.show.s02e02.mkv",
                "https://dl.example/the.show.s01e02.mkv",
            ]
        );
    }
}
