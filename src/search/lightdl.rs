use tracing::debug;

use crate::app::Result;
use crate::domain::{escape_literal, MatchPattern};
use crate::fetcher::{Document, Fetcher};
use crate::search::SearchQuery;

const SEARCH_URL: &str = "https://www.lightdl.xyz/search";

/// Post titles are matched against the whole series name. The season and
/// episode are picked later from the post itself.
pub(super) async fn search(query: &SearchQuery, fetcher: &dyn Fetcher) -> Result<Vec<String>> {
    let body = fetcher
        .fetch_with_query(SEARCH_URL, &[("q", query.series())])
        .await?;

    let title = MatchPattern::new(&format!(r"^\s?{}\s?$", escape_literal(query.series())))?;
    let posts: Vec<String> = Document::parse(&body, SEARCH_URL)
        .anchors_with_attr("h3", "title", &title)
        .into_iter()
        .map(|anchor| anchor.href)
        .collect();

    debug!("LightDL - {} posts titled '{}'", posts.len(), query.series());
    Ok(posts)
}
