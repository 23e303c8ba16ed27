use tracing::{debug, warn};

use crate::app::Result;
use crate::domain::{escape_literal, MatchPattern};
use crate::fetcher::{Document, Fetcher};
use crate::search::SearchQuery;

const SEARCH_URL: &str = "https://www.thenetnaija.com/search";
const RESULTS: &str = "h3.result-title";

pub(super) async fn search(query: &SearchQuery, fetcher: &dyn Fetcher) -> Result<Vec<String>> {
    let params = [("t", query.series()), ("folder", "videos")];
    let body = fetcher.fetch_with_query(SEARCH_URL, &params).await?;

    let results: Vec<String> = Document::parse(&body, SEARCH_URL)
        .anchors_in(RESULTS)
        .into_iter()
        .map(|anchor| anchor.href)
        .collect();

    if results.is_empty() {
        warn!("NetNaija - no results found for {}", query.series());
        return Ok(results);
    }
    debug!("NetNaija - {} raw results", results.len());

    let filter = result_filter(query)?;
    Ok(results
        .iter()
        .filter_map(|result| {
            filter
                .captures(result)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
        .collect())
}

/// Matches result URLs down to the most specific path the query names and
/// captures that prefix.
///
/// An episode without a season narrows nothing: result URLs always nest
/// episodes under seasons.
fn result_filter(query: &SearchQuery) -> Result<MatchPattern> {
    let series = escape_literal(&slug(query.series()));

    let source = match (query.season, query.episode) {
        (Some(season), Some(episode)) => {
            format!(r"^(.+{series}/season-{season}/episode-{episode})\b")
        }
        (Some(season), None) => format!(r"^(.+{series}/season-{season})\b"),
        (None, _) => format!(r"^(.+{series})/"),
    };

    MatchPattern::new(&source)
}

/// `The Flash` becomes `The-Flash`; matching ignores case.
fn slug(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("-")
}
