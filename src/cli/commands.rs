use std::fs;
use std::path::Path;

use tracing::warn;

use crate::app::{AppContext, Result};
use crate::domain::Resolution;
use crate::pipeline::ScrapeRequest;
use crate::search::{SearchQuery, SearchSite};

pub async fn scrape(ctx: &AppContext, request: &ScrapeRequest, output: &Path) -> Result<()> {
    let resolution = ctx.resolve(request).await?;
    report(&resolution, output)
}

pub async fn search(
    ctx: &AppContext,
    site: SearchSite,
    series: &str,
    season: Option<u32>,
    episode: Option<u32>,
    output: &Path,
) -> Result<()> {
    let query = SearchQuery::new(series, season, episode)?;
    let resolution = ctx.search(site, &query).await?;
    report(&resolution, output)
}

fn report(resolution: &Resolution, output: &Path) -> Result<()> {
    match resolution {
        Resolution::NothingAvailable => {
            warn!("No links available");
            println!("No links available");
        }
        Resolution::Links(links) => {
            write_links(links, output)?;
            for link in links {
                println!("{}", link);
            }
            println!("Wrote {} links to {}", links.len(), output.display());
        }
    }
    Ok(())
}

/// Overwrite `path` with one link per line.
pub fn write_links(links: &[String], path: &Path) -> Result<()> {
    let mut content = links.join("\n");
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_links_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "stale\nlines\nfrom\nbefore\n").unwrap();

        write_links(&["https://a/1".to_string(), "https://a/2".to_string()], &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "https://a/1\nhttps://a/2\n");
    }

    #[test]
    fn test_nothing_available_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");

        report(&Resolution::NothingAvailable, &path).unwrap();

        assert!(!path.exists());
    }
}
