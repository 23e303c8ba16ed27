use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use ketter::app::{KetterError, Result};
use ketter::domain::Resolution;
use ketter::fetcher::Fetcher;
use ketter::gate::{BrowserSession, GateConfig, SessionLauncher};
use ketter::pipeline::{resolve, ScrapeRequest};

struct Pages(HashMap<String, String>);

#[async_trait]
impl Fetcher for Pages {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.0
            .get(url)
            .map(|html| html.clone().into_bytes())
            .ok_or_else(|| KetterError::InvalidInput(format!("unknown page {}", url)))
    }
}

/// Every interstitial redirects to the address in `redirects`.
struct Redirects {
    redirects: HashMap<String, String>,
    launches: AtomicUsize,
}

struct RedirectSession {
    redirects: HashMap<String, String>,
    current: Mutex<Option<String>>,
}

#[async_trait]
impl BrowserSession for RedirectSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        let landed = self.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        *self.current.lock().unwrap() = Some(landed);
        Ok(())
    }

    async fn title(&self) -> Result<Option<String>> {
        Ok(None)
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<()> {
        Err(KetterError::GateTimeout {
            selector: selector.to_string(),
            url: String::new(),
        })
    }

    async fn click(&self, _selector: &str) -> Result<()> {
        Ok(())
    }

    async fn attribute(&self, _selector: &str, _name: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn current_url(&self) -> Result<Option<String>> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl SessionLauncher for Redirects {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RedirectSession {
            redirects: self.redirects.clone(),
            current: Mutex::new(None),
        }))
    }
}

fn redirects(pairs: &[(&str, &str)]) -> Redirects {
    Redirects {
        redirects: pairs
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect(),
        launches: AtomicUsize::new(0),
    }
}

fn fast_gate() -> GateConfig {
    GateConfig {
        wait_timeout_secs: 0,
        poll_interval_ms: 1,
        ..Default::default()
    }
}

fn request(url: &str, season: Option<&str>, episode: Option<&str>) -> ScrapeRequest {
    ScrapeRequest {
        url: url.to_string(),
        season: season.map(String::from),
        episode: episode.map(String::from),
    }
}

const SEASON_2: &str = "https://o2tvseries.com/Show/season-2";

fn o2tv_season_two() -> Pages {
    let mut pages = HashMap::new();
    pages.insert(
        SEASON_2.to_string(),
        format!(
            r#"<ul>
                 <li><a href="{SEASON_2}/episode-1">Episode 01</a></li>
                 <li><a href="{SEASON_2}/episode-2">Episode 02</a></li>
                 <li><a href="{SEASON_2}/episode-3">Episode 03</a></li>
               </ul>"#
        ),
    );
    for e in 1..=3 {
        pages.insert(
            format!("{SEASON_2}/episode-{e}"),
            format!(
                r#"<a href="https://d.o2tvseries.com/get/{e}">Click to Download Episode {e} in HD Mp4 Format</a>"#
            ),
        );
    }
    Pages(pages)
}

#[tokio::test]
async fn season_url_with_episode_range_resolves_through_redirects() {
    let fetcher = o2tv_season_two();
    let launcher = redirects(&[
        ("https://d.o2tvseries.com/get/1", "https://files.o2tv/Show.S02E01.mp4"),
        ("https://d.o2tvseries.com/get/2", "https://files.o2tv/Show.S02E02.mp4"),
    ]);

    let resolution = resolve(
        &request(SEASON_2, None, Some("[1-2]")),
        &fetcher,
        &launcher,
        &fast_gate(),
    )
    .await
    .unwrap();

    assert_eq!(
        resolution,
        Resolution::Links(vec![
            "https://files.o2tv/Show.S02E01.mp4".to_string(),
            "https://files.o2tv/Show.S02E02.mp4".to_string(),
        ])
    );
    assert_eq!(launcher.launches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn redirect_that_never_happens_drops_only_that_episode() {
    let fetcher = o2tv_season_two();
    let launcher = redirects(&[
        ("https://d.o2tvseries.com/get/1", "https://files.o2tv/Show.S02E01.mp4"),
        ("https://d.o2tvseries.com/get/3", "https://files.o2tv/Show.S02E03.mp4"),
    ]);

    let resolution = resolve(&request(SEASON_2, None, None), &fetcher, &launcher, &fast_gate())
        .await
        .unwrap();

    assert_eq!(
        resolution.links(),
        [
            "https://files.o2tv/Show.S02E01.mp4",
            "https://files.o2tv/Show.S02E03.mp4",
        ]
    );
}

#[tokio::test]
async fn episode_outside_the_listing_is_nothing_available() {
    let fetcher = o2tv_season_two();
    let launcher = redirects(&[]);

    let resolution = resolve(
        &request(SEASON_2, None, Some("[50]")),
        &fetcher,
        &launcher,
        &fast_gate(),
    )
    .await
    .unwrap();

    assert_eq!(resolution, Resolution::NothingAvailable);
    assert_eq!(launcher.launches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn season_selector_conflicting_with_url_is_rejected() {
    let fetcher = o2tv_season_two();
    let launcher = redirects(&[]);

    let result = resolve(&request(SEASON_2, Some("3"), None), &fetcher, &launcher, &fast_gate()).await;

    assert!(matches!(result, Err(KetterError::InvalidSelector(_))));
}

#[tokio::test]
async fn unknown_site_is_rejected() {
    let fetcher = Pages(HashMap::new());
    let launcher = redirects(&[]);

    let result = resolve(
        &request("https://www.example.com/show/season-1", None, None),
        &fetcher,
        &launcher,
        &fast_gate(),
    )
    .await;

    assert!(matches!(result, Err(KetterError::UnsupportedSite(host)) if host == "www.example.com"));
}

#[tokio::test]
async fn lightdl_repeats_are_collapsed() {
    let post = "https://www.lightdl.xyz/2020/05/show.html";
    let fetcher = Pages(HashMap::from([(
        post.to_string(),
        r#"<p><a href="https://dl.lightdl/show.s01e03.mkv">Show S01E03 (480p)</a></p>
           <p><a href="https://dl.lightdl/show.s01e03.mkv">Show S01E03 mirror</a></p>
           <p><a href="https://dl.lightdl/show.s01e04.mkv">Show S01E04</a></p>"#
            .to_string(),
    )]));
    let launcher = redirects(&[]);

    let resolution = resolve(&request(post, Some("1"), Some("[3-4]")), &fetcher, &launcher, &fast_gate())
        .await
        .unwrap();

    assert_eq!(
        resolution.into_links(),
        vec![
            "https://dl.lightdl/show.s01e03.mkv",
            "https://dl.lightdl/show.s01e04.mkv",
        ]
    );
}
