//! Browser-driven resolution of gated download links.
//!
//! Some file hosts hide the real URL behind a client-rendered interstitial.
//! A [`GateResolver`] drives a real browser session through that page and
//! reads either a revealed link element or the address the page redirects to.
//!
//! # Architecture
//!
//! ```text
//! Candidate link → SessionLauncher → BrowserSession → Gate strategy → Resolved link
//! ```
//!
//! Each link is resolved under a fixed wait budget. A timeout drops that one
//! link and is logged; the rest of the run continues.

mod chrome;
mod config;

pub use chrome::{ChromeLauncher, ChromeSession};
pub use config::GateConfig;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::app::{KetterError, Result};

/// A live browser session.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Load a URL and wait for the initial document.
    async fn navigate(&self, url: &str) -> Result<()>;

    async fn title(&self) -> Result<Option<String>>;

    /// Wait until an element matching `selector` is present.
    ///
    /// Fails with [`KetterError::GateTimeout`] once `timeout` has elapsed.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Read an attribute of the first element matching `selector`.
    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// The address currently shown by the browser.
    async fn current_url(&self) -> Result<Option<String>>;

    /// Shut the browser down.
    async fn close(&mut self) -> Result<()>;
}

/// Starts browser sessions.
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// How the real link is obtained once the gated page is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStrategy {
    /// Click `reveal`, then read `href` from the element matching `link`.
    Reveal {
        reveal: &'static str,
        link: &'static str,
    },
    /// Let the interstitial navigate away and read the resulting address.
    FollowRedirect,
}

/// Browser session lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPolicy {
    /// A fresh browser for every link.
    PerLink,
    /// One browser shared by every link of a run.
    PerRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    pub name: &'static str,
    pub strategy: GateStrategy,
    pub policy: SessionPolicy,
}

impl Gate {
    /// Sabishare, where NetNaija stores its files.
    pub const SABISHARE: Gate = Gate {
        name: "sabishare",
        strategy: GateStrategy::Reveal {
            reveal: ".download",
            link: ".download-url",
        },
        policy: SessionPolicy::PerLink,
    };

    /// O2tvSeries' captcha interstitial, which redirects to the file.
    pub const O2TV_REDIRECT: Gate = Gate {
        name: "o2tvseries",
        strategy: GateStrategy::FollowRedirect,
        policy: SessionPolicy::PerRun,
    };
}

/// Resolves candidate links through a gate.
pub struct GateResolver<'a> {
    launcher: &'a dyn SessionLauncher,
    config: &'a GateConfig,
}

impl<'a> GateResolver<'a> {
    pub fn new(launcher: &'a dyn SessionLauncher, config: &'a GateConfig) -> Self {
        Self { launcher, config }
    }

    /// Resolve every link, dropping the ones that fail.
    ///
    /// The batch only fails when no browser could be started at all.
    pub async fn resolve_all(&self, gate: &Gate, links: &[String]) -> Result<Vec<String>> {
        let mut resolved = Vec::new();
        if links.is_empty() {
            return Ok(resolved);
        }

        match gate.policy {
            SessionPolicy::PerLink => {
                let mut launched = 0;
                let mut launch_error = None;

                for link in links {
                    debug!("Launching {} session for {}", gate.name, link);
                    let mut session = match self.launcher.launch().await {
                        Ok(session) => session,
                        Err(e) => {
                            error!("Dropping {}: {} session failed to start: {}", link, gate.name, e);
                            launch_error.get_or_insert(e);
                            continue;
                        }
                    };
                    launched += 1;

                    let outcome = self.resolve_one(session.as_ref(), gate, link).await;
                    close_session(session.as_mut(), gate).await;
                    keep_outcome(&mut resolved, gate, link, outcome);
                }

                if let (0, Some(e)) = (launched, launch_error) {
                    return Err(e);
                }
            }
            SessionPolicy::PerRun => {
                debug!("Launching shared {} session", gate.name);
                let mut session = self.launcher.launch().await?;
                for link in links {
                    let outcome = self.resolve_one(session.as_ref(), gate, link).await;
                    keep_outcome(&mut resolved, gate, link, outcome);
                }
                close_session(session.as_mut(), gate).await;
            }
        }

        Ok(resolved)
    }

    async fn resolve_one(
        &self,
        session: &dyn BrowserSession,
        gate: &Gate,
        link: &str,
    ) -> Result<Option<String>> {
        session.navigate(link).await?;

        match gate.strategy {
            GateStrategy::Reveal { reveal, link: target } => {
                if session
                    .title()
                    .await?
                    .is_some_and(|title| title.contains("404"))
                {
                    warn!("{} page not found: {}", gate.name, link);
                    return Ok(None);
                }

                // The reveal control is sometimes already gone; the link may still be there.
                match session.wait_for(reveal, self.config.wait_timeout()).await {
                    Ok(()) => {
                        debug!("Clicking {}", reveal);
                        session.click(reveal).await?;
                    }
                    Err(e) => error!("Reveal control not found: {}", e),
                }

                session.wait_for(target, self.config.wait_timeout()).await?;
                session.attribute(target, "href").await
            }
            GateStrategy::FollowRedirect => self.await_redirect(session, link).await.map(Some),
        }
    }

    async fn await_redirect(&self, session: &dyn BrowserSession, link: &str) -> Result<String> {
        let deadline = tokio::time::Instant::now() + self.config.wait_timeout();

        loop {
            if let Some(current) = session.current_url().await? {
                if !same_address(&current, link) {
                    return Ok(current);
                }
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(KetterError::GateTimeout {
                    selector: "redirect".to_string(),
                    url: link.to_string(),
                });
            }

            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }
}

fn same_address(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

fn keep_outcome(
    resolved: &mut Vec<String>,
    gate: &Gate,
    link: &str,
    outcome: Result<Option<String>>,
) {
    match outcome {
        Ok(Some(url)) => {
            debug!("{} resolved {} -> {}", gate.name, link, url);
            resolved.push(url);
        }
        Ok(None) => warn!("{} gave no download link for {}", gate.name, link),
        Err(e) => error!("Dropping {}: {}", link, e),
    }
}

async fn close_session(session: &mut dyn BrowserSession, gate: &Gate) {
    debug!("Closing {} session", gate.name);
    if let Err(e) = session.close().await {
        warn!("Failed to close {} session: {}", gate.name, e);
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::testing::*;
    use super::*;

    fn fast_config() -> GateConfig {
        GateConfig {
            wait_timeout_secs: 0,
            poll_interval_ms: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_reveal_reads_link_after_click() {
        let launcher = ScriptedLauncher::new(HashMap::from([(
            "https://www.sabishare.com/file/a".to_string(),
            sabishare_page("https://cdn.sabishare.com/a.mp4"),
        )]));
        let config = fast_config();
        let resolver = GateResolver::new(&launcher, &config);

        let links = resolver
            .resolve_all(&Gate::SABISHARE, &["https://www.sabishare.com/file/a".to_string()])
            .await
            .unwrap();

        assert_eq!(links, vec!["https://cdn.sabishare.com/a.mp4"]);
    }

    #[tokio::test]
    async fn test_per_link_policy_launches_and_closes_each_time() {
        let launcher = ScriptedLauncher::new(HashMap::from([
            ("https://s/a".to_string(), sabishare_page("https://cdn/a.mp4")),
            ("https://s/b".to_string(), sabishare_page("https://cdn/b.mp4")),
        ]));
        let config = fast_config();
        let resolver = GateResolver::new(&launcher, &config);

        let links = resolver
            .resolve_all(
                &Gate::SABISHARE,
                &["https://s/a".to_string(), "https://s/b".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(links, vec!["https://cdn/a.mp4", "https://cdn/b.mp4"]);
        assert_eq!(launcher.launches(), 2);
        assert_eq!(launcher.closes(), 2);
    }

    #[tokio::test]
    async fn test_timeout_drops_only_that_link() {
        let mut broken = sabishare_page("https://cdn/never.mp4");
        broken.revealed = None;
        let launcher = ScriptedLauncher::new(HashMap::from([
            ("https://s/a".to_string(), broken),
            ("https://s/b".to_string(), sabishare_page("https://cdn/b.mp4")),
        ]));
        let config = fast_config();
        let resolver = GateResolver::new(&launcher, &config);

        let links = resolver
            .resolve_all(
                &Gate::SABISHARE,
                &["https://s/a".to_string(), "https://s/b".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(links, vec!["https://cdn/b.mp4"]);
        assert_eq!(launcher.closes(), 2);
    }

    #[tokio::test]
    async fn test_failed_launch_drops_only_that_link() {
        let launcher = ScriptedLauncher::new(HashMap::from([
            ("https://s/a".to_string(), sabishare_page("https://cdn/a.mp4")),
            ("https://s/b".to_string(), sabishare_page("https://cdn/b.mp4")),
            ("https://s/c".to_string(), sabishare_page("https://cdn/c.mp4")),
        ]))
        .failing_on(&[2]);
        let config = fast_config();
        let resolver = GateResolver::new(&launcher, &config);

        let links = resolver
            .resolve_all(
                &Gate::SABISHARE,
                &[
                    "https://s/a".to_string(),
                    "https://s/b".to_string(),
                    "https://s/c".to_string(),
                ],
            )
            .await
            .unwrap();

        assert_eq!(links, vec!["https://cdn/a.mp4", "https://cdn/c.mp4"]);
        assert_eq!(launcher.launches(), 3);
        assert_eq!(launcher.closes(), 2);
    }

    #[tokio::test]
    async fn test_no_browser_at_all_is_an_error() {
        let launcher = ScriptedLauncher::new(HashMap::new()).failing_on(&[1, 2]);
        let config = fast_config();
        let resolver = GateResolver::new(&launcher, &config);

        let result = resolver
            .resolve_all(
                &Gate::SABISHARE,
                &["https://s/a".to_string(), "https://s/b".to_string()],
            )
            .await;

        assert!(matches!(result, Err(KetterError::Browser(_))));
    }

    #[tokio::test]
    async fn test_shared_session_that_never_starts_is_an_error() {
        let launcher = ScriptedLauncher::new(HashMap::new()).failing_on(&[1]);
        let config = fast_config();
        let resolver = GateResolver::new(&launcher, &config);

        let result = resolver
            .resolve_all(&Gate::O2TV_REDIRECT, &["https://o2/d/1".to_string()])
            .await;

        assert!(matches!(result, Err(KetterError::Browser(_))));
    }

    #[tokio::test]
    async fn test_not_found_page_is_skipped() {
        let mut missing = sabishare_page("https://cdn/a.mp4");
        missing.title = "404 - Not Found".into();
        let launcher = ScriptedLauncher::new(HashMap::from([("https://s/a".to_string(), missing)]));
        let config = fast_config();
        let resolver = GateResolver::new(&launcher, &config);

        let links = resolver
            .resolve_all(&Gate::SABISHARE, &["https://s/a".to_string()])
            .await
            .unwrap();

        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_redirect_shares_one_session() {
        let launcher = ScriptedLauncher::new(HashMap::from([
            ("https://o2/d/1".to_string(), redirect_page("https://files/1.mp4")),
            ("https://o2/d/2".to_string(), redirect_page("https://files/2.mp4")),
        ]));
        let config = fast_config();
        let resolver = GateResolver::new(&launcher, &config);

        let links = resolver
            .resolve_all(
                &Gate::O2TV_REDIRECT,
                &["https://o2/d/1".to_string(), "https://o2/d/2".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(links, vec!["https://files/1.mp4", "https://files/2.mp4"]);
        assert_eq!(launcher.launches(), 1);
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_redirect_that_never_leaves_times_out() {
        let launcher = ScriptedLauncher::new(HashMap::new());
        let config = fast_config();
        let resolver = GateResolver::new(&launcher, &config);

        let links = resolver
            .resolve_all(&Gate::O2TV_REDIRECT, &["https://o2/d/1".to_string()])
            .await
            .unwrap();

        assert!(links.is_empty());
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_no_links_launches_nothing() {
        let launcher = ScriptedLauncher::new(HashMap::new());
        let config = fast_config();
        let resolver = GateResolver::new(&launcher, &config);

        let links = resolver.resolve_all(&Gate::O2TV_REDIRECT, &[]).await.unwrap();

        assert!(links.is_empty());
        assert_eq!(launcher.launches(), 0);
    }
}
