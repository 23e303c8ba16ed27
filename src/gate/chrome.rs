use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::{KetterError, Result};
use crate::gate::config::GateConfig;
use crate::gate::{BrowserSession, SessionLauncher};

/// Launches Chrome/Chromium sessions via chromiumoxide
pub struct ChromeLauncher {
    config: GateConfig,
}

impl ChromeLauncher {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let session = ChromeSession::launch(&self.config).await?;
        Ok(Box::new(session))
    }
}

/// One browser process with a single tab
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    poll_interval: Duration,
}

impl ChromeSession {
    /// Start a browser with the given configuration
    pub async fn launch(config: &GateConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if config.incognito {
            builder = builder.arg("--incognito");
        }

        if config.ignore_certificate_errors {
            builder = builder.arg("--ignore-certificate-errors");
        }

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| KetterError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            KetterError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Drive the CDP connection until the browser goes away
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| KetterError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| KetterError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        Ok(Self {
            browser,
            page,
            handler,
            poll_interval: config.poll_interval(),
        })
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| KetterError::Browser(format!("Navigation to {} failed: {}", url, e)))?;
        Ok(())
    }

    async fn title(&self) -> Result<Option<String>> {
        self.page
            .get_title()
            .await
            .map_err(|e| KetterError::Browser(format!("Failed to read title: {}", e)))
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }

            if tokio::time::Instant::now() >= deadline {
                let url = self.current_url().await?.unwrap_or_default();
                return Err(KetterError::GateTimeout {
                    selector: selector.to_string(),
                    url,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| KetterError::Browser(format!("Element {} not found: {}", selector, e)))?;

        element
            .click()
            .await
            .map_err(|e| KetterError::Browser(format!("Failed to click {}: {}", selector, e)))?;
        Ok(())
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| KetterError::Browser(format!("Element {} not found: {}", selector, e)))?;

        element.attribute(name).await.map_err(|e| {
            KetterError::Browser(format!("Failed to read {} of {}: {}", name, selector, e))
        })
    }

    async fn current_url(&self) -> Result<Option<String>> {
        self.page
            .url()
            .await
            .map_err(|e| KetterError::Browser(format!("Failed to read address: {}", e)))
    }

    async fn close(&mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| KetterError::Browser(format!("Failed to close browser: {}", e)))?;
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        Ok(())
    }
}
