use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the browser sessions that pass through gated pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Whether to run the browser in headless mode (default: false)
    pub headless: bool,

    /// Open every session in an incognito context (default: true)
    pub incognito: bool,

    /// Accept self-signed or expired certificates on file hosts (default: true)
    pub ignore_certificate_errors: bool,

    /// How long to wait for a gate element to appear, in seconds (default: 5)
    pub wait_timeout_secs: u64,

    /// Delay between element lookups while waiting, in milliseconds (default: 250)
    pub poll_interval_ms: u64,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            headless: false,
            incognito: true,
            ignore_certificate_errors: true,
            wait_timeout_secs: 5,
            poll_interval_ms: 250,
            user_agent: None,
        }
    }
}

impl GateConfig {
    /// Get the element wait budget as a Duration
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// Get the polling interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
