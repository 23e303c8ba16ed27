//! Configuration management for ketter.
//!
//! Configuration is read from `~/.config/ketter/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::gate::GateConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub gate: GateConfig,
    pub output: OutputConfig,
}

/// Settings for the plain HTTP session used while walking index pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent sent with every request
    pub user_agent: String,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Accept-Language header (default: "en")
    pub accept_language: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: 30,
            accept_language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File the resolved links are written to (default: urls.txt)
    pub file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("urls.txt"),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating it if missing.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/ketter/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("ketter").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# ketter configuration

[http]
# User agent sent while walking season and episode pages
user_agent = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"

# Request timeout in seconds
timeout_secs = 30

# Accept-Language header
accept_language = "en"

[gate]
# Run the browser without a visible window.
# Some file hosts refuse headless browsers, so this is off by default.
headless = false

# Open every browser session in incognito mode
incognito = true

# Accept invalid TLS certificates on file hosts
ignore_certificate_errors = true

# Seconds to wait for a download button or link to appear
wait_timeout_secs = 5

# Milliseconds between checks while waiting
poll_interval_ms = 250

[output]
# Resolved links are written here, one per line
file = "urls.txt"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
