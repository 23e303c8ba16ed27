use thiserror::Error;

#[derive(Error, Debug)]
pub enum KetterError {
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Unsupported site: {0}")]
    UnsupportedSite(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timed out waiting for '{selector}' on {url}")]
    GateTimeout { selector: String, url: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, KetterError>;
