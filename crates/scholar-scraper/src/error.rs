use scholar_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("browser error: {0}")]
    Browser(String),

    #[error("invalid browser configuration for {backend}: {reason}")]
    BrowserConfig { backend: String, reason: String },

    #[error("no browser available (install Chrome or Edge)")]
    NoBrowserAvailable,

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("invalid CSS selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("result store error: {0}")]
    Store(#[from] DbError),
}

impl From<chromiumoxide::error::CdpError> for ScraperError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Browser(err.to_string())
    }
}
