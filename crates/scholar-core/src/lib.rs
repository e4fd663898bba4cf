pub mod app_config;
pub mod config;
pub mod record;
pub mod request;
pub mod topics;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use record::{NewResultRecord, NOT_AVAILABLE, TITLE_NOT_FOUND};
pub use request::{RequestError, ScrapeRequest, Topic};
pub use topics::{load_topics, SearchDefaults, TopicsFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read topics file {path}: {source}")]
    TopicsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse topics file: {0}")]
    TopicsFileParse(#[source] serde_yaml::Error),

    #[error("invalid topics file: {0}")]
    Validation(String),
}
