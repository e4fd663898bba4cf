use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub topics_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Search endpoint the page URLs are built against.
    pub search_base_url: String,
    pub browser_headless: bool,
    /// Explicit Chrome/Chromium binary; auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
    /// Explicit Microsoft Edge binary; auto-detected when `None`.
    pub edge_path: Option<PathBuf>,
    pub page_settle_ms: u64,
    pub page_delay_ms: u64,
    pub topic_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("topics_path", &self.topics_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("search_base_url", &self.search_base_url)
            .field("browser_headless", &self.browser_headless)
            .field("chrome_path", &self.chrome_path)
            .field("edge_path", &self.edge_path)
            .field("page_settle_ms", &self.page_settle_ms)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("topic_delay_ms", &self.topic_delay_ms)
            .finish()
    }
}
