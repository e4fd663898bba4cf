use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let optional_path = |var: &str| -> Option<PathBuf> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("SCHOLAR_ENV", "development"))?;
    let bind_addr = parse_addr("SCHOLAR_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("SCHOLAR_LOG_LEVEL", "info");
    let topics_path = PathBuf::from(or_default("SCHOLAR_TOPICS_PATH", "./config/topics.yaml"));

    let db_max_connections = parse_u32("SCHOLAR_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("SCHOLAR_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SCHOLAR_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let search_base_url = or_default(
        "SCHOLAR_SEARCH_BASE_URL",
        "https://scholar.google.com.br/scholar",
    );
    let browser_headless = parse_bool("SCHOLAR_BROWSER_HEADLESS", "true")?;
    let chrome_path = optional_path("SCHOLAR_CHROME_PATH");
    let edge_path = optional_path("SCHOLAR_EDGE_PATH");
    let page_settle_ms = parse_u64("SCHOLAR_PAGE_SETTLE_MS", "3000")?;
    let page_delay_ms = parse_u64("SCHOLAR_PAGE_DELAY_MS", "2000")?;
    let topic_delay_ms = parse_u64("SCHOLAR_TOPIC_DELAY_MS", "2000")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        topics_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        search_base_url,
        browser_headless,
        chrome_path,
        edge_path,
        page_settle_ms,
        page_delay_ms,
        topic_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SCHOLAR_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
