use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::request::Topic;
use crate::ConfigError;

/// Default values pre-filled in the search form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDefaults {
    #[serde(default = "default_year_start")]
    pub year_start: i32,
    #[serde(default = "default_year_end")]
    pub year_end: i32,
    #[serde(default = "default_min_results")]
    pub min_results: u32,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            year_start: default_year_start(),
            year_end: default_year_end(),
            min_results: default_min_results(),
        }
    }
}

fn default_year_start() -> i32 {
    2024
}

fn default_year_end() -> i32 {
    2025
}

fn default_min_results() -> u32 {
    50
}

/// The candidate topic list callers choose from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicsFile {
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub defaults: SearchDefaults,
}

/// Load and validate the topic catalogue from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_topics(path: &Path) -> Result<TopicsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TopicsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_topics(&content)
}

/// Parse and validate a topic catalogue from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_topics(content: &str) -> Result<TopicsFile, ConfigError> {
    let topics_file: TopicsFile =
        serde_yaml::from_str(content).map_err(ConfigError::TopicsFileParse)?;

    validate_topics(&topics_file)?;

    Ok(topics_file)
}

fn validate_topics(topics_file: &TopicsFile) -> Result<(), ConfigError> {
    if topics_file.topics.is_empty() {
        return Err(ConfigError::Validation(
            "at least one topic must be listed".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for topic in &topics_file.topics {
        let name = topic.as_str().trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "topic name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate topic: '{name}'"
            )));
        }
    }

    let defaults = &topics_file.defaults;
    if defaults.year_start > defaults.year_end {
        return Err(ConfigError::Validation(format!(
            "defaults.year_start {} is after defaults.year_end {}",
            defaults.year_start, defaults.year_end
        )));
    }
    if defaults.min_results == 0 {
        return Err(ConfigError::Validation(
            "defaults.min_results must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
