use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A search query representing one research theme to crawl.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Topic {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("no topics selected")]
    NoTopics,

    #[error("topic at position {0} is blank")]
    BlankTopic(usize),

    #[error("year_start {start} is after year_end {end}")]
    InvalidYearRange { start: i32, end: i32 },

    #[error("min_results must be greater than zero")]
    ZeroMinResults,
}

/// Parameters for one scrape run.
///
/// Built through [`ScrapeRequest::new`], which enforces that at least one
/// topic is present, `year_start <= year_end`, and `min_results_per_topic > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeRequest {
    pub topics: Vec<Topic>,
    pub year_start: i32,
    pub year_end: i32,
    pub min_results_per_topic: u32,
}

impl ScrapeRequest {
    /// # Errors
    ///
    /// Returns [`RequestError`] when any invariant is violated. Topics are
    /// checked first so an empty selection is always reported as
    /// [`RequestError::NoTopics`].
    pub fn new(
        topics: Vec<Topic>,
        year_start: i32,
        year_end: i32,
        min_results_per_topic: u32,
    ) -> Result<Self, RequestError> {
        if topics.is_empty() {
            return Err(RequestError::NoTopics);
        }
        if let Some(idx) = topics.iter().position(|t| t.as_str().trim().is_empty()) {
            return Err(RequestError::BlankTopic(idx));
        }
        if year_start > year_end {
            return Err(RequestError::InvalidYearRange {
                start: year_start,
                end: year_end,
            });
        }
        if min_results_per_topic == 0 {
            return Err(RequestError::ZeroMinResults);
        }

        Ok(Self {
            topics,
            year_start,
            year_end,
            min_results_per_topic,
        })
    }
}
