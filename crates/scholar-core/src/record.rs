//! The bibliographic record produced for every parsed result block.

use serde::Serialize;

use crate::request::Topic;

/// Sentinel stored for authors/source when the byline could not be read.
pub const NOT_AVAILABLE: &str = "N/A";

/// Sentinel stored as the title when no heading was found in the block.
pub const TITLE_NOT_FOUND: &str = "Title not found";

/// A result record ready to be inserted.
///
/// `term` and `title` are always populated. Every other field has already
/// been degraded to its sentinel or `None` by the extractor, so inserting a
/// `NewResultRecord` never fails on missing data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewResultRecord {
    pub term: Topic,
    pub title: String,
    pub publication_year: Option<i32>,
    pub authors: String,
    pub source: String,
    pub abstract_text: Option<String>,
    pub article_url: Option<String>,
}

impl NewResultRecord {
    /// A record with every optional field at its sentinel value.
    #[must_use]
    pub fn placeholder(term: Topic) -> Self {
        Self {
            term,
            title: TITLE_NOT_FOUND.to_string(),
            publication_year: None,
            authors: NOT_AVAILABLE.to_string(),
            source: NOT_AVAILABLE.to_string(),
            abstract_text: None,
            article_url: None,
        }
    }
}
