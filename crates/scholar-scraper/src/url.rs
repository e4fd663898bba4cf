//! Result-page URL construction.
//!
//! Pages are addressed by offset: page `n` starts at result `n * RESULTS_PER_PAGE`.
//!
//! ```text
//! <base>?q=quantum+cryptography&as_ylo=2024&as_yhi=2025&start=20
//! ```

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use scholar_core::Topic;

/// Number of result blocks the search engine renders per page.
pub const RESULTS_PER_PAGE: u32 = 10;

/// Hard ceiling on pages fetched for a single topic.
pub const MAX_PAGES_PER_TOPIC: u32 = 10;

/// Encode a topic as a query value: each whitespace-separated word is
/// percent-encoded and the words are joined with `+`.
#[must_use]
pub fn encode_query(topic: &Topic) -> String {
    topic
        .as_str()
        .split_whitespace()
        .map(|word| utf8_percent_encode(word, NON_ALPHANUMERIC).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Build the URL for one result page of `topic` restricted to a year range.
#[must_use]
pub fn page_url(
    base_url: &str,
    topic: &Topic,
    year_start: i32,
    year_end: i32,
    page_index: u32,
) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!(
        "{base_url}{separator}q={query}&as_ylo={year_start}&as_yhi={year_end}&start={start}",
        query = encode_query(topic),
        start = page_index * RESULTS_PER_PAGE,
    )
}
