//! HTML field extraction for search result pages.
//!
//! A result page is a list of result blocks. Each block carries four fields
//! that are read independently: a failure on one (missing element, empty
//! text) leaves that field `None` and never affects the others or the block.
//!
//! [`find_result_blocks`] is synchronous: `scraper::Html` is not `Send`, so
//! the document must be parsed and dropped between two `.await` points.

use std::sync::LazyLock;

use regex::Regex;
use scholar_core::{NewResultRecord, Topic, NOT_AVAILABLE};
use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(20\d{2})").expect("valid year regex"));

const BYLINE_SEPARATOR: &str = " - ";

/// CSS selectors for the parts of a result block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSelectors {
    /// One match per result block.
    pub block: String,
    /// Title anchor inside a block; its `href` is the article URL.
    pub title_link: String,
    /// Title heading used when the anchor is absent.
    pub title: String,
    pub byline: String,
    pub snippet: String,
}

impl Default for ResultSelectors {
    fn default() -> Self {
        Self {
            block: "div.gs_ri".to_string(),
            title_link: "h3 a".to_string(),
            title: "h3".to_string(),
            byline: "div.gs_a".to_string(),
            snippet: "div.gs_rs".to_string(),
        }
    }
}

/// [`ResultSelectors`] parsed once, reused for every page.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    block: Selector,
    title_link: Selector,
    title: Selector,
    byline: Selector,
    snippet: Selector,
}

impl CompiledSelectors {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] naming the first selector
    /// that fails to parse.
    pub fn compile(selectors: &ResultSelectors) -> Result<Self, ScraperError> {
        Ok(Self {
            block: parse_selector(&selectors.block)?,
            title_link: parse_selector(&selectors.title_link)?,
            title: parse_selector(&selectors.title)?,
            byline: parse_selector(&selectors.byline)?,
            snippet: parse_selector(&selectors.snippet)?,
        })
    }
}

fn parse_selector(raw: &str) -> Result<Selector, ScraperError> {
    Selector::parse(raw).map_err(|e| ScraperError::InvalidSelector {
        selector: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Raw fields of one result block, as found on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultBlock {
    pub title: Option<String>,
    pub link: Option<String>,
    pub byline: Option<String>,
    pub snippet: Option<String>,
}

/// Fields parsed out of a byline such as
/// `"A Silva, B Souza - Journal of Physics, 2024 - iopscience.org"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Byline {
    pub year: Option<i32>,
    pub authors: String,
    pub source: String,
}

/// Extract every result block on a page, in document order.
///
/// Returns an empty vector when the page has no blocks, which callers treat
/// as "no more results".
#[must_use]
pub fn find_result_blocks(html: &str, selectors: &CompiledSelectors) -> Vec<ResultBlock> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.block)
        .map(|block| read_block(block, selectors))
        .collect()
}

fn read_block(block: ElementRef<'_>, selectors: &CompiledSelectors) -> ResultBlock {
    let (title, link) = match block.select(&selectors.title_link).next() {
        Some(anchor) => (
            element_text(anchor),
            anchor
                .value()
                .attr("href")
                .map(str::trim)
                .filter(|href| !href.is_empty())
                .map(str::to_string),
        ),
        None => (extract_field(block, &selectors.title), None),
    };

    ResultBlock {
        title,
        link,
        byline: extract_field(block, &selectors.byline),
        snippet: extract_field(block, &selectors.snippet),
    }
}

/// Text of the first element under `block` matching `selector`, with
/// whitespace collapsed. `None` when nothing matches or the text is blank.
#[must_use]
pub fn extract_field(block: ElementRef<'_>, selector: &Selector) -> Option<String> {
    block.select(selector).next().and_then(element_text)
}

fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

/// Split a byline into publication year, authors and source.
///
/// The year is the first `20xx` in the text. Authors are everything before
/// the first `" - "`, source the segment after it. Without a separator the
/// whole text is taken as authors and the source is `"N/A"`.
#[must_use]
pub fn parse_byline(text: &str) -> Byline {
    let year = YEAR_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok());

    let mut parts = text.split(BYLINE_SEPARATOR);
    let authors = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string();
    let source = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string();

    Byline {
        year,
        authors,
        source,
    }
}

/// Turn a raw block into a storable record, substituting sentinels for
/// every missing field.
#[must_use]
pub fn build_record(term: &Topic, block: ResultBlock) -> NewResultRecord {
    let mut record = NewResultRecord::placeholder(term.clone());

    if let Some(title) = block.title {
        record.title = title;
    }
    record.article_url = block.link;
    record.abstract_text = block.snippet;

    if let Some(byline) = block.byline.as_deref().map(parse_byline) {
        record.publication_year = byline.year;
        record.authors = byline.authors;
        record.source = byline.source;
    }

    record
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
