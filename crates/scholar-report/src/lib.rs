//! Descriptive summaries over scraped results.
//!
//! Everything here is pure: callers load rows from the store and receive
//! plain data ready for a chart renderer (keyword frequencies, a lexicon
//! sentiment split, a publication-year histogram and per-topic trends).

pub mod report;
pub mod scorer;
pub mod timeline;
pub mod words;

pub use report::{build_report, Report, TOP_WORD_LIMIT};
pub use scorer::{classify, lexicon_score, SentimentCounts, SentimentLabel};
pub use timeline::{topic_trends, year_histogram, TopicSeries, TopicTrends, YearCount};
pub use words::{clean_text, keywords, top_words, WordCount};
