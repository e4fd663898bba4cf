//! Chart data derived from the stored collection.

use scholar_db::ResultRow;
use serde::Serialize;

use crate::scorer::{classify, SentimentCounts};
use crate::timeline::{topic_trends, year_histogram, TopicTrends, YearCount};
use crate::words::{top_words, WordCount};

/// Number of keywords in the frequency chart.
pub const TOP_WORD_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub total_records: usize,
    pub top_words: Vec<WordCount>,
    pub sentiment: SentimentCounts,
    pub years: Vec<YearCount>,
    pub topic_trends: Option<TopicTrends>,
}

/// Derive every chart from `rows`. Returns `None` for an empty collection.
///
/// `current_year` bounds the year histogram and trends from above.
#[must_use]
pub fn build_report(rows: &[ResultRow], current_year: i32) -> Option<Report> {
    if rows.is_empty() {
        return None;
    }

    let texts: Vec<String> = rows
        .iter()
        .map(|row| format!("{} {}", row.title, row.abstract_text.as_deref().unwrap_or("")))
        .collect();
    let top_words = top_words(texts.iter().map(String::as_str), TOP_WORD_LIMIT);

    let mut sentiment = SentimentCounts::default();
    for row in rows {
        sentiment.record(classify(row.abstract_text.as_deref()));
    }

    let years = year_histogram(rows.iter().map(|row| row.publication_year), current_year);
    let topic_trends = topic_trends(
        rows.iter().map(|row| (row.term.as_str(), row.publication_year)),
        current_year,
    );

    tracing::debug!(
        records = rows.len(),
        words = top_words.len(),
        years = years.len(),
        "report built"
    );

    Some(Report {
        total_records: rows.len(),
        top_words,
        sentiment,
        years,
        topic_trends,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        id: i64,
        term: &str,
        title: &str,
        abstract_text: Option<&str>,
        year: Option<i32>,
    ) -> ResultRow {
        ResultRow {
            id,
            term: term.to_string(),
            title: title.to_string(),
            publication_year: year,
            authors: Some("N/A".to_string()),
            source: Some("N/A".to_string()),
            abstract_text: abstract_text.map(str::to_string),
            article_url: None,
            inserted_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn empty_collection_has_no_report() {
        assert!(build_report(&[], 2026).is_none());
    }

    #[test]
    fn report_combines_every_section() {
        let rows = vec![
            row(1, "crypto", "Lattice signatures", Some("Um método eficiente"), Some(2024)),
            row(2, "crypto", "Lattice attacks", Some("Os riscos e desafios"), Some(2025)),
            row(3, "chem", "Molecular simulation", None, None),
        ];

        let report = build_report(&rows, 2026).expect("report");
        assert_eq!(report.total_records, 3);
        assert_eq!(report.top_words[0].word, "lattice");
        assert_eq!(report.top_words[0].count, 2);
        assert_eq!(
            report.sentiment,
            SentimentCounts {
                positive: 1,
                negative: 1,
                neutral: 1
            }
        );
        assert_eq!(report.years.len(), 2);

        let trends = report.topic_trends.expect("trends");
        assert_eq!(trends.years, vec![2024, 2025]);
        assert_eq!(trends.series[0].topic, "crypto");
        assert_eq!(trends.series[0].counts, vec![1, 1]);
        assert_eq!(trends.series[1].topic, "chem");
        assert_eq!(trends.series[1].counts, vec![0, 0]);
    }

    #[test]
    fn undated_collection_has_no_trends() {
        let rows = vec![row(1, "a", "t", None, None)];
        let report = build_report(&rows, 2026).expect("report");
        assert!(report.years.is_empty());
        assert!(report.topic_trends.is_none());
    }

    #[test]
    fn report_serializes_sections() {
        let rows = vec![row(1, "a", "Qubit", None, Some(2024))];
        let json = serde_json::to_value(build_report(&rows, 2026)).expect("serialize");
        assert_eq!(json["total_records"], 1);
        assert_eq!(json["sentiment"]["neutral"], 1);
        assert_eq!(json["years"][0]["year"], 2024);
        assert_eq!(json["top_words"][0]["word"], "qubit");
    }
}
