//! Read-only views over the stored collection and the topic catalogue.

use chrono::{Datelike, Utc};
use scholar_core::TopicsFile;
use scholar_report::Report;

use crate::scrape::truncate;

/// Print the newest `limit` results.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_results(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let rows = scholar_db::list_recent_results(pool, limit).await?;

    if rows.is_empty() {
        println!("no results stored; run `scrape` first");
        return Ok(());
    }

    println!("{:<8}{:<6}{:<28}TITLE", "ID", "YEAR", "TOPIC");
    for row in &rows {
        let year = row
            .publication_year
            .map_or_else(|| "-".to_string(), |y| y.to_string());
        println!(
            "{:<8}{:<6}{:<28}{}",
            row.id,
            year,
            truncate(&row.term, 25),
            truncate(&row.title, 60)
        );
    }

    Ok(())
}

/// Print the collection report, as text or JSON.
///
/// # Errors
///
/// Returns an error if the database query or JSON encoding fails.
pub(crate) async fn run_report(pool: &sqlx::PgPool, json: bool) -> anyhow::Result<()> {
    let rows = scholar_db::list_all_results(pool).await?;
    let report = scholar_report::build_report(&rows, Utc::now().year());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report {
        Some(report) => print_report(&report),
        None => println!("no results stored; run `scrape` first"),
    }
    Ok(())
}

fn print_report(report: &Report) {
    println!("records: {}", report.total_records);

    println!();
    println!("top words:");
    for entry in &report.top_words {
        println!("  {:<24}{:>6}", entry.word, entry.count);
    }

    println!();
    println!(
        "sentiment: {} positive, {} negative, {} neutral",
        report.sentiment.positive, report.sentiment.negative, report.sentiment.neutral
    );

    println!();
    println!("publications per year:");
    for bucket in &report.years {
        println!("  {}{:>8}", bucket.year, bucket.count);
    }

    if let Some(trends) = &report.topic_trends {
        println!();
        let years: Vec<String> = trends.years.iter().map(ToString::to_string).collect();
        println!("{:<30}{}", "TOPIC", years.join("  "));
        for series in &trends.series {
            let counts: Vec<String> = series.counts.iter().map(|c| format!("{c:>4}")).collect();
            println!("{:<30}{}", truncate(&series.topic, 27), counts.join("  "));
        }
    }
}

pub(crate) fn run_topics(catalogue: &TopicsFile) {
    let defaults = &catalogue.defaults;
    println!(
        "defaults: years {}-{}, {} results per topic",
        defaults.year_start, defaults.year_end, defaults.min_results
    );
    for topic in &catalogue.topics {
        println!("  {topic}");
    }
}
