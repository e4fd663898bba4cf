//! Foreground scrape runs.
//!
//! The run goes through the same background service the HTTP server uses;
//! this command simply follows its progress and waits for the summary.

use scholar_core::{AppConfig, ScrapeRequest, Topic, TopicsFile};
use scholar_scraper::{DefaultScrapeService, ProgressHandle, RunSummary};

/// Assemble a request from command-line flags, filling gaps from the
/// catalogue defaults.
///
/// # Errors
///
/// Returns an error if no topic was given (and `all_topics` is unset) or
/// the resulting request is invalid.
pub(crate) fn build_request(
    catalogue: &TopicsFile,
    topics: Vec<String>,
    all_topics: bool,
    year_start: Option<i32>,
    year_end: Option<i32>,
    min_results: Option<u32>,
) -> anyhow::Result<ScrapeRequest> {
    let topics: Vec<Topic> = if all_topics {
        catalogue.topics.clone()
    } else {
        topics.into_iter().map(Topic::from).collect()
    };
    let defaults = &catalogue.defaults;

    let request = ScrapeRequest::new(
        topics,
        year_start.unwrap_or(defaults.year_start),
        year_end.unwrap_or(defaults.year_end),
        min_results.unwrap_or(defaults.min_results),
    )?;
    Ok(request)
}

/// Run `request` to completion and print a per-topic summary.
///
/// # Errors
///
/// Returns an error if the service cannot be built, the task panics, or the
/// run ends in the `error` state. Rows committed before a failure stay in
/// the store.
pub(crate) async fn run_scrape(
    pool: sqlx::PgPool,
    config: &AppConfig,
    request: ScrapeRequest,
) -> anyhow::Result<()> {
    let service = DefaultScrapeService::from_app_config(config, pool)?;
    let progress = service.progress();

    tracing::info!(
        topics = request.topics.len(),
        year_start = request.year_start,
        year_end = request.year_end,
        "starting foreground scrape"
    );
    let run = service.start(request)?;
    let follower = tokio::spawn(follow_progress(progress));
    let summary = run.await?;
    follower.await?;

    print_summary(&summary);
    if let Some(error) = summary.error {
        anyhow::bail!("scrape run failed: {error}");
    }
    Ok(())
}

/// Print a line whenever the status or current topic changes, until the
/// run reaches a terminal state.
async fn follow_progress(mut progress: ProgressHandle) {
    let mut last = None;
    while let Some(state) = progress.changed().await {
        let key = (state.status.clone(), state.current_topic.clone());
        if last.as_ref() != Some(&key) {
            match &state.current_topic {
                Some(topic) => println!(
                    "[{:>5.1}%] {} ({topic})",
                    state.percent_complete, state.status
                ),
                None => println!("[{:>5.1}%] {}", state.percent_complete, state.status),
            }
            last = Some(key);
        }
        if state.status.is_terminal() {
            break;
        }
    }
}

fn print_summary(summary: &RunSummary) {
    if summary.topics.is_empty() {
        println!("no topics scraped");
        return;
    }

    println!();
    println!("{:<40}{:>10}{:>8}  STOP", "TOPIC", "RECORDS", "PAGES");
    for outcome in &summary.topics {
        println!(
            "{:<40}{:>10}{:>8}  {}",
            truncate(outcome.topic.as_str(), 38),
            outcome.collected,
            outcome.pages_fetched,
            outcome.stop
        );
    }
    println!("total records: {}", summary.total_collected);
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}
