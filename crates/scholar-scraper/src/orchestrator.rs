//! The topic/page scraping loop.
//!
//! For every topic in request order, result pages are fetched from offset 0
//! upwards until one of these holds (checked in this order):
//!
//! 1. the page contains no result blocks,
//! 2. the topic has collected `min_results_per_topic` records,
//! 3. [`MAX_PAGES_PER_TOPIC`] pages have been fetched.
//!
//! Failures are classified rather than caught wholesale. A browser or
//! navigation error abandons the current topic and the next one runs. A store
//! error ends the run. Either way the session and the store are closed.

use std::fmt;
use std::time::Duration;

use scholar_core::{AppConfig, ScrapeRequest, Topic};
use tracing::{debug, error, info, warn};

use crate::driver::{BrowserLauncher, BrowserSession};
use crate::error::ScraperError;
use crate::extract::{build_record, find_result_blocks, CompiledSelectors};
use crate::progress::{ProgressReporter, RunStatus};
use crate::store::ResultStore;
use crate::url::{page_url, MAX_PAGES_PER_TOPIC, RESULTS_PER_PAGE};

/// Percent reported once the browser is up, before the first topic.
pub const BROWSER_READY_PERCENT: f64 = 15.0;

/// Share of the progress bar spread across topics.
const TOPIC_PERCENT_SPAN: f64 = 80.0;

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub base_url: String,
    /// Pause after each page that is followed by another page.
    pub page_delay: Duration,
    /// Pause after each topic.
    pub topic_delay: Duration,
    pub max_pages: u32,
}

impl ScrapeSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.search_base_url.clone(),
            page_delay: Duration::from_millis(config.page_delay_ms),
            topic_delay: Duration::from_millis(config.topic_delay_ms),
            max_pages: MAX_PAGES_PER_TOPIC,
        }
    }
}

/// Why a topic stopped paginating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    NoMoreResults,
    TargetReached,
    PageLimit,
    Failed(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMoreResults => f.write_str("no more results"),
            Self::TargetReached => f.write_str("target reached"),
            Self::PageLimit => f.write_str("page limit reached"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicOutcome {
    pub topic: Topic,
    pub collected: u32,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub topics: Vec<TopicOutcome>,
    /// Records committed to the store.
    pub total_collected: u32,
    /// Message of the error that ended the run, if any.
    pub error: Option<String>,
}

impl RunSummary {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    fn failed(topics: Vec<TopicOutcome>, total_collected: u32, error: &ScraperError) -> Self {
        Self {
            topics,
            total_collected,
            error: Some(error.to_string()),
        }
    }
}

/// Run-level failure carrying whatever was finished before it.
struct RunAborted {
    topics: Vec<TopicOutcome>,
    total: u32,
    error: ScraperError,
}

pub struct Orchestrator<L> {
    launcher: L,
    selectors: CompiledSelectors,
    settings: ScrapeSettings,
}

impl<L: BrowserLauncher> Orchestrator<L> {
    #[must_use]
    pub fn new(launcher: L, selectors: CompiledSelectors, settings: ScrapeSettings) -> Self {
        Self {
            launcher,
            selectors,
            settings,
        }
    }

    /// Execute one full run, publishing progress as it goes.
    ///
    /// The store is reset only after a browser session has been acquired;
    /// without a browser the run fails and existing rows are left untouched.
    pub async fn run<S: ResultStore>(
        &self,
        request: &ScrapeRequest,
        mut store: S,
        progress: &ProgressReporter,
    ) -> RunSummary {
        info!(
            topics = request.topics.len(),
            year_start = request.year_start,
            year_end = request.year_end,
            min_results = request.min_results_per_topic,
            "scrape run starting"
        );
        progress.set_status(RunStatus::StartingBrowser);

        let mut session = match self.launcher.open_session().await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "could not start a browser session");
                release_store(store).await;
                progress.fail(e.to_string());
                return RunSummary::failed(Vec::new(), 0, &e);
            }
        };
        progress.set_status(RunStatus::BrowserReady);
        progress.set_percent(BROWSER_READY_PERCENT);

        let result = self
            .scrape_topics(request, &mut session, &mut store, progress)
            .await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "failed to close browser session");
        }
        release_store(store).await;

        match result {
            Ok(topics) => {
                let total = topics.iter().map(|t| t.collected).sum();
                info!(total, "scrape run complete");
                progress.finish(total);
                RunSummary {
                    topics,
                    total_collected: total,
                    error: None,
                }
            }
            Err(aborted) => {
                error!(error = %aborted.error, total = aborted.total, "scrape run failed");
                progress.fail(aborted.error.to_string());
                RunSummary::failed(aborted.topics, aborted.total, &aborted.error)
            }
        }
    }

    async fn scrape_topics<B: BrowserSession, S: ResultStore>(
        &self,
        request: &ScrapeRequest,
        session: &mut B,
        store: &mut S,
        progress: &ProgressReporter,
    ) -> Result<Vec<TopicOutcome>, RunAborted> {
        let mut outcomes = Vec::with_capacity(request.topics.len());
        let mut total = 0u32;

        if let Err(error) = store.reset().await {
            return Err(RunAborted {
                topics: outcomes,
                total,
                error,
            });
        }

        for (index, topic) in request.topics.iter().enumerate() {
            progress.begin_topic(topic, topic_percent(index, request.topics.len()));
            info!(topic = %topic, index, "scraping topic");

            match self
                .scrape_topic(topic, request, session, store, progress, &mut total)
                .await
            {
                Ok(outcome) => {
                    info!(
                        topic = %topic,
                        collected = outcome.collected,
                        pages = outcome.pages_fetched,
                        stop = %outcome.stop,
                        "topic finished"
                    );
                    outcomes.push(outcome);
                }
                Err(error) => {
                    return Err(RunAborted {
                        topics: outcomes,
                        total,
                        error,
                    });
                }
            }

            tokio::time::sleep(self.settings.topic_delay).await;
        }

        Ok(outcomes)
    }

    /// Paginate one topic. `Err` is reserved for failures that must end the
    /// run; browser trouble is reported as [`StopReason::Failed`].
    ///
    /// Any insert or commit error is one of those: a store that cannot write
    /// ends the run rather than skipping the record or the topic.
    async fn scrape_topic<B: BrowserSession, S: ResultStore>(
        &self,
        topic: &Topic,
        request: &ScrapeRequest,
        session: &mut B,
        store: &mut S,
        progress: &ProgressReporter,
        total: &mut u32,
    ) -> Result<TopicOutcome, ScraperError> {
        let target = request.min_results_per_topic;
        let mut collected = 0u32;
        let mut page_index = 0u32;
        let mut pages_fetched = 0u32;

        let stop = loop {
            let url = page_url(
                &self.settings.base_url,
                topic,
                request.year_start,
                request.year_end,
                page_index,
            );
            debug!(topic = %topic, page = page_index, %url, "loading result page");

            let html = match load_page(session, &url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(topic = %topic, page = page_index, error = %e, "abandoning topic");
                    break StopReason::Failed(e.to_string());
                }
            };
            pages_fetched += 1;

            let blocks = find_result_blocks(&html, &self.selectors);
            debug!(topic = %topic, page = page_index, blocks = blocks.len(), "result blocks found");
            if blocks.is_empty() {
                info!(topic = %topic, page = page_index, "no more results");
                break StopReason::NoMoreResults;
            }

            // A page never contributes more than one page's worth of records,
            // which bounds a topic at max_pages * RESULTS_PER_PAGE.
            let remaining = (target - collected).min(RESULTS_PER_PAGE);
            let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
            let mut written = 0u32;
            for block in blocks.into_iter().take(remaining) {
                let record = build_record(topic, block);
                store.insert(&record).await?;
                written += 1;
            }
            store.commit_page().await?;

            collected += written;
            *total += written;
            progress.set_total(*total);

            if collected >= target {
                break StopReason::TargetReached;
            }

            page_index += 1;
            if page_index >= self.settings.max_pages {
                info!(topic = %topic, pages = page_index, "page limit reached");
                break StopReason::PageLimit;
            }

            tokio::time::sleep(self.settings.page_delay).await;
        };

        Ok(TopicOutcome {
            topic: topic.clone(),
            collected,
            pages_fetched,
            stop,
        })
    }
}

async fn load_page<B: BrowserSession>(session: &mut B, url: &str) -> Result<String, ScraperError> {
    session.navigate(url).await?;
    session.page_source().await
}

async fn release_store<S: ResultStore>(store: S) {
    if let Err(e) = store.close().await {
        warn!(error = %e, "failed to close result store");
    }
}

/// Progress at the start of topic `index` of `count`.
#[allow(clippy::cast_precision_loss)]
fn topic_percent(index: usize, count: usize) -> f64 {
    if count == 0 {
        return BROWSER_READY_PERCENT;
    }
    BROWSER_READY_PERCENT + (index as f64 / count as f64) * TOPIC_PERCENT_SPAN
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
