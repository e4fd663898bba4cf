pub mod driver;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod progress;
pub mod service;
pub mod store;
pub mod url;

pub use driver::{BrowserBackend, BrowserLauncher, BrowserSession, ChromiumLauncher};
pub use error::ScraperError;
pub use extract::{
    build_record, extract_field, find_result_blocks, parse_byline, CompiledSelectors,
    ResultBlock, ResultSelectors,
};
pub use orchestrator::{Orchestrator, RunSummary, ScrapeSettings, StopReason, TopicOutcome};
pub use progress::{progress_channel, ProgressHandle, ProgressReporter, ProgressState, RunStatus};
pub use service::{ScrapeService, StartError};
pub use store::{PgResultStore, ResultStore};
pub use url::{page_url, MAX_PAGES_PER_TOPIC, RESULTS_PER_PAGE};

/// The service as wired in production: Chromium sessions writing to Postgres.
pub type DefaultScrapeService = ScrapeService<ChromiumLauncher, PgResultStore>;
