//! Background execution of scrape runs with a single-run guard.
//!
//! The one [`ProgressReporter`] lives inside the run guard. Starting a run
//! takes the guard, so holding the lock and being allowed to write progress
//! are the same thing; it is released when the spawned task finishes. A run
//! that panics still ends in the `error` state.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use scholar_core::{AppConfig, ScrapeRequest};
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::driver::{BrowserLauncher, ChromiumLauncher};
use crate::error::ScraperError;
use crate::extract::{CompiledSelectors, ResultSelectors};
use crate::orchestrator::{Orchestrator, RunSummary, ScrapeSettings};
use crate::progress::{progress_channel, ProgressHandle, ProgressReporter};
use crate::store::{PgResultStore, ResultStore};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartError {
    #[error("a scrape run is already in progress")]
    AlreadyRunning,
}

type StoreFactory<S> = Arc<dyn Fn() -> S + Send + Sync>;

pub struct ScrapeService<L, S> {
    orchestrator: Arc<Orchestrator<L>>,
    new_store: StoreFactory<S>,
    run_guard: Arc<Mutex<ProgressReporter>>,
    progress: ProgressHandle,
}

impl<L, S> Clone for ScrapeService<L, S> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            new_store: Arc::clone(&self.new_store),
            run_guard: Arc::clone(&self.run_guard),
            progress: self.progress.clone(),
        }
    }
}

impl<L, S> ScrapeService<L, S>
where
    L: BrowserLauncher + 'static,
    S: ResultStore + 'static,
{
    /// `new_store` is called once per run to obtain that run's store.
    pub fn new(
        orchestrator: Orchestrator<L>,
        new_store: impl Fn() -> S + Send + Sync + 'static,
    ) -> Self {
        let (reporter, progress) = progress_channel();
        Self {
            orchestrator: Arc::new(orchestrator),
            new_store: Arc::new(new_store),
            run_guard: Arc::new(Mutex::new(reporter)),
            progress,
        }
    }

    #[must_use]
    pub fn progress(&self) -> ProgressHandle {
        self.progress.clone()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run_guard.try_lock().is_err()
    }

    /// Reset progress to `received` and spawn the run on its own task.
    ///
    /// Returns immediately; observe the run through [`Self::progress`] or
    /// await the returned handle.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::AlreadyRunning`] if another run holds the guard.
    /// Progress is not modified in that case.
    pub fn start(&self, request: ScrapeRequest) -> Result<JoinHandle<RunSummary>, StartError> {
        let reporter = Arc::clone(&self.run_guard)
            .try_lock_owned()
            .map_err(|_| StartError::AlreadyRunning)?;
        reporter.reset();

        let orchestrator = Arc::clone(&self.orchestrator);
        let store = (self.new_store)();
        tracing::info!(topics = request.topics.len(), "scrape run accepted");

        Ok(tokio::spawn(async move {
            let run = AssertUnwindSafe(orchestrator.run(&request, store, &reporter))
                .catch_unwind()
                .await;
            match run {
                Ok(summary) => summary,
                Err(panic) => {
                    let reason = panic_message(panic.as_ref());
                    tracing::error!(error = %reason, "scrape run panicked");
                    let message = format!("run aborted: {reason}");
                    reporter.fail(message.clone());
                    RunSummary {
                        topics: Vec::new(),
                        total_collected: reporter.handle().snapshot().total_results_collected,
                        error: Some(message),
                    }
                }
            }
        }))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

impl ScrapeService<ChromiumLauncher, PgResultStore> {
    /// Chromium sessions with the default result selectors, writing to `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] if the built-in selectors fail
    /// to compile.
    pub fn from_app_config(config: &AppConfig, pool: PgPool) -> Result<Self, ScraperError> {
        let selectors = CompiledSelectors::compile(&ResultSelectors::default())?;
        let orchestrator = Orchestrator::new(
            ChromiumLauncher::from_app_config(config),
            selectors,
            ScrapeSettings::from_app_config(config),
        );
        Ok(Self::new(orchestrator, move || PgResultStore::new(pool.clone())))
    }
}
