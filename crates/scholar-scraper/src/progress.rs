//! Run progress shared between the scrape task and any number of pollers.
//!
//! The state lives in a `tokio::sync::watch` channel. [`ProgressReporter`] is
//! the single writer and is moved into the running task; [`ProgressHandle`]
//! is cheap to clone and only ever reads whole snapshots, so a poller can
//! never observe a half-applied update.

use std::fmt;

use scholar_core::Topic;
use serde::{Serialize, Serializer};
use tokio::sync::watch;

/// Lifecycle tag of the current (or last) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Received,
    StartingBrowser,
    BrowserReady,
    Scraping,
    Done,
    Error(String),
}

impl RunStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error(_))
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Received => f.write_str("received"),
            Self::StartingBrowser => f.write_str("starting browser"),
            Self::BrowserReady => f.write_str("browser ready"),
            Self::Scraping => f.write_str("scraping"),
            Self::Done => f.write_str("done"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

impl Serialize for RunStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressState {
    pub status: RunStatus,
    pub percent_complete: f64,
    pub total_results_collected: u32,
    pub current_topic: Option<Topic>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            status: RunStatus::Idle,
            percent_complete: 0.0,
            total_results_collected: 0,
            current_topic: None,
        }
    }
}

/// Create a linked writer/reader pair starting at [`ProgressState::default`].
#[must_use]
pub fn progress_channel() -> (ProgressReporter, ProgressHandle) {
    let (tx, rx) = watch::channel(ProgressState::default());
    (ProgressReporter { tx }, ProgressHandle { rx })
}

/// Read side of the progress channel.
#[derive(Debug, Clone)]
pub struct ProgressHandle {
    rx: watch::Receiver<ProgressState>,
}

impl ProgressHandle {
    #[must_use]
    pub fn snapshot(&self) -> ProgressState {
        self.rx.borrow().clone()
    }

    /// Wait until the run reaches `done` or `error`. Returns the terminal
    /// state, or the last observed one if the writer was dropped first.
    pub async fn wait_terminal(&mut self) -> ProgressState {
        let terminal = self
            .rx
            .wait_for(|state| state.status.is_terminal())
            .await
            .map(|state| state.clone());
        terminal.unwrap_or_else(|_| self.snapshot())
    }

    /// Wait for the next update and return it. Intermediate updates may be
    /// coalesced. `None` once the writer has been dropped.
    pub async fn changed(&mut self) -> Option<ProgressState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

/// Write side of the progress channel.
///
/// Percent is clamped to `[0, 100]` and never moves backwards within a run;
/// [`ProgressReporter::reset`] starts a new run.
#[derive(Debug)]
pub struct ProgressReporter {
    tx: watch::Sender<ProgressState>,
}

impl ProgressReporter {
    #[must_use]
    pub fn handle(&self) -> ProgressHandle {
        ProgressHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Start a new run: status `received`, counters zeroed.
    pub fn reset(&self) {
        self.tx.send_replace(ProgressState {
            status: RunStatus::Received,
            ..ProgressState::default()
        });
    }

    pub fn set_status(&self, status: RunStatus) {
        self.tx.send_modify(|state| state.status = status);
    }

    pub fn set_percent(&self, percent: f64) {
        self.tx.send_modify(|state| {
            let clamped = percent.clamp(0.0, 100.0);
            if clamped > state.percent_complete {
                state.percent_complete = clamped;
            }
        });
    }

    /// Enter `topic`: status `scraping`, current topic set, percent advanced.
    pub fn begin_topic(&self, topic: &Topic, percent: f64) {
        self.tx.send_modify(|state| {
            state.status = RunStatus::Scraping;
            state.current_topic = Some(topic.clone());
            let clamped = percent.clamp(0.0, 100.0);
            if clamped > state.percent_complete {
                state.percent_complete = clamped;
            }
        });
    }

    pub fn set_total(&self, total: u32) {
        self.tx.send_modify(|state| state.total_results_collected = total);
    }

    pub fn finish(&self, total: u32) {
        self.tx.send_modify(|state| {
            state.status = RunStatus::Done;
            state.percent_complete = 100.0;
            state.total_results_collected = total;
        });
    }

    /// Terminal failure. Percent is left where it was.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx
            .send_modify(|state| state.status = RunStatus::Error(message));
    }
}
