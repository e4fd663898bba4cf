//! Browser sessions used to load result pages.
//!
//! Pages on the search engine are rendered client-side, so they are loaded
//! through a real browser over the DevTools protocol (`chromiumoxide`).
//! [`ChromiumLauncher`] tries each configured backend in order (Chrome, then
//! Edge) and hands out the first session that starts.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use scholar_core::AppConfig;
use tokio::task::JoinHandle;

use crate::error::ScraperError;

/// One open browser tab able to load pages.
pub trait BrowserSession: Send + Sized {
    /// Load `url` and return once the page has settled.
    fn navigate(&mut self, url: &str) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Serialized DOM of the current page.
    fn page_source(&mut self) -> impl Future<Output = Result<String, ScraperError>> + Send;

    fn close(self) -> impl Future<Output = Result<(), ScraperError>> + Send;
}

/// Starts [`BrowserSession`]s.
pub trait BrowserLauncher: Send + Sync {
    type Session: BrowserSession;

    /// # Errors
    ///
    /// Returns [`ScraperError::NoBrowserAvailable`] when no backend could be
    /// started.
    fn open_session(&self) -> impl Future<Output = Result<Self::Session, ScraperError>> + Send;
}

/// A browser binary to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserBackend {
    pub name: &'static str,
    /// `None` lets the backend locate its own executable.
    pub executable: Option<PathBuf>,
}

const EDGE_CANDIDATES: &[&str] = &[
    "/usr/bin/microsoft-edge",
    "/usr/bin/microsoft-edge-stable",
    "/opt/microsoft/msedge/msedge",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
    r"C:\Program Files\Microsoft\Edge\Application\msedge.exe",
];

/// First Edge install found at a well-known location.
#[must_use]
pub fn detect_edge_executable() -> Option<PathBuf> {
    EDGE_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|path| path.exists())
        .map(Path::to_path_buf)
}

#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    backends: Vec<BrowserBackend>,
    headless: bool,
    settle: Duration,
}

impl ChromiumLauncher {
    #[must_use]
    pub fn new(backends: Vec<BrowserBackend>, headless: bool, settle: Duration) -> Self {
        Self {
            backends,
            headless,
            settle,
        }
    }

    /// Chrome first (explicit path or auto-detected), then Edge.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(
            vec![
                BrowserBackend {
                    name: "chrome",
                    executable: config.chrome_path.clone(),
                },
                BrowserBackend {
                    name: "edge",
                    executable: config.edge_path.clone().or_else(detect_edge_executable),
                },
            ],
            config.browser_headless,
            Duration::from_millis(config.page_settle_ms),
        )
    }

    #[must_use]
    pub fn backends(&self) -> &[BrowserBackend] {
        &self.backends
    }

    async fn launch(&self, backend: &BrowserBackend) -> Result<ChromiumSession, ScraperError> {
        // Only Chrome may fall back to chromiumoxide's own executable lookup;
        // anything else without a path would silently start Chrome again.
        if backend.executable.is_none() && backend.name != "chrome" {
            return Err(ScraperError::BrowserConfig {
                backend: backend.name.to_string(),
                reason: "executable not found".to_string(),
            });
        }

        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");
        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &backend.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|reason| ScraperError::BrowserConfig {
                backend: backend.name.to_string(),
                reason,
            })?;

        let (mut browser, mut handler) = Browser::launch(config).await?;

        // The CDP connection only makes progress while its handler is polled.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "browser handler event error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    tracing::debug!(error = %close_err, "failed to close browser after page error");
                }
                handler_task.abort();
                return Err(e.into());
            }
        };

        Ok(ChromiumSession {
            browser,
            page,
            handler_task,
            settle: self.settle,
        })
    }
}

impl BrowserLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn open_session(&self) -> Result<ChromiumSession, ScraperError> {
        for backend in &self.backends {
            match self.launch(backend).await {
                Ok(session) => {
                    tracing::info!(backend = backend.name, "browser session started");
                    return Ok(session);
                }
                Err(e) => {
                    tracing::warn!(backend = backend.name, error = %e, "browser backend failed to start");
                }
            }
        }
        Err(ScraperError::NoBrowserAvailable)
    }
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    settle: Duration,
}

impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ScraperError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        tokio::time::sleep(self.settle).await;
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, ScraperError> {
        Ok(self.page.content().await?)
    }

    async fn close(self) -> Result<(), ScraperError> {
        let Self {
            mut browser,
            page,
            handler_task,
            ..
        } = self;

        if let Err(e) = page.close().await {
            tracing::debug!(error = %e, "failed to close page");
        }
        let result = browser.close().await;
        if let Err(e) = browser.wait().await {
            tracing::debug!(error = %e, "failed waiting for browser exit");
        }
        handler_task.abort();
        result?;
        Ok(())
    }
}
