//! Write-through persistence for scraped records.
//!
//! Records are written as soon as they are parsed, inside a transaction that
//! is committed once per result page. A failure mid-page therefore loses only
//! that page; everything committed before it stays.

use std::future::Future;

use scholar_core::NewResultRecord;
use scholar_db::DbError;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::ScraperError;

pub trait ResultStore: Send + Sized {
    /// Ensure the table exists and delete every existing row.
    fn reset(&mut self) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Append one record to the current page.
    fn insert(
        &mut self,
        record: &NewResultRecord,
    ) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Make every record inserted since the last commit durable.
    fn commit_page(&mut self) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Release the store. Uncommitted records are discarded.
    fn close(self) -> impl Future<Output = Result<(), ScraperError>> + Send;
}

/// [`ResultStore`] over the `scholar_results` table.
pub struct PgResultStore {
    pool: PgPool,
    page: Option<Transaction<'static, Postgres>>,
}

impl PgResultStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool, page: None }
    }
}

impl ResultStore for PgResultStore {
    async fn reset(&mut self) -> Result<(), ScraperError> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        scholar_db::ensure_results_table(&mut *tx).await?;
        let removed = scholar_db::purge_results(&mut *tx).await?;
        tx.commit().await.map_err(DbError::from)?;
        tracing::info!(removed, "result store reset");
        Ok(())
    }

    async fn insert(&mut self, record: &NewResultRecord) -> Result<(), ScraperError> {
        let mut tx = match self.page.take() {
            Some(tx) => tx,
            None => self.pool.begin().await.map_err(DbError::from)?,
        };
        scholar_db::insert_result(&mut *tx, record).await?;
        self.page = Some(tx);
        Ok(())
    }

    async fn commit_page(&mut self) -> Result<(), ScraperError> {
        if let Some(tx) = self.page.take() {
            tx.commit().await.map_err(DbError::from)?;
        }
        Ok(())
    }

    async fn close(mut self) -> Result<(), ScraperError> {
        if let Some(tx) = self.page.take() {
            tracing::warn!("discarding uncommitted result page");
            tx.rollback().await.map_err(DbError::from)?;
        }
        Ok(())
    }
}
