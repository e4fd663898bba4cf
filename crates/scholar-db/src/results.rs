//! Database operations for the `scholar_results` table.

use chrono::{DateTime, Utc};
use scholar_core::NewResultRecord;
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};

use crate::DbError;

/// Largest page the listing query will return.
pub const MAX_LISTING_LIMIT: i64 = 1000;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `scholar_results` table. Serialized field names match the
/// column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ResultRow {
    pub id: i64,
    pub term: String,
    pub title: String,
    pub publication_year: Option<i32>,
    pub authors: Option<String>,
    pub source: Option<String>,
    #[sqlx(rename = "abstract")]
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub article_url: Option<String>,
    pub inserted_at: DateTime<Utc>,
}

const SELECT_COLUMNS: &str = "SELECT id, term, title, publication_year, authors, source, \
     abstract, article_url, inserted_at FROM scholar_results";

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Create the results table if a previous migration run did not.
///
/// Mirrors `migrations/0001_scholar_results.sql` so a run against a database
/// that was never migrated still starts from a valid schema.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the DDL fails.
pub async fn ensure_results_table<'e, E>(executor: E) -> Result<(), DbError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS scholar_results ( \
             id BIGSERIAL PRIMARY KEY, \
             term TEXT NOT NULL, \
             title TEXT NOT NULL, \
             publication_year INTEGER, \
             authors TEXT, \
             source TEXT, \
             abstract TEXT, \
             article_url TEXT, \
             inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW())",
    )
    .execute(executor)
    .await?;
    Ok(())
}

/// Delete every stored result. Returns the number of rows removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn purge_results<'e, E>(executor: E) -> Result<u64, DbError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM scholar_results")
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Insert one record and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_result<'e, E>(executor: E, record: &NewResultRecord) -> Result<i64, DbError>
where
    E: PgExecutor<'e>,
{
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO scholar_results \
             (term, title, publication_year, authors, source, abstract, article_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(record.term.as_str())
    .bind(&record.title)
    .bind(record.publication_year)
    .bind(&record.authors)
    .bind(&record.source)
    .bind(record.abstract_text.as_deref())
    .bind(record.article_url.as_deref())
    .fetch_one(executor)
    .await?;

    Ok(id)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// List the most recently inserted results, newest first.
///
/// `limit` is clamped to `1..=MAX_LISTING_LIMIT`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_results(pool: &PgPool, limit: i64) -> Result<Vec<ResultRow>, DbError> {
    let limit = limit.clamp(1, MAX_LISTING_LIMIT);
    let rows = sqlx::query_as::<_, ResultRow>(&format!(
        "{SELECT_COLUMNS} ORDER BY id DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Load the full collection in insertion order. Used by report derivation.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_all_results(pool: &PgPool) -> Result<Vec<ResultRow>, DbError> {
    let rows = sqlx::query_as::<_, ResultRow>(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_results(pool: &PgPool) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scholar_results")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
