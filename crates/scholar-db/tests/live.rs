//! Live integration tests for scholar-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/scholar-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use scholar_core::{NewResultRecord, Topic};
use scholar_db::{
    count_results, ensure_results_table, insert_result, list_all_results, list_recent_results,
    purge_results,
};

fn record(term: &str, title: &str) -> NewResultRecord {
    NewResultRecord {
        title: title.to_string(),
        publication_year: Some(2024),
        authors: "A Silva".to_string(),
        source: "Nature".to_string(),
        abstract_text: Some("An abstract".to_string()),
        article_url: Some(format!("https://example.org/{title}")),
        ..NewResultRecord::placeholder(Topic::from(term))
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_and_list_round_trip(pool: sqlx::PgPool) {
    let id = insert_result(&pool, &record("quantum", "first"))
        .await
        .expect("insert");
    assert!(id > 0);

    let rows = list_all_results(&pool).await.expect("list");
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.term, "quantum");
    assert_eq!(row.title, "first");
    assert_eq!(row.publication_year, Some(2024));
    assert_eq!(row.authors.as_deref(), Some("A Silva"));
    assert_eq!(row.abstract_text.as_deref(), Some("An abstract"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn placeholder_record_keeps_sentinels_and_nulls(pool: sqlx::PgPool) {
    insert_result(&pool, &NewResultRecord::placeholder(Topic::from("t")))
        .await
        .expect("insert");

    let rows = list_all_results(&pool).await.expect("list");
    assert_eq!(rows[0].title, "Title not found");
    assert_eq!(rows[0].authors.as_deref(), Some("N/A"));
    assert!(rows[0].publication_year.is_none());
    assert!(rows[0].abstract_text.is_none());
    assert!(rows[0].article_url.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn recent_listing_is_newest_first_and_limited(pool: sqlx::PgPool) {
    for i in 0..5 {
        insert_result(&pool, &record("t", &format!("r{i}")))
            .await
            .expect("insert");
    }

    let rows = list_recent_results(&pool, 3).await.expect("list");
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["r4", "r3", "r2"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn recent_listing_clamps_non_positive_limit(pool: sqlx::PgPool) {
    insert_result(&pool, &record("t", "only"))
        .await
        .expect("insert");

    let rows = list_recent_results(&pool, 0).await.expect("list");
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn purge_removes_every_row(pool: sqlx::PgPool) {
    for i in 0..3 {
        insert_result(&pool, &record("t", &format!("r{i}")))
            .await
            .expect("insert");
    }

    let removed = purge_results(&pool).await.expect("purge");
    assert_eq!(removed, 3);
    assert_eq!(count_results(&pool).await.expect("count"), 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn ensure_table_is_idempotent(pool: sqlx::PgPool) {
    ensure_results_table(&pool).await.expect("first ensure");
    ensure_results_table(&pool).await.expect("second ensure");
    assert_eq!(count_results(&pool).await.expect("count"), 0);
}

#[sqlx::test(migrations = false)]
async fn ensure_table_creates_schema_on_unmigrated_database(pool: sqlx::PgPool) {
    ensure_results_table(&pool).await.expect("ensure");
    purge_results(&pool).await.expect("purge on empty table");
    insert_result(&pool, &record("t", "x"))
        .await
        .expect("insert");
    assert_eq!(count_results(&pool).await.expect("count"), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn rolled_back_transaction_leaves_no_rows(pool: sqlx::PgPool) {
    let mut tx = pool.begin().await.expect("begin");
    insert_result(&mut *tx, &record("t", "uncommitted"))
        .await
        .expect("insert");
    tx.rollback().await.expect("rollback");

    assert_eq!(count_results(&pool).await.expect("count"), 0);
}
