use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::models::Task;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Open the pool behind `database_url` and make sure the table exists.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    sqlx::query(SCHEMA).execute(&pool).await?;
    Ok(pool)
}

/// All tasks, newest first. `id` breaks ties between rows created within the
/// same clock reading.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT id, content, completed, created_at FROM todos ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

/// Insert a task. The caller guarantees `content` is non-empty and trimmed.
pub async fn insert(pool: &SqlitePool, content: &str) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "INSERT INTO todos (content, completed, created_at)
         VALUES (?1, FALSE, ?2)
         RETURNING id, content, completed, created_at",
    )
    .bind(content)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Set the completion flag on one row. `None` means no row matched `id`.
pub async fn update_completed(
    pool: &SqlitePool,
    id: i64,
    completed: bool,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "UPDATE todos SET completed = ?2 WHERE id = ?1
         RETURNING id, content, completed, created_at",
    )
    .bind(id)
    .bind(completed)
    .fetch_optional(pool)
    .await
}

/// Remove one row, returning it. `None` means no row matched `id`.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "DELETE FROM todos WHERE id = ?1
         RETURNING id, content, completed, created_at",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // One connection only: every new in-memory SQLite connection is a fresh,
    // empty database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query(SCHEMA).execute(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_id_and_defaults() {
        let pool = memory_pool().await;
        let task = insert(&pool, "buy milk").await.unwrap();
        assert_eq!(task.content, "buy milk");
        assert!(!task.completed);
        assert!(task.id > 0);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let pool = memory_pool().await;
        insert(&pool, "a").await.unwrap();
        insert(&pool, "b").await.unwrap();
        insert(&pool, "c").await.unwrap();

        let tasks = list_all(&pool).await.unwrap();
        let contents: Vec<&str> = tasks.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, ["c", "b", "a"]);
    }

    #[tokio::test]
    async fn list_on_empty_table_is_empty() {
        let pool = memory_pool().await;
        assert!(list_all(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggle_roundtrip_preserves_other_fields() {
        let pool = memory_pool().await;
        let created = insert(&pool, "water plants").await.unwrap();

        let done = update_completed(&pool, created.id, true)
            .await
            .unwrap()
            .unwrap();
        assert!(done.completed);
        assert_eq!(done.content, created.content);
        assert_eq!(done.created_at, created.created_at);

        let undone = update_completed(&pool, created.id, false)
            .await
            .unwrap()
            .unwrap();
        assert!(!undone.completed);
        assert_eq!(undone.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_on_missing_row_is_none() {
        let pool = memory_pool().await;
        insert(&pool, "only row").await.unwrap();
        let updated = update_completed(&pool, 999_999, true).await.unwrap();
        assert!(updated.is_none());
        // Nothing was touched.
        assert_eq!(list_all(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_row() {
        let pool = memory_pool().await;
        let first = insert(&pool, "keep").await.unwrap();
        let second = insert(&pool, "drop").await.unwrap();

        let removed = delete(&pool, second.id).await.unwrap().unwrap();
        assert_eq!(removed.id, second.id);

        let rest = list_all(&pool).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, first.id);

        assert!(delete(&pool, second.id).await.unwrap().is_none());
    }
}
