use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;
use tracing::info;

use crate::error::Result;

pub type DbPool = SqlitePool;

const SEED_DEPARTMENTS: [&str; 4] = ["HR", "IT", "Sales", "Finance"];

pub async fn init_db(path: &Path) -> Result<DbPool> {
    let db_url = format!("sqlite:{}?mode=rwc", path.display());

    info!("Initializing database at {}", path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // WAL mode for better concurrency under the storage engine's own locking
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    info!("Database initialized successfully");
    Ok(pool)
}

/// In-memory pool with the full schema and department seed. Used by tests
/// and ephemeral runs.
pub async fn init_memory() -> Result<DbPool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Execute a SQL script statement by statement. Comment lines are
/// stripped from the whole script first, so a `;` inside a comment
/// cannot split a statement.
async fn execute_sql(pool: &DbPool, sql: &str) -> Result<()> {
    let cleaned: String = sql
        .lines()
        .filter(|line| !line.trim().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    for statement in cleaned.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

async fn create_schema(pool: &DbPool) -> Result<()> {
    execute_sql(pool, include_str!("../migrations/001_initial.sql")).await?;

    for dept in SEED_DEPARTMENTS {
        sqlx::query("INSERT OR IGNORE INTO departments (name) VALUES (?)")
            .bind(dept)
            .execute(pool)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_and_seed_are_idempotent() {
        let pool = init_memory().await.unwrap();

        // Running the migration again must not duplicate the seed
        create_schema(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn semicolon_inside_a_comment_does_not_split_statements() {
        let pool = init_memory().await.unwrap();

        let script = r#"
            -- scratch table; one row per key
            CREATE TABLE IF NOT EXISTS scratch (
                key TEXT PRIMARY KEY,
                value TEXT
            );
            INSERT INTO scratch (key, value) VALUES ('a', '1');
        "#;
        execute_sql(&pool, script).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scratch")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn unique_violations_map_to_constraint_errors() {
        use crate::error::Error;

        let pool = init_memory().await.unwrap();

        let err = sqlx::query("INSERT INTO departments (name) VALUES ('HR')")
            .execute(&pool)
            .await
            .map_err(Error::from)
            .unwrap_err();
        assert!(matches!(err, Error::Constraint(_)));
    }
}
