//! SQLite-backed persistence.

mod campaign_repository;
mod npc_repository;

pub use campaign_repository::SqliteCampaignRepo;
pub use npc_repository::SqliteNpcRepo;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

use crate::infrastructure::ports::RepoError;

/// Open (creating if missing) the SQLite database at `db_path`.
///
/// Foreign keys are enabled so NPC rows cannot outlive their campaign even
/// if a delete bypasses the repository's explicit cascade.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePool::connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))
}

/// Create tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS campaigns (
            id TEXT PRIMARY KEY,
            owner TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| RepoError::database("ensure_schema", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_campaigns_owner ON campaigns(owner)")
        .execute(pool)
        .await
        .map_err(|e| RepoError::database("ensure_schema", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS npcs (
            id TEXT PRIMARY KEY,
            campaign_id TEXT NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
            owner TEXT NOT NULL,
            name TEXT NOT NULL,
            race TEXT,
            class_name TEXT,
            alignment TEXT,
            location TEXT,
            description TEXT NOT NULL,
            notes TEXT,
            portrait_url TEXT,
            strength INTEGER,
            dexterity INTEGER,
            constitution INTEGER,
            intelligence INTEGER,
            wisdom INTEGER,
            charisma INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| RepoError::database("ensure_schema", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_npcs_campaign ON npcs(campaign_id)")
        .execute(pool)
        .await
        .map_err(|e| RepoError::database("ensure_schema", e))?;

    Ok(())
}

/// Parse an RFC 3339 timestamp column.
pub(crate) fn parse_timestamp(
    raw: &str,
    operation: &'static str,
) -> Result<chrono::DateTime<chrono::Utc>, RepoError> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| RepoError::database(operation, format!("bad timestamp '{raw}': {e}")))
}

/// Parse a UUID column.
pub(crate) fn parse_uuid(raw: &str, operation: &'static str) -> Result<uuid::Uuid, RepoError> {
    uuid::Uuid::parse_str(raw)
        .map_err(|e| RepoError::database(operation, format!("bad uuid '{raw}': {e}")))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Open a fresh schema-initialized database inside `dir`.
    pub async fn test_pool(dir: &tempfile::TempDir) -> SqlitePool {
        let db_path = dir.path().join("folio-test.db");
        let pool = connect(db_path.to_str().unwrap()).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }
}
