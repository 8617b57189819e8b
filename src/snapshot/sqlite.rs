// SQLite-backed state store: one row per key.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

use super::KvStore;
use crate::error::PersistenceError;

pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    pub async fn connect(path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_state (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl KvStore for SqliteKvStore {
    #[instrument(skip(self), fields(repo = "kv_state", operation = "get"))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let value = sqlx::query_scalar::<_, Vec<u8>>("SELECT value FROM kv_state WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    #[instrument(skip(self, value), fields(repo = "kv_state", operation = "put"))]
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), PersistenceError> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        sqlx::query("INSERT OR REPLACE INTO kv_state (key, value, updated_at) VALUES ($1, $2, $3)")
            .bind(key)
            .bind(value)
            .bind(now_ms)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
