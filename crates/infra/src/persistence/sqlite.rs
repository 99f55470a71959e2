//! SQLite key-value backend.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tokio::runtime::Runtime;

use super::{KeyValueStore, PersistenceError};

fn backend(context: &str, err: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Backend(format!("{context}: {err}"))
}

/// SQLite-backed store with a single `kv_store` table.
///
/// The store exposes a synchronous API and drives sqlx on its own current-thread runtime.
/// Do not call it from inside another tokio runtime.
#[derive(Debug)]
pub struct SqliteStore {
    runtime: Runtime,
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let url = format!("sqlite://{}", path.as_ref().to_string_lossy());
        Self::connect(&url)
    }

    /// Private in-memory database, mainly for tests.
    pub fn in_memory() -> Result<Self, PersistenceError> {
        Self::connect("sqlite::memory:")
    }

    fn connect(url: &str) -> Result<Self, PersistenceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| backend("failed to create runtime", e))?;

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| backend("invalid sqlite url", e))?
            .create_if_missing(true);

        let pool = runtime.block_on(async {
            // One connection: an in-memory database is private to its connection.
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await
                .map_err(|e| backend("failed to open sqlite database", e))?;

            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS kv_store (
                    key        TEXT PRIMARY KEY,
                    value      TEXT NOT NULL,
                    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )
                "#,
            )
            .execute(&pool)
            .await
            .map_err(|e| backend("failed to create kv_store table", e))?;

            Ok::<_, PersistenceError>(pool)
        })?;

        Ok(Self { runtime, pool })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.runtime.block_on(async {
            let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| backend("failed to read key", e))?;

            match row {
                Some(row) => {
                    let value: String = row
                        .try_get("value")
                        .map_err(|e| backend("failed to decode value", e))?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        })
    }

    fn put(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.runtime.block_on(async {
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, CURRENT_TIMESTAMP)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| backend("failed to write key", e))?;
            Ok(())
        })
    }
}
