use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::storage::errors::StorageError;

use super::types::{LocalStore, SqliteLocalStore};

const DEFAULT_TABLE: &str = "local_kv";

impl SqliteLocalStore {
    /// Create a store backed by the SQLite database at `url`.
    ///
    /// The pool holds a single long-lived connection so `sqlite::memory:`
    /// databases keep their contents for the life of the store. Writes to the
    /// device store are serialized through that connection.
    pub fn connect_lazy(url: &str) -> Result<Self, StorageError> {
        let opts = SqliteConnectOptions::from_str(url)
            .map_err(|e| StorageError::Storage(format!("Invalid SQLite url {url}: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_lazy_with(opts);

        Ok(Self {
            pool,
            table: DEFAULT_TABLE.to_string(),
        })
    }
}

#[async_trait]
impl LocalStore for SqliteLocalStore {
    async fn init(&self) -> Result<(), StorageError> {
        let table = self.table.as_str();

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let table = self.table.as_str();

        let value = sqlx::query_scalar::<_, String>(&format!(
            r#"SELECT value FROM {table} WHERE key = ?"#
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let table = self.table.as_str();

        sqlx::query(&format!(
            r#"
            INSERT INTO {table} (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#
        ))
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let table = self.table.as_str();

        sqlx::query(&format!(r#"DELETE FROM {table} WHERE key = ?"#))
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
