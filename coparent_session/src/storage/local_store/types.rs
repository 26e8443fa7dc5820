use async_trait::async_trait;
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;

/// Device-local string key-value storage.
///
/// This is the authority for session validity: a value written here survives
/// app restarts, and every failure is reported to the caller.
#[async_trait]
pub trait LocalStore: Send + Sync + 'static {
    /// Initialize the store. This is called when the store is created.
    async fn init(&self) -> Result<(), StorageError>;

    /// Get the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub struct InMemoryLocalStore {
    pub(super) entry: Mutex<HashMap<String, String>>,
}

pub struct SqliteLocalStore {
    pub(super) pool: Pool<Sqlite>,
    pub(super) table: String,
}
