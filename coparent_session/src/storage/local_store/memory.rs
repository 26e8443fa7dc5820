use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;

use super::types::{InMemoryLocalStore, LocalStore};

const LOCAL_PREFIX: &str = "local";

impl InMemoryLocalStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory local store");
        Self {
            entry: Mutex::new(HashMap::new()),
        }
    }

    fn make_key(key: &str) -> String {
        format!("{LOCAL_PREFIX}:{key}")
    }
}

impl Default for InMemoryLocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocalStore for InMemoryLocalStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = Self::make_key(key);
        Ok(self.entry.lock().await.get(&key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let key = Self::make_key(key);
        self.entry.lock().await.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let key = Self::make_key(key);
        self.entry.lock().await.remove(&key);
        Ok(())
    }
}
