use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;

use super::types::{Document, DocumentStore, InMemoryDocumentStore};

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory document store");
        Self {
            documents: Mutex::new(HashMap::new()),
        }
    }

    fn make_key(collection: &str, id: &str) -> (String, String) {
        (collection.to_string(), id.to_string())
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StorageError> {
        let key = Self::make_key(collection, id);
        Ok(self.documents.lock().await.get(&key).cloned())
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
        merge: bool,
    ) -> Result<(), StorageError> {
        let key = Self::make_key(collection, id);
        let mut documents = self.documents.lock().await;

        match documents.get_mut(&key) {
            Some(existing) if merge => existing.extend(fields),
            _ => {
                documents.insert(key, fields);
            }
        }
        Ok(())
    }
}
