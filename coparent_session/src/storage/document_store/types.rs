use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;

/// Field map of a single document in the remote document store.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Remote keyed document store.
///
/// The session core only reads profile documents to enrich a new session and
/// merge-writes a few bookkeeping fields back. Nothing about session validity
/// depends on it.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StorageError>;

    /// Write `fields` to the document. With `merge`, existing fields not named
    /// in `fields` are kept; without it the document is replaced.
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
        merge: bool,
    ) -> Result<(), StorageError>;
}

pub struct InMemoryDocumentStore {
    pub(super) documents: Mutex<HashMap<(String, String), Document>>,
}
