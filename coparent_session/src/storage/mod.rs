mod document_store;
mod errors;
mod local_store;

pub use document_store::{Document, DocumentStore, InMemoryDocumentStore};
pub use errors::StorageError;
pub use local_store::{
    InMemoryLocalStore, LOCAL_STORE_TYPE, LOCAL_STORE_URL, LocalStore, SqliteLocalStore,
    build_local_store, local_store_from_env,
};
