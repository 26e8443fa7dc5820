mod memory;
mod types;

pub use types::{Document, DocumentStore, InMemoryDocumentStore};
