mod config;
mod memory;
mod sqlite;
mod types;

pub use config::{LOCAL_STORE_TYPE, LOCAL_STORE_URL, build_local_store, local_store_from_env};
pub use types::{InMemoryLocalStore, LocalStore, SqliteLocalStore};
