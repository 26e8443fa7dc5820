use std::{sync::Arc, sync::LazyLock};

use crate::storage::errors::StorageError;
use crate::utils::env_or;

use super::types::{InMemoryLocalStore, LocalStore, SqliteLocalStore};

const DEFAULT_LOCAL_STORE_TYPE: &str = "memory";
const DEFAULT_LOCAL_STORE_URL: &str = "sqlite:coparent_session.db";

pub static LOCAL_STORE_TYPE: LazyLock<String> =
    LazyLock::new(|| env_or("LOCAL_STORE_TYPE", DEFAULT_LOCAL_STORE_TYPE));

pub static LOCAL_STORE_URL: LazyLock<String> =
    LazyLock::new(|| env_or("LOCAL_STORE_URL", DEFAULT_LOCAL_STORE_URL));

/// Build the local store selected by `LOCAL_STORE_TYPE` / `LOCAL_STORE_URL`.
pub async fn local_store_from_env() -> Result<Arc<dyn LocalStore>, StorageError> {
    build_local_store(LOCAL_STORE_TYPE.as_str(), LOCAL_STORE_URL.as_str()).await
}

/// Build and initialize a local store. Supported types are `memory` and `sqlite`.
pub async fn build_local_store(
    store_type: &str,
    store_url: &str,
) -> Result<Arc<dyn LocalStore>, StorageError> {
    tracing::info!(
        "Initializing local store with type: {}, url: {}",
        store_type,
        store_url
    );

    let store: Arc<dyn LocalStore> = match store_type {
        "memory" => Arc::new(InMemoryLocalStore::new()),
        "sqlite" => Arc::new(SqliteLocalStore::connect_lazy(store_url)?),
        t => {
            tracing::error!("Unsupported local store type: {}", t);
            return Err(StorageError::UnsupportedStoreType(format!(
                "{t}. Supported types are 'memory' and 'sqlite'"
            )));
        }
    };

    store.init().await?;

    tracing::info!("Connected to local store: type={}", store_type);

    Ok(store)
}
