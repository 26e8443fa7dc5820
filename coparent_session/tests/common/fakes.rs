use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coparent_session::{
    Document, DocumentStore, Identity, IdentityError, IdentityService, InMemoryDocumentStore,
    InMemoryLocalStore, LocalStore, ManualClock, SessionManager, StorageError,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

pub fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_735_689_600_000).unwrap()
}

pub fn identity(subject_id: &str) -> Identity {
    Identity::new(subject_id, format!("{subject_id}@example.com"))
}

/// Identity provider fake that records sign-outs.
#[derive(Default)]
pub struct MockIdentityProvider {
    current: Mutex<Option<Identity>>,
    sign_outs: AtomicUsize,
    fail_sign_out: AtomicBool,
}

impl MockIdentityProvider {
    pub async fn sign_in(&self, identity: Identity) {
        *self.current.lock().await = Some(identity);
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    pub fn set_sign_out_failure(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityService for MockIdentityProvider {
    async fn current_identity(&self) -> Option<Identity> {
        self.current.lock().await.clone()
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(IdentityError::SignOut("network unreachable".to_string()));
        }
        *self.current.lock().await = None;
        Ok(())
    }
}

/// Document store that throws on every call.
#[derive(Default)]
pub struct UnreachableDocumentStore {
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

#[async_trait]
impl DocumentStore for UnreachableDocumentStore {
    async fn get_document(
        &self,
        _collection: &str,
        _id: &str,
    ) -> Result<Option<Document>, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Storage("unavailable".to_string()))
    }

    async fn set_document(
        &self,
        _collection: &str,
        _id: &str,
        _fields: Document,
        _merge: bool,
    ) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Storage("unavailable".to_string()))
    }
}

/// Everything a simulated app process shares with the next one after a
/// restart: device storage, the provider, the remote store and the clock.
pub struct Device {
    pub local: Arc<dyn LocalStore>,
    pub provider: Arc<MockIdentityProvider>,
    pub documents: Arc<dyn DocumentStore>,
    pub clock: Arc<ManualClock>,
}

pub const SESSION_KEY: &str = "it_session";

impl Device {
    pub fn new() -> Self {
        Self::with_stores(
            Arc::new(InMemoryLocalStore::new()),
            Arc::new(InMemoryDocumentStore::new()),
        )
    }

    pub fn with_stores(local: Arc<dyn LocalStore>, documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            local,
            provider: Arc::new(MockIdentityProvider::default()),
            documents,
            clock: Arc::new(ManualClock::new(start_time())),
        }
    }

    /// A fresh manager, as a newly started app process would build.
    pub fn launch(&self) -> SessionManager {
        SessionManager::new(
            self.local.clone(),
            self.provider.clone(),
            self.documents.clone(),
        )
        .with_clock(self.clock.clone())
        .with_storage_key(SESSION_KEY)
        .with_profile_collection("users")
    }
}
