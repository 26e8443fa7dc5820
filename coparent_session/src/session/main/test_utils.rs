//! Test utilities for session module tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::clock::ManualClock;
use crate::identity::{Identity, IdentityError, IdentityService};
use crate::session::config::INACTIVITY_THRESHOLD;
use crate::session::token;
use crate::session::types::{Role, RoleEntities, Session};
use crate::storage::{
    Document, DocumentStore, InMemoryDocumentStore, InMemoryLocalStore, LocalStore, StorageError,
};

use super::manager::SessionManager;

pub(crate) fn fixed_start() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
}

pub(crate) fn identity(subject_id: &str) -> Identity {
    Identity::new(subject_id, format!("{subject_id}@example.com"))
}

/// A session for `u1` that expires at `expires_at`, with activity one
/// threshold earlier.
pub(crate) fn session_expiring_at(expires_at: DateTime<Utc>) -> Session {
    let last_activity_at = expires_at - INACTIVITY_THRESHOLD;
    Session {
        subject_id: "u1".to_string(),
        contact_address: "u1@example.com".to_string(),
        credential: token::encode_at("u1", last_activity_at).unwrap(),
        issued_at: last_activity_at,
        last_activity_at,
        active_role: Role::Parent,
        role_entities: RoleEntities::Unlinked,
        entitled_roles: Default::default(),
        family_memberships: Vec::new(),
        expires_at,
    }
}

/// Identity service that counts sign-outs and can be told to fail them.
#[derive(Default)]
pub(crate) struct RecordingIdentity {
    current: Mutex<Option<Identity>>,
    sign_outs: AtomicUsize,
    fail: AtomicBool,
}

impl RecordingIdentity {
    pub(crate) async fn set_current(&self, identity: Option<Identity>) {
        *self.current.lock().await = identity;
    }

    pub(crate) fn sign_out_calls(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_sign_out(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityService for RecordingIdentity {
    async fn current_identity(&self) -> Option<Identity> {
        self.current.lock().await.clone()
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(IdentityError::SignOut("provider unreachable".to_string()));
        }
        *self.current.lock().await = None;
        Ok(())
    }
}

/// Local store whose writes always fail. Reads report nothing stored.
#[derive(Default)]
pub(crate) struct FailingLocalStore;

#[async_trait]
impl LocalStore for FailingLocalStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(StorageError::Storage("disk is read-only".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Storage("disk is read-only".to_string()))
    }
}

/// Local store whose reads always fail.
#[derive(Default)]
pub(crate) struct UnreadableLocalStore;

#[async_trait]
impl LocalStore for UnreadableLocalStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Storage("keystore locked".to_string()))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Document store that rejects every call.
#[derive(Default)]
pub(crate) struct FailingDocumentStore {
    pub(crate) calls: AtomicUsize,
}

#[async_trait]
impl DocumentStore for FailingDocumentStore {
    async fn get_document(
        &self,
        _collection: &str,
        _id: &str,
    ) -> Result<Option<Document>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Storage("permission denied".to_string()))
    }

    async fn set_document(
        &self,
        _collection: &str,
        _id: &str,
        _fields: Document,
        _merge: bool,
    ) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Storage("permission denied".to_string()))
    }
}

/// Document store whose writes never complete. Reads find no document.
pub(crate) struct HangingDocumentStore;

#[async_trait]
impl DocumentStore for HangingDocumentStore {
    async fn get_document(
        &self,
        _collection: &str,
        _id: &str,
    ) -> Result<Option<Document>, StorageError> {
        Ok(None)
    }

    async fn set_document(
        &self,
        _collection: &str,
        _id: &str,
        _fields: Document,
        _merge: bool,
    ) -> Result<(), StorageError> {
        std::future::pending().await
    }
}

/// A manager wired to in-memory collaborators and a manual clock.
pub(crate) struct Fixture {
    pub(crate) manager: SessionManager,
    pub(crate) local: Arc<dyn LocalStore>,
    pub(crate) identity: Arc<RecordingIdentity>,
    pub(crate) documents: Arc<InMemoryDocumentStore>,
    pub(crate) clock: Arc<ManualClock>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::with_local(Arc::new(InMemoryLocalStore::new()))
    }

    pub(crate) fn with_local(local: Arc<dyn LocalStore>) -> Self {
        let identity = Arc::new(RecordingIdentity::default());
        let documents = Arc::new(InMemoryDocumentStore::new());
        let clock = Arc::new(ManualClock::new(fixed_start()));
        let manager = SessionManager::new(local.clone(), identity.clone(), documents.clone())
            .with_clock(clock.clone())
            .with_storage_key("test_session")
            .with_profile_collection("users");

        Self {
            manager,
            local,
            identity,
            documents,
            clock,
        }
    }
}
