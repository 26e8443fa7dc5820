use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::identity::{Identity, IdentityService};
use crate::session::config::{INACTIVITY_THRESHOLD, PROFILE_COLLECTION, SESSION_STORAGE_KEY};
use crate::session::errors::SessionError;
use crate::session::token;
use crate::session::types::{ProfileSnapshot, Role, Session};
use crate::storage::{Document, DocumentStore, LocalStore};
use crate::utils::truncate_to_millis;

use super::mirror::{MirrorTasks, best_effort};
use super::profile::{activity_marker, default_profile, login_marker, parse_profile, role_marker};

/// `true` when `session` is absent or `now` is past its expiry.
pub fn is_session_expired_at(session: Option<&Session>, now: DateTime<Utc>) -> bool {
    match session {
        Some(session) => now > session.expires_at,
        None => true,
    }
}

/// Owner of the one persisted session record.
///
/// Local storage is authoritative: failing to write or clear it is reported to
/// the caller. The document store only receives advisory mirrors and its
/// failures are logged and dropped. Expiry is checked whenever the record is
/// read; nothing expires it in the background.
///
/// Mirror writes run as runtime tasks and outlive the manager. Call
/// [`settle_mirrors`](Self::settle_mirrors) before shutting the runtime down
/// to make sure they land.
pub struct SessionManager {
    local: Arc<dyn LocalStore>,
    identity: Arc<dyn IdentityService>,
    documents: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    storage_key: String,
    profile_collection: String,
    mirrors: MirrorTasks,
}

impl SessionManager {
    pub fn new(
        local: Arc<dyn LocalStore>,
        identity: Arc<dyn IdentityService>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            local,
            identity,
            documents,
            clock: Arc::new(SystemClock),
            storage_key: SESSION_STORAGE_KEY.to_string(),
            profile_collection: PROFILE_COLLECTION.to_string(),
            mirrors: MirrorTasks::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }

    pub fn with_profile_collection(mut self, collection: impl Into<String>) -> Self {
        self.profile_collection = collection.into();
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn now(&self) -> DateTime<Utc> {
        truncate_to_millis(self.clock.now())
    }

    /// Create the session for a freshly signed-in identity and persist it,
    /// replacing any previous record.
    ///
    /// Profile enrichment from the document store is best-effort: if it cannot
    /// be read the session is created with empty entitlements. Fails only when
    /// the credential cannot be issued or local storage cannot be written.
    #[tracing::instrument(skip(self, identity), fields(subject_id = %identity.subject_id))]
    pub async fn create_and_persist_session(
        &self,
        identity: &Identity,
        role: Role,
    ) -> Result<Session, SessionError> {
        let now = self.now();
        let credential = token::encode_at(&identity.subject_id, now)?;
        let profile = self.load_profile(identity, now).await;

        let session = Session {
            subject_id: identity.subject_id.clone(),
            contact_address: identity.contact_address.clone(),
            credential,
            issued_at: now,
            last_activity_at: now,
            active_role: role,
            role_entities: profile.role_entities,
            entitled_roles: profile.entitled_roles,
            family_memberships: profile.family_memberships,
            expires_at: now + INACTIVITY_THRESHOLD,
        };

        self.persist(&session).await?;
        tracing::info!(expires_at = %session.expires_at, "Session created");

        self.mirror("record last login", &session.subject_id, login_marker(now, role))
            .await;

        Ok(session)
    }

    /// Create a session for whoever is currently signed in at the provider.
    pub async fn create_for_current_identity(&self, role: Role) -> Result<Session, SessionError> {
        let identity = self
            .identity
            .current_identity()
            .await
            .ok_or(SessionError::NoIdentity)?;
        self.create_and_persist_session(&identity, role).await
    }

    /// Load the persisted session.
    ///
    /// Returns `None` when nothing is stored, the record cannot be read, or it
    /// has expired. An expired record is torn down (local record removed,
    /// provider signed out) before returning.
    #[tracing::instrument(skip(self))]
    pub async fn get_persisted_session(&self) -> Option<Session> {
        let raw = match self.local.get(&self.storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No persisted session");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session; treating as absent");
                return None;
            }
        };

        let session: Session = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Persisted session is unreadable; treating as absent");
                return None;
            }
        };

        let now = self.now();
        if is_session_expired_at(Some(&session), now) {
            tracing::info!(
                subject_id = %session.subject_id,
                expires_at = %session.expires_at,
                "Session expired; tearing down"
            );
            self.evict_expired().await;
            return None;
        }

        if !session.credential_status(now).valid {
            // Inactivity expiry decides validity; a lapsed credential is only noted
            tracing::debug!(subject_id = %session.subject_id, "Session credential window has lapsed");
        }

        Some(session)
    }

    /// Re-anchor the session's expiry to now and persist it. The credential is
    /// left untouched.
    #[tracing::instrument(skip(self, session), fields(subject_id = %session.subject_id))]
    pub async fn update_session_activity(
        &self,
        mut session: Session,
    ) -> Result<Session, SessionError> {
        // Activity never predates creation, even if the clock stepped back
        let now = self.now().max(session.issued_at);
        session.last_activity_at = now;
        session.expires_at = now + INACTIVITY_THRESHOLD;

        self.persist(&session).await?;
        tracing::debug!(expires_at = %session.expires_at, "Session activity refreshed");

        self.mirror("mirror activity", &session.subject_id, activity_marker(now))
            .await;

        Ok(session)
    }

    /// Load and refresh in one step; called on every foreground transition.
    /// Returns whether a valid session existed.
    pub async fn validate_and_refresh_session(&self) -> bool {
        let Some(session) = self.get_persisted_session().await else {
            return false;
        };

        if let Err(e) = self.update_session_activity(session).await {
            tracing::error!(error = %e, "Valid session found but its activity could not be persisted");
        }
        true
    }

    /// Change the active role of the persisted session.
    ///
    /// Returns `Ok(None)` without writing anything when there is no valid
    /// session. Entitlement to `role` is not checked here.
    #[tracing::instrument(skip(self))]
    pub async fn set_active_session_role(
        &self,
        role: Role,
    ) -> Result<Option<Session>, SessionError> {
        let Some(mut session) = self.get_persisted_session().await else {
            tracing::debug!("No session to switch role on");
            return Ok(None);
        };

        session.active_role = role;
        self.persist(&session).await?;
        tracing::info!(subject_id = %session.subject_id, "Active role switched");

        self.mirror("mirror active role", &session.subject_id, role_marker(role))
            .await;

        Ok(Some(session))
    }

    /// Remove the local record and sign out at the provider. Either failure
    /// is returned to the caller.
    #[tracing::instrument(skip(self))]
    pub async fn clear_session(&self) -> Result<(), SessionError> {
        self.local.remove(&self.storage_key).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to remove persisted session");
            SessionError::from(e)
        })?;
        self.identity.sign_out().await.map_err(|e| {
            tracing::error!(error = %e, "Provider sign-out failed after local session was cleared");
            SessionError::from(e)
        })?;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// `true` when `session` is absent or past its expiry.
    pub fn is_session_expired(&self, session: Option<&Session>) -> bool {
        is_session_expired_at(session, self.now())
    }

    /// Wait for outstanding document-store mirror writes.
    pub async fn settle_mirrors(&self) {
        self.mirrors.settle().await;
    }

    async fn persist(&self, session: &Session) -> Result<(), SessionError> {
        let json = serde_json::to_string(session)?;
        self.local
            .set(&self.storage_key, json)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to persist session");
                SessionError::from(e)
            })
    }

    async fn evict_expired(&self) {
        if let Err(e) = self.local.remove(&self.storage_key).await {
            tracing::error!(error = %e, "Failed to remove expired session");
        }
        if let Err(e) = self.identity.sign_out().await {
            tracing::warn!(error = %e, "Provider sign-out failed for expired session");
        }
    }

    async fn load_profile(&self, identity: &Identity, now: DateTime<Utc>) -> ProfileSnapshot {
        let lookup = self
            .documents
            .get_document(&self.profile_collection, &identity.subject_id);

        match best_effort("load profile", lookup).await {
            Some(Some(document)) => parse_profile(&document),
            Some(None) => {
                tracing::debug!("No profile yet; creating an empty one");
                self.mirror(
                    "create default profile",
                    &identity.subject_id,
                    default_profile(&identity.contact_address, now),
                )
                .await;
                ProfileSnapshot::default()
            }
            None => ProfileSnapshot::default(),
        }
    }

    async fn mirror(&self, operation: &'static str, subject_id: &str, fields: Document) {
        let documents = self.documents.clone();
        let collection = self.profile_collection.clone();
        let subject_id = subject_id.to_string();
        self.mirrors
            .spawn(operation, async move {
                documents
                    .set_document(&collection, &subject_id, fields, true)
                    .await
            })
            .await;
    }
}
