//! coparent_session - Client-side session lifecycle for the co-parenting app
//!
//! This crate owns the single locally persisted session record: creating it
//! after the identity provider confirms sign-in, expiring it after 30 days
//! without activity, refreshing it on app start and foreground, switching the
//! active role, and tearing it down on sign-out. The identity provider, the
//! remote document store and device storage are injected as trait objects.

mod clock;
mod coordination;
mod identity;
mod session;
mod storage;
mod utils;

pub use clock::{Clock, ManualClock, SystemClock};

pub use coordination::{
    AppState, LaunchDecision, LaunchRoute, handle_app_state_change, resolve_launch_route,
    select_role,
};

pub use identity::{Identity, IdentityError, IdentityService, InMemoryIdentityService};

pub use session::{
    CREDENTIAL_VALIDITY, INACTIVITY_THRESHOLD, PROFILE_COLLECTION, ProfileSnapshot, Role,
    RoleEntities, SESSION_STORAGE_KEY, Session, SessionError, SessionManager, TokenClaims,
    TokenStatus, is_session_expired_at,
};

/// Credential encoding and decoding
pub mod token {
    pub use crate::session::{decode, decode_at, encode, encode_at};
}

pub use storage::{
    Document, DocumentStore, InMemoryDocumentStore, InMemoryLocalStore, LOCAL_STORE_TYPE,
    LOCAL_STORE_URL, LocalStore, SqliteLocalStore, StorageError, build_local_store,
    local_store_from_env,
};

