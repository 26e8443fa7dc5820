mod config;
mod errors;
mod main;
mod token;
mod types;

pub use config::{
    CREDENTIAL_VALIDITY, INACTIVITY_THRESHOLD, PROFILE_COLLECTION, SESSION_STORAGE_KEY,
};
pub use errors::SessionError;
pub use main::{SessionManager, is_session_expired_at};
pub use token::{TokenClaims, TokenStatus, decode, decode_at, encode, encode_at};
pub use types::{ProfileSnapshot, Role, RoleEntities, Session};
