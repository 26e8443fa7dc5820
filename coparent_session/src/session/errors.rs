use thiserror::Error;

use crate::identity::IdentityError;
use crate::session::types::Role;
use crate::storage::StorageError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// Local persistent storage could not be written or cleared
    #[error("Local storage error: {0}")]
    Storage(#[from] StorageError),

    /// The identity provider rejected or failed an operation
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("No identity is signed in at the provider")]
    NoIdentity,

    #[error("Unknown role: {0}")]
    InvalidRole(String),

    #[error("Subject is not entitled to role {0}")]
    NotEntitled(Role),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}
