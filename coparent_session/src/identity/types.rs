use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::IdentityError;

/// An identity confirmed by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned subject identifier
    pub subject_id: String,
    /// Email-like contact string, informational only
    pub contact_address: String,
}

impl Identity {
    pub fn new(subject_id: impl Into<String>, contact_address: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            contact_address: contact_address.into(),
        }
    }
}

/// The identity provider as seen from the session core. Sign-in and sign-up
/// flows live with the provider SDK; only the current identity and sign-out
/// are needed here.
#[async_trait]
pub trait IdentityService: Send + Sync + 'static {
    async fn current_identity(&self) -> Option<Identity>;

    async fn sign_out(&self) -> Result<(), IdentityError>;
}
