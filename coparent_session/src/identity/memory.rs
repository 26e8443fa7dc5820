use async_trait::async_trait;
use tokio::sync::Mutex;

use super::errors::IdentityError;
use super::types::{Identity, IdentityService};

/// Identity provider stand-in that keeps the signed-in identity in memory.
#[derive(Default)]
pub struct InMemoryIdentityService {
    current: Mutex<Option<Identity>>,
}

impl InMemoryIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sign_in(&self, identity: Identity) {
        tracing::debug!(subject_id = %identity.subject_id, "Identity signed in");
        *self.current.lock().await = Some(identity);
    }
}

#[async_trait]
impl IdentityService for InMemoryIdentityService {
    async fn current_identity(&self) -> Option<Identity> {
        self.current.lock().await.clone()
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        if let Some(identity) = self.current.lock().await.take() {
            tracing::debug!(subject_id = %identity.subject_id, "Identity signed out");
        }
        Ok(())
    }
}
