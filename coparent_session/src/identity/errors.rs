use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum IdentityError {
    #[error("Sign-out failed: {0}")]
    SignOut(String),
}
