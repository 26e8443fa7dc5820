mod manager;
mod mirror;
mod profile;
#[cfg(test)]
pub(crate) mod test_utils;

pub use manager::{SessionManager, is_session_expired_at};
