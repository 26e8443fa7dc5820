use chrono::Duration;
use std::sync::LazyLock;

use crate::utils::env_or;

/// How long a session survives without renewed activity.
pub const INACTIVITY_THRESHOLD: Duration = Duration::days(30);

/// Validity window encoded into a freshly issued credential.
pub const CREDENTIAL_VALIDITY: Duration = Duration::days(30);

const DEFAULT_SESSION_STORAGE_KEY: &str = "coparent_session";
const DEFAULT_PROFILE_COLLECTION: &str = "users";

/// The single local storage key holding the serialized session record.
pub static SESSION_STORAGE_KEY: LazyLock<String> =
    LazyLock::new(|| env_or("SESSION_STORAGE_KEY", DEFAULT_SESSION_STORAGE_KEY));

/// Document store collection holding per-subject profile documents.
pub static PROFILE_COLLECTION: LazyLock<String> =
    LazyLock::new(|| env_or("PROFILE_COLLECTION", DEFAULT_PROFILE_COLLECTION));
