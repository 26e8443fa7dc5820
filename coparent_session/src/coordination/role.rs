use crate::session::{Role, Session, SessionError, SessionManager};

/// Switch the active role after checking the subject is entitled to it.
///
/// An empty entitlement set means the profile could not be read when the
/// session was created; the switch is allowed in that case. Returns
/// `Ok(None)` when there is no valid session.
pub async fn select_role(
    manager: &SessionManager,
    role: Role,
) -> Result<Option<Session>, SessionError> {
    let Some(session) = manager.get_persisted_session().await else {
        return Ok(None);
    };

    if !session.entitled_roles.is_empty() && !session.is_entitled_to(role) {
        tracing::warn!(subject_id = %session.subject_id, %role, "Role selection refused");
        return Err(SessionError::NotEntitled(role));
    }

    if session.active_role == role {
        return Ok(Some(session));
    }

    manager.set_active_session_role(role).await
}
