use crate::session::{Role, Session, SessionManager};

/// Landing area the host router should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchRoute {
    /// Unauthenticated entry point
    SignIn,
    ParentHome,
    ProfessionalHome,
}

impl From<Role> for LaunchRoute {
    fn from(role: Role) -> Self {
        match role {
            Role::Parent => LaunchRoute::ParentHome,
            Role::Professional => LaunchRoute::ProfessionalHome,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LaunchDecision {
    pub route: LaunchRoute,
    pub session: Option<Session>,
}

/// Host app lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Foreground,
    Background,
}

/// Decide where the app lands on start.
///
/// A valid session has its activity refreshed and routes to its active role's
/// area. An absent, unreadable or expired session routes to sign-in; expired
/// sessions are torn down on the way.
#[tracing::instrument(skip(manager))]
pub async fn resolve_launch_route(manager: &SessionManager) -> LaunchDecision {
    let Some(session) = manager.get_persisted_session().await else {
        return LaunchDecision {
            route: LaunchRoute::SignIn,
            session: None,
        };
    };

    let session = match manager.update_session_activity(session.clone()).await {
        Ok(refreshed) => refreshed,
        Err(e) => {
            tracing::warn!(error = %e, "Could not refresh session activity on launch");
            session
        }
    };

    let route = LaunchRoute::from(session.active_role);
    tracing::debug!(?route, subject_id = %session.subject_id, "Launch route resolved");

    LaunchDecision {
        route,
        session: Some(session),
    }
}

/// React to a lifecycle transition. Returns a route only when the host must
/// navigate: on foreground with no valid session left, that is sign-in.
pub async fn handle_app_state_change(
    manager: &SessionManager,
    state: AppState,
) -> Option<LaunchRoute> {
    match state {
        AppState::Foreground => {
            if manager.validate_and_refresh_session().await {
                None
            } else {
                tracing::info!("No valid session on foreground");
                Some(LaunchRoute::SignIn)
            }
        }
        AppState::Background => None,
    }
}
