use chrono::{Duration, Utc};
use coparent_session::{
    AppState, INACTIVITY_THRESHOLD, Identity, InMemoryDocumentStore, InMemoryIdentityService, LocalStore, ManualClock,
    Role, Session, SessionError, SessionManager, build_local_store, handle_app_state_change,
    resolve_launch_route, select_role,
};
use std::sync::Arc;

pub(crate) fn manager_for(local: Arc<dyn LocalStore>) -> SessionManager {
    SessionManager::new(
        local,
        Arc::new(InMemoryIdentityService::new()),
        Arc::new(InMemoryDocumentStore::new()),
    )
}

pub(crate) async fn sign_in(
    manager: &SessionManager,
    subject: String,
    email: String,
    role: Role,
) -> Result<(), SessionError> {
    let session = manager
        .create_and_persist_session(&Identity::new(subject, email), role)
        .await?;
    print_session(&session);
    Ok(())
}

pub(crate) async fn launch(manager: &SessionManager) {
    let decision = resolve_launch_route(manager).await;
    println!("route: {:?}", decision.route);
    if let Some(session) = decision.session {
        print_session(&session);
    }
}

pub(crate) async fn foreground(manager: &SessionManager) {
    match handle_app_state_change(manager, AppState::Foreground).await {
        Some(route) => println!("navigate: {route:?}"),
        None => println!("session still valid"),
    }
}

pub(crate) async fn switch_role(manager: &SessionManager, role: Role) -> Result<(), SessionError> {
    match select_role(manager, role).await? {
        Some(session) => print_session(&session),
        None => println!("no session"),
    }
    Ok(())
}

pub(crate) async fn sign_out(manager: &SessionManager) -> Result<(), SessionError> {
    manager.clear_session().await?;
    println!("signed out");
    Ok(())
}

pub(crate) async fn show(manager: &SessionManager) {
    match manager.get_persisted_session().await {
        Some(session) => print_session(&session),
        None => println!("no session"),
    }
}

/// Idle period for [`simulate`], or `None` when the simulated clock could not
/// represent it.
pub(crate) fn idle_period(idle_days: i64) -> Option<Duration> {
    let idle = Duration::try_days(idle_days)?;
    let horizon = idle.checked_add(&(INACTIVITY_THRESHOLD * 2))?;
    Utc::now().checked_add_signed(horizon).map(|_| idle)
}

/// Walk through the lifecycle on a throwaway in-memory store with a manual
/// clock, printing what the host router would do at each step.
pub(crate) async fn simulate(idle: Duration) -> Result<(), SessionError> {
    let local = build_local_store("memory", "").await?;
    let clock = Arc::new(ManualClock::starting_now());
    let manager = manager_for(local).with_clock(clock.clone());

    println!("== cold start");
    launch(&manager).await;

    println!("== sign in as parent");
    sign_in(
        &manager,
        "demo-user".to_string(),
        "demo@example.com".to_string(),
        Role::Parent,
    )
    .await?;

    println!("== 12 hours later, back to foreground");
    clock.advance(Duration::hours(12));
    foreground(&manager).await;

    println!("== switch to professional");
    switch_role(&manager, Role::Professional).await?;

    println!("== restart");
    launch(&manager).await;

    println!("== idle for {} days, then foreground", idle.num_days());
    handle_app_state_change(&manager, AppState::Background).await;
    clock.advance(idle);
    foreground(&manager).await;

    println!("== restart");
    launch(&manager).await;

    manager.settle_mirrors().await;
    Ok(())
}

fn print_session(session: &Session) {
    match serde_json::to_string_pretty(session) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to render session: {}", e),
    }
}
