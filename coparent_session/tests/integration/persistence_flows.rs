use chrono::Duration;
use coparent_session::{
    InMemoryDocumentStore, LaunchRoute, LocalStore, Role, RoleEntities, build_local_store,
    resolve_launch_route,
};
use std::sync::Arc;

use crate::common::{Device, SESSION_KEY, identity, start_time};

/// The session survives a process restart on the SQLite device store.
#[tokio::test]
async fn test_sqlite_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("device.db").display());

    let created = {
        let local = build_local_store("sqlite", &url).await.unwrap();
        let device = Device::with_stores(local, Arc::new(InMemoryDocumentStore::new()));
        device
            .launch()
            .create_and_persist_session(&identity("u1"), Role::Professional)
            .await
            .unwrap()
    };

    // A new process opens the same database file
    let local = build_local_store("sqlite", &url).await.unwrap();
    let device = Device::with_stores(local, Arc::new(InMemoryDocumentStore::new()));
    device.clock.advance(Duration::days(2));

    let decision = resolve_launch_route(&device.launch()).await;

    assert_eq!(decision.route, LaunchRoute::ProfessionalHome);
    let session = decision.session.unwrap();
    assert_eq!(session.credential, created.credential);
    assert_eq!(session.expires_at, created.expires_at + Duration::days(2));
}

/// Records written by older app versions, missing fields added since, are
/// still honoured.
#[tokio::test]
async fn test_legacy_record_is_readable() {
    let device = Device::new();
    let issued = start_time().timestamp_millis();
    let expires = (start_time() + Duration::days(30)).timestamp_millis();
    let legacy = format!(
        r#"{{"subjectId":"u1","credential":"x.y.z","issuedAt":{issued},"lastActivityAt":{issued},"expiresAt":{expires}}}"#
    );
    device.local.set(SESSION_KEY, legacy).await.unwrap();

    let session = device.launch().get_persisted_session().await.unwrap();

    assert_eq!(session.subject_id, "u1");
    assert_eq!(session.active_role, Role::Parent);
    assert_eq!(session.role_entities, RoleEntities::Unlinked);
    assert!(session.entitled_roles.is_empty());
}

/// A corrupted record routes to sign-in quietly and does not touch the
/// provider.
#[tokio::test]
async fn test_corrupted_record_routes_to_sign_in() {
    let device = Device::new();
    device
        .local
        .set(SESSION_KEY, "\u{0}garbage".to_string())
        .await
        .unwrap();

    let decision = resolve_launch_route(&device.launch()).await;

    assert_eq!(decision.route, LaunchRoute::SignIn);
    assert_eq!(device.provider.sign_out_calls(), 0);
}
