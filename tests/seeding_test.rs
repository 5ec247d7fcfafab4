mod common;

use common::setup_test_app;
use helpdesk_backend::cli::seed::seed_default_accounts;
use helpdesk_backend::coordinators::AuthCoordinator;
use helpdesk_backend::types::db::Role;
use helpdesk_backend::types::dto::auth::LoginDestination;
use helpdesk_backend::types::internal::context::RequestContext;

#[tokio::test]
async fn test_seeding_twice_keeps_one_super_admin() {
    let dir = tempfile::tempdir().unwrap();
    let app_data = setup_test_app(dir.path()).await;
    let ctx = RequestContext::for_cli("init");

    for _ in 0..2 {
        seed_default_accounts(&ctx, &app_data.db, &app_data.user_store, &app_data.crypto_provider)
            .await
            .unwrap();
    }

    let store = &app_data.user_store;
    assert_eq!(store.count_by_role(&app_data.db, Role::SuperAdmin).await.unwrap(), 1);
    assert_eq!(store.list_all(&app_data.db).await.unwrap().len(), 7);
}

#[tokio::test]
async fn test_seeded_accounts_can_log_in_at_their_entry_points() {
    let dir = tempfile::tempdir().unwrap();
    let app_data = setup_test_app(dir.path()).await;
    let ctx = RequestContext::for_cli("init");
    seed_default_accounts(&ctx, &app_data.db, &app_data.user_store, &app_data.crypto_provider)
        .await
        .unwrap();
    let auth = AuthCoordinator::new(app_data.clone());
    let request = RequestContext::new().with_ip_address("10.0.0.9".parse().unwrap());

    let boss = auth.admin_login(&request, "superadmin", "super123").await.unwrap();
    assert_eq!(boss.destination, LoginDestination::SuperAdminDashboard);
    assert_eq!(boss.user.ip_address.as_deref(), Some("10.0.0.9"));

    let admin = auth.admin_login(&request, "sathish", "admin123").await.unwrap();
    assert_eq!(admin.destination, LoginDestination::AdminDashboard);
    assert_eq!(admin.user.department.as_deref(), Some("IT Software"));

    let user = auth.user_login(&request, "testuser", "test123").await.unwrap();
    assert_eq!(user.destination, LoginDestination::UserDashboard);

    assert!(auth.user_login(&request, "superadmin", "super123").await.is_err());
}
