//! Tenant isolation: a session bound to one tenant's schema can never see
//! rows stored under another tenant's schema, even when both schemas hold
//! tables of the same name with overlapping primary keys.
//!
//! These tests require a running `PostgreSQL` named by `DATABASE_URL`; run
//! with `cargo test -p washboard-integration-tests -- --ignored`.

use washboard_admin::db::{RepositoryError, SaasAdminRepository};
use washboard_core::{OrderBy, Pagination};

use washboard_integration_tests::{
    admin_payload, create_tenant, drop_tenant, test_db, unique_schema,
};

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_sessions_bound_to_different_tenants_never_leak_rows() {
    let db = test_db().await;
    let schema_a = unique_schema();
    let schema_b = unique_schema();
    create_tenant(db.pool(), &schema_a).await;
    create_tenant(db.pool(), &schema_b).await;

    // Both tenants get an admin; SERIAL pkeys overlap (both are id 1).
    let mut session_a = db.session(&schema_a).await.expect("session a");
    let admin_a = SaasAdminRepository::new(session_a.conn())
        .create(&admin_payload("tenant-a@example.com"), "$2b$12$hash")
        .await
        .expect("create in tenant a");

    let mut session_b = db.session(&schema_b).await.expect("session b");
    let admin_b = SaasAdminRepository::new(session_b.conn())
        .create(&admin_payload("tenant-b@example.com"), "$2b$12$hash")
        .await
        .expect("create in tenant b");

    assert_eq!(admin_a.id, admin_b.id, "pkeys overlap across schemas");

    // Each session only ever sees its own tenant's rows.
    let page_a = SaasAdminRepository::new(session_a.conn())
        .list(Pagination::default(), Default::default(), OrderBy::Asc)
        .await
        .expect("list tenant a");
    assert_eq!(page_a.total, 1);
    assert_eq!(
        page_a.items.first().expect("one row").email.as_str(),
        "tenant-a@example.com"
    );

    let page_b = SaasAdminRepository::new(session_b.conn())
        .list(Pagination::default(), Default::default(), OrderBy::Asc)
        .await
        .expect("list tenant b");
    assert_eq!(page_b.total, 1);
    assert_eq!(
        page_b.items.first().expect("one row").email.as_str(),
        "tenant-b@example.com"
    );

    drop(session_a);
    drop(session_b);
    drop_tenant(db.pool(), &schema_a).await;
    drop_tenant(db.pool(), &schema_b).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_unknown_schema_is_fatal_not_a_fallback() {
    let db = test_db().await;
    let ghost = unique_schema();

    let result = db.session(&ghost).await;
    assert!(
        matches!(result, Err(RepositoryError::UnknownSchema(name)) if name == ghost.to_string()),
        "binding an absent schema must fail loudly"
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_connections_are_untagged_when_returned_to_the_pool() {
    let db = test_db().await;
    let schema = unique_schema();
    create_tenant(db.pool(), &schema).await;

    // Bind a session and release it back to the pool.
    let session = db.session(&schema).await.expect("session");
    drop(session);

    // Whatever connection we get next must not carry the old binding.
    let mut conn = db.pool().acquire().await.expect("acquire");
    let search_path: String = sqlx::query_scalar("SHOW search_path")
        .fetch_one(&mut *conn)
        .await
        .expect("show search_path");
    assert!(
        !search_path.contains(schema.as_str()),
        "released connection still bound to {search_path}"
    );

    drop(conn);
    drop_tenant(db.pool(), &schema).await;
}
