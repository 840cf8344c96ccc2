//! Soft-delete exclusion, audit timestamps, and the uniqueness policy for
//! soft-deleted emails.
//!
//! These tests require a running `PostgreSQL` named by `DATABASE_URL`; run
//! with `cargo test -p washboard-integration-tests -- --ignored`.

use washboard_admin::db::{RepositoryError, SaasAdminRepository};

use washboard_integration_tests::{
    admin_payload, create_tenant, drop_tenant, test_db, unique_schema,
};

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_soft_deleted_rows_vanish_from_default_reads() {
    let db = test_db().await;
    let schema = unique_schema();
    create_tenant(db.pool(), &schema).await;
    let mut session = db.session(&schema).await.expect("session");

    let admin = SaasAdminRepository::new(session.conn())
        .create(&admin_payload("ghost@example.com"), "$2b$12$hash")
        .await
        .expect("create");

    SaasAdminRepository::new(session.conn())
        .soft_delete(admin.id)
        .await
        .expect("soft delete");

    // Default read paths exclude the row...
    let found = SaasAdminRepository::new(session.conn())
        .get(admin.id)
        .await
        .expect("get");
    assert!(found.is_none(), "soft-deleted admin visible via default get");

    // ...but the explicit opt-in still returns it, with deleted_at set.
    let found = SaasAdminRepository::new(session.conn())
        .get_including_deleted(admin.id)
        .await
        .expect("get including deleted")
        .expect("row is physically retained");
    assert!(found.deleted_at.is_some());

    drop(session);
    drop_tenant(db.pool(), &schema).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_re_deleting_is_idempotent_and_keeps_the_original_timestamp() {
    let db = test_db().await;
    let schema = unique_schema();
    create_tenant(db.pool(), &schema).await;
    let mut session = db.session(&schema).await.expect("session");

    let admin = SaasAdminRepository::new(session.conn())
        .create(&admin_payload("twice@example.com"), "$2b$12$hash")
        .await
        .expect("create");

    SaasAdminRepository::new(session.conn())
        .soft_delete(admin.id)
        .await
        .expect("first delete");
    let first = SaasAdminRepository::new(session.conn())
        .get_including_deleted(admin.id)
        .await
        .expect("get")
        .expect("row exists")
        .deleted_at
        .expect("deleted_at set");

    SaasAdminRepository::new(session.conn())
        .soft_delete(admin.id)
        .await
        .expect("second delete is not an error");
    let second = SaasAdminRepository::new(session.conn())
        .get_including_deleted(admin.id)
        .await
        .expect("get")
        .expect("row exists")
        .deleted_at
        .expect("deleted_at still set");

    assert_eq!(first, second, "re-delete must not refresh the timestamp");

    drop(session);
    drop_tenant(db.pool(), &schema).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_created_at_is_immutable_and_updated_at_moves_forward() {
    let db = test_db().await;
    let schema = unique_schema();
    create_tenant(db.pool(), &schema).await;
    let mut session = db.session(&schema).await.expect("session");

    let admin = SaasAdminRepository::new(session.conn())
        .create(&admin_payload("audit@example.com"), "$2b$12$hash")
        .await
        .expect("create");
    let created_at = admin.audit.created_at;
    let updated_at = admin.audit.updated_at;

    let mut changed = admin_payload("audit@example.com");
    changed.first_name = "Renamed".to_owned();
    let after_update = SaasAdminRepository::new(session.conn())
        .update(admin.id, &changed, true)
        .await
        .expect("update");

    assert_eq!(
        after_update.audit.created_at, created_at,
        "created_at changed across an update"
    );
    assert!(
        after_update.audit.updated_at >= updated_at,
        "updated_at moved backwards"
    );

    // Soft-delete is a mutation like any other: it refreshes updated_at too.
    SaasAdminRepository::new(session.conn())
        .soft_delete(admin.id)
        .await
        .expect("soft delete");
    let deleted = SaasAdminRepository::new(session.conn())
        .get_including_deleted(admin.id)
        .await
        .expect("get")
        .expect("row exists");
    assert_eq!(deleted.audit.created_at, created_at);
    assert!(deleted.audit.updated_at >= after_update.audit.updated_at);

    drop(session);
    drop_tenant(db.pool(), &schema).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_live_email_conflicts_but_soft_deleted_email_is_free() {
    let db = test_db().await;
    let schema = unique_schema();
    create_tenant(db.pool(), &schema).await;
    let mut session = db.session(&schema).await.expect("session");

    let first = SaasAdminRepository::new(session.conn())
        .create(&admin_payload("shared@example.com"), "$2b$12$hash")
        .await
        .expect("create first");

    // A live duplicate is rejected with a conflict naming the field, and no
    // second row is persisted.
    let duplicate = SaasAdminRepository::new(session.conn())
        .create(&admin_payload("shared@example.com"), "$2b$12$hash")
        .await;
    assert!(matches!(
        duplicate,
        Err(RepositoryError::Conflict { field: "email", .. })
    ));
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM saas_admins")
        .fetch_one(session.conn())
        .await
        .expect("count");
    assert_eq!(total, 1);

    // After a soft delete the address is free again.
    SaasAdminRepository::new(session.conn())
        .soft_delete(first.id)
        .await
        .expect("soft delete");
    let replacement = SaasAdminRepository::new(session.conn())
        .create(&admin_payload("shared@example.com"), "$2b$12$hash")
        .await
        .expect("re-create with a soft-deleted email");
    assert_ne!(replacement.id, first.id);

    drop(session);
    drop_tenant(db.pool(), &schema).await;
}
