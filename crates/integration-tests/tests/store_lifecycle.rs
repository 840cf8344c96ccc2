//! Store creation as a unit of work: all three rows commit together or not
//! at all, and the ULID primary key behaves as a sortable identifier.
//!
//! These tests require a running `PostgreSQL` named by `DATABASE_URL`; run
//! with `cargo test -p washboard-integration-tests -- --ignored`.

use washboard_admin::db::{RepositoryError, SaasAdminRepository, StoreRepository};
use washboard_core::CountryId;

use washboard_integration_tests::{
    admin_payload, create_tenant, drop_tenant, seed_location, store_payload, test_db,
    unique_schema,
};

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_store_create_persists_all_three_rows_together() {
    let db = test_db().await;
    let schema = unique_schema();
    create_tenant(db.pool(), &schema).await;
    let mut session = db.session(&schema).await.expect("session");

    let admin = SaasAdminRepository::new(session.conn())
        .create(&admin_payload("owner@example.com"), "$2b$12$hash")
        .await
        .expect("create admin");
    let (country_id, state_id, city_id) = seed_location(session.conn()).await;

    let (new_store, new_detail, new_contact) =
        store_payload(admin.id, country_id, state_id, city_id)
            .validate()
            .expect("valid payload");
    let created = StoreRepository::new(session.conn())
        .create_with_details(&new_store, &new_detail, &new_contact)
        .await
        .expect("create store");

    assert_eq!(created.store.id.as_str().len(), 26);
    let detail = created.detail.as_ref().expect("detail row");
    assert_eq!(detail.store_id, created.store.id);
    assert_eq!(created.contact_details.len(), 1);

    // Everything is readable back through the explicit join.
    let fetched = StoreRepository::new(session.conn())
        .get_with_detail(&created.store.id)
        .await
        .expect("get")
        .expect("store exists");
    assert_eq!(fetched.store.name, "Blue Lotus Laundry");
    assert!(fetched.detail.is_some());
    assert_eq!(fetched.contact_details.len(), 1);

    drop(session);
    drop_tenant(db.pool(), &schema).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_failed_detail_insert_rolls_back_the_store_row() {
    let db = test_db().await;
    let schema = unique_schema();
    create_tenant(db.pool(), &schema).await;
    let mut session = db.session(&schema).await.expect("session");

    let admin = SaasAdminRepository::new(session.conn())
        .create(&admin_payload("owner@example.com"), "$2b$12$hash")
        .await
        .expect("create admin");
    let (_, state_id, city_id) = seed_location(session.conn()).await;

    // Point the detail at a country that does not exist: the store insert
    // succeeds inside the transaction, the detail insert fails, and the
    // whole unit of work must vanish.
    let (new_store, new_detail, new_contact) =
        store_payload(admin.id, CountryId::new(999_999), state_id, city_id)
            .validate()
            .expect("payload is structurally valid");
    let result = StoreRepository::new(session.conn())
        .create_with_details(&new_store, &new_detail, &new_contact)
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::Conflict {
            field: "country_id",
            ..
        })
    ));

    let stores: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores")
        .fetch_one(session.conn())
        .await
        .expect("count stores");
    assert_eq!(stores, 0, "store row survived a failed unit of work");

    let details: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store_details")
        .fetch_one(session.conn())
        .await
        .expect("count details");
    assert_eq!(details, 0);

    drop(session);
    drop_tenant(db.pool(), &schema).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_store_ids_sort_by_creation_time() {
    let db = test_db().await;
    let schema = unique_schema();
    create_tenant(db.pool(), &schema).await;
    let mut session = db.session(&schema).await.expect("session");

    let admin = SaasAdminRepository::new(session.conn())
        .create(&admin_payload("owner@example.com"), "$2b$12$hash")
        .await
        .expect("create admin");
    let (country_id, state_id, city_id) = seed_location(session.conn()).await;

    let mut ids = Vec::new();
    for n in 0..3 {
        let mut payload = store_payload(admin.id, country_id, state_id, city_id);
        payload.unique_identifier = Some(format!("BLL-{n:03}"));
        let (new_store, new_detail, new_contact) =
            payload.validate().expect("valid payload");
        let created = StoreRepository::new(session.conn())
            .create_with_details(&new_store, &new_detail, &new_contact)
            .await
            .expect("create store");
        ids.push(created.store.id);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted, "creation order and lexical order disagree");

    drop(session);
    drop_tenant(db.pool(), &schema).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_duplicate_unique_identifier_is_a_field_conflict() {
    let db = test_db().await;
    let schema = unique_schema();
    create_tenant(db.pool(), &schema).await;
    let mut session = db.session(&schema).await.expect("session");

    let admin = SaasAdminRepository::new(session.conn())
        .create(&admin_payload("owner@example.com"), "$2b$12$hash")
        .await
        .expect("create admin");
    let (country_id, state_id, city_id) = seed_location(session.conn()).await;

    let (new_store, new_detail, new_contact) =
        store_payload(admin.id, country_id, state_id, city_id)
            .validate()
            .expect("valid payload");
    StoreRepository::new(session.conn())
        .create_with_details(&new_store, &new_detail, &new_contact)
        .await
        .expect("first create");

    let (dup_store, dup_detail, dup_contact) =
        store_payload(admin.id, country_id, state_id, city_id)
            .validate()
            .expect("valid payload");
    let result = StoreRepository::new(session.conn())
        .create_with_details(&dup_store, &dup_detail, &dup_contact)
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::Conflict {
            field: "unique_identifier",
            ..
        })
    ));

    drop(session);
    drop_tenant(db.pool(), &schema).await;
}
