//! Shared helpers for the database-backed integration tests.
//!
//! Each test provisions throwaway tenant schemas (unique names, dropped on
//! the way out) so the whole suite can run concurrently against one
//! database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::SecretString;
use sqlx::PgPool;

use washboard_admin::db::{MIGRATOR, TenantDb, bind_schema, create_pool};
use washboard_admin::models::{
    CreateSaasAdminRequest, CreateStoreRequest, NewSaasAdmin, StoreContactInput, StoreDetailInput,
};
use washboard_core::{CityId, CountryId, SaasAdminId, SchemaName, StateId};

/// Connect to the test database named by `DATABASE_URL`.
///
/// # Panics
///
/// Panics when the variable is missing or the database is unreachable -
/// these tests only run against explicitly provided infrastructure.
pub async fn test_db() -> TenantDb {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a disposable test database");
    let pool = create_pool(&SecretString::from(url))
        .await
        .expect("failed to connect to the test database");
    TenantDb::new(pool)
}

/// A unique, valid tenant schema name for one test.
#[must_use]
pub fn unique_schema() -> SchemaName {
    let name = format!("t{}", uuid::Uuid::new_v4().simple());
    SchemaName::parse(&name).expect("generated schema name is valid")
}

/// Create and migrate a throwaway tenant schema.
///
/// # Panics
///
/// Panics when schema creation or migration fails.
pub async fn create_tenant(pool: &PgPool, schema: &SchemaName) {
    let statement = format!(r#"CREATE SCHEMA "{schema}""#);
    sqlx::query(&statement)
        .execute(pool)
        .await
        .expect("failed to create tenant schema");

    let mut conn = pool.acquire().await.expect("failed to acquire connection");
    bind_schema(&mut conn, schema)
        .await
        .expect("failed to bind schema");
    MIGRATOR
        .run(&mut *conn)
        .await
        .expect("failed to migrate tenant schema");
}

/// Drop a throwaway tenant schema and everything in it.
///
/// # Panics
///
/// Panics when the drop fails.
pub async fn drop_tenant(pool: &PgPool, schema: &SchemaName) {
    let statement = format!(r#"DROP SCHEMA "{schema}" CASCADE"#);
    sqlx::query(&statement)
        .execute(pool)
        .await
        .expect("failed to drop tenant schema");
}

/// A valid SAAS admin payload with a caller-chosen email.
#[must_use]
pub fn admin_payload(email: &str) -> NewSaasAdmin {
    CreateSaasAdminRequest {
        first_name: "Asha".to_owned(),
        last_name: "Verma".to_owned(),
        username: "asha.verma".to_owned(),
        email: email.to_owned(),
        phone_number: "9876543210".to_owned(),
    }
    .validate()
    .expect("fixture payload is valid")
}

/// Seed one country/state/city row and return their ids.
///
/// # Panics
///
/// Panics when any insert fails.
pub async fn seed_location(conn: &mut sqlx::PgConnection) -> (CountryId, StateId, CityId) {
    let country_id: CountryId = sqlx::query_scalar(
        "INSERT INTO countries (name, currency) VALUES ('India', 'INR') RETURNING id",
    )
    .fetch_one(&mut *conn)
    .await
    .expect("failed to seed country");

    let state_id: StateId = sqlx::query_scalar(
        "INSERT INTO states (country_id, name, state_type) VALUES ($1, 'Karnataka', 10) \
         RETURNING id",
    )
    .bind(country_id)
    .fetch_one(&mut *conn)
    .await
    .expect("failed to seed state");

    let city_id: CityId = sqlx::query_scalar(
        "INSERT INTO cities (state_id, name) VALUES ($1, 'Bengaluru') RETURNING id",
    )
    .bind(state_id)
    .fetch_one(&mut *conn)
    .await
    .expect("failed to seed city");

    (country_id, state_id, city_id)
}

/// A valid store create request wired to seeded location ids.
#[must_use]
pub fn store_payload(
    created_by_id: SaasAdminId,
    country_id: CountryId,
    state_id: StateId,
    city_id: CityId,
) -> CreateStoreRequest {
    CreateStoreRequest {
        name: "Blue Lotus Laundry".to_owned(),
        unique_identifier: Some("BLL-001".to_owned()),
        is_main_store: true,
        created_by_id,
        parent_store_id: None,
        detail: StoreDetailInput {
            country_id,
            state_id,
            city_id,
            description: Some("Full-service laundry".to_owned()),
            slogan: None,
            address: "12 MG Road".to_owned(),
            postal_code: "560001".to_owned(),
            gst: None,
            tin: None,
            services: vec![20],
            sub_services: vec![10, 20],
            has_online_booking: Some(true),
            has_delivery_service: None,
            has_parking_facility: None,
            has_wifi_facility: None,
        },
        contact: StoreContactInput {
            email: "store@example.com".to_owned(),
            phone_country_code: "+91".to_owned(),
            phone_number: "9876543210".to_owned(),
            alternate_email: None,
            alternate_phone_country_code: None,
            alternate_phone_number: None,
            social_links: Some(serde_json::json!({"instagram": "@bluelotus"})),
        },
    }
}
