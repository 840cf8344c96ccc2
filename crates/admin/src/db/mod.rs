//! Tenant-scoped database access.
//!
//! # Multi-tenancy
//!
//! Every tenant's tables live in the tenant's own `PostgreSQL` schema; the
//! shared reference data lives in `public`. A request binds one pooled
//! connection to one tenant schema for its whole unit of work (see
//! [`tenancy`]), so unqualified table names in the repositories below always
//! resolve inside the bound tenant. Isolation is a property of the session,
//! not of per-query filtering.
//!
//! # Tables (per tenant schema)
//!
//! - `countries` / `states` / `cities` - location reference data
//! - `saas_admins` - platform administrators
//! - `stores` - stores with ULID primary keys
//! - `store_details` - one live detail row per store
//! - `store_contact_details` - contact rows per store detail
//! - `holidays` - per-store holiday calendar
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and applied to every
//! tenant schema via:
//! ```bash
//! cargo run -p washboard-cli -- migrate all
//! ```

pub mod holidays;
pub mod locations;
pub mod saas_admins;
pub mod soft_delete;
pub mod stores;
pub mod tenancy;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use holidays::HolidayRepository;
pub use locations::{CityRepository, CountryRepository, StateRepository};
pub use saas_admins::SaasAdminRepository;
pub use soft_delete::SoftDeletable;
pub use stores::StoreRepository;
pub use tenancy::{TenantDb, TenantSession, bind_schema};

/// Embedded migrations, applied per tenant schema by the CLI and tests.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found (or is soft-deleted).
    #[error("not found")]
    NotFound,

    /// Constraint violation, naming the conflicting field.
    #[error("conflict on {field}: {message}")]
    Conflict {
        /// The field whose constraint was violated.
        field: &'static str,
        /// Human-readable description.
        message: String,
    },

    /// The requested tenant schema does not exist in the database.
    ///
    /// Fatal for the unit of work; there is no fallback to another schema.
    #[error("unknown tenant schema: {0}")]
    UnknownSchema(String),
}

impl RepositoryError {
    /// Shorthand for a uniqueness conflict on a named field.
    #[must_use]
    pub fn conflict(field: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            field,
            message: message.into(),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// Connections are untagged (`RESET search_path`) every time they return to
/// the pool, so a tenant binding can never leak from one checkout to the
/// next.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .after_release(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("RESET search_path").execute(&mut *conn).await?;
                Ok(true)
            })
        })
        .connect(database_url.expose_secret())
        .await
}
