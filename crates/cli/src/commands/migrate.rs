//! Multi-tenant database migrations.
//!
//! Every tenant schema receives the same structural migration: the command
//! discovers the schemas present in the database, binds a connection to each
//! one in turn, and runs the embedded migrator against it. Each schema keeps
//! its own `_sqlx_migrations` bookkeeping table, so tenants can be migrated
//! independently.

use sqlx::PgPool;

use washboard_admin::db::{MIGRATOR, bind_schema};
use washboard_core::SchemaName;

use super::CliError;

/// Schemas that belong to `PostgreSQL`, not to tenants.
const SYSTEM_SCHEMAS: &[&str] = &["pg_catalog", "information_schema", "pg_toast"];

/// Migrate every tenant schema found in the database.
///
/// # Errors
///
/// Returns `CliError` if discovery, binding, or a migration fails. Failure
/// stops at the offending tenant; already-migrated tenants stay migrated.
pub async fn all() -> Result<(), CliError> {
    let pool = super::connect().await?;

    let schemas = fetch_tenant_schemas(&pool).await?;
    if schemas.is_empty() {
        tracing::warn!("no tenant schemas found, nothing to migrate");
        return Ok(());
    }

    for schema in &schemas {
        migrate_schema(&pool, schema).await?;
    }

    tracing::info!(count = schemas.len(), "all tenant schemas migrated");
    Ok(())
}

/// Migrate a single tenant schema.
///
/// # Errors
///
/// Returns `CliError` if the name is invalid or the migration fails.
pub async fn tenant(schema: &str) -> Result<(), CliError> {
    let schema = SchemaName::parse(schema)?;
    let pool = super::connect().await?;
    migrate_schema(&pool, &schema).await
}

/// List tenant schemas, excluding the `PostgreSQL` system namespaces.
pub(crate) async fn fetch_tenant_schemas(pool: &PgPool) -> Result<Vec<SchemaName>, CliError> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT schema_name FROM information_schema.schemata \
         WHERE schema_name <> ALL($1) ORDER BY schema_name",
    )
    .bind(SYSTEM_SCHEMAS.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>())
    .fetch_all(pool)
    .await?;

    names
        .iter()
        .map(|name| SchemaName::parse(name).map_err(CliError::from))
        .collect()
}

/// Bind one connection to `schema` and run the embedded migrator on it.
pub(crate) async fn migrate_schema(pool: &PgPool, schema: &SchemaName) -> Result<(), CliError> {
    tracing::info!(%schema, "migrating tenant schema");

    let mut conn = pool.acquire().await?;
    bind_schema(&mut conn, schema).await?;
    MIGRATOR.run(&mut *conn).await?;

    tracing::info!(%schema, "tenant schema migrated");
    Ok(())
}
