//! Tenant schema provisioning.

use washboard_core::SchemaName;

use super::CliError;
use super::migrate::migrate_schema;

/// Create a tenant schema and apply migrations to it.
///
/// Idempotent: an existing schema is left alone and simply migrated to the
/// current version.
///
/// # Errors
///
/// Returns `CliError` if the name is invalid or creation/migration fails.
pub async fn create(schema: &str) -> Result<(), CliError> {
    let schema = SchemaName::parse(schema)?;
    let pool = super::connect().await?;

    // SchemaName validation makes the interpolation safe; schema names
    // cannot be bound as parameters.
    let statement = format!(r#"CREATE SCHEMA IF NOT EXISTS "{schema}""#);
    sqlx::query(&statement).execute(&pool).await?;
    tracing::info!(%schema, "tenant schema ensured");

    migrate_schema(&pool, &schema).await
}
