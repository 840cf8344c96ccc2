//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod tenant;

use secrecy::SecretString;
use thiserror::Error;

use washboard_admin::db::RepositoryError;
use washboard_core::SchemaNameError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid schema name: {0}")]
    InvalidSchema(#[from] SchemaNameError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Connect a pool from `DATABASE_URL` (also read from `.env`).
pub(crate) async fn connect() -> Result<sqlx::PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| CliError::MissingEnvVar("DATABASE_URL"))?;

    Ok(washboard_admin::db::create_pool(&SecretString::from(database_url)).await?)
}
