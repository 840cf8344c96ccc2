//! Soft-delete support shared by the entity repositories.
//!
//! Soft-deletable tables carry a nullable `deleted_at` column. Deleting sets
//! the column to the database clock's current time instead of removing the
//! row; default read paths exclude marked rows. The `BEFORE UPDATE` trigger
//! installed by the migrations refreshes `updated_at` on the same statement,
//! so a soft-delete is an audited mutation like any other.

use sqlx::{PgConnection, Postgres};

/// Capability marker for entities that soft-delete.
///
/// Implementors name their table once; [`soft_delete`] and
/// [`exists_any`] build their statements from it.
pub trait SoftDeletable {
    /// Unqualified table name, resolved inside the session's bound schema.
    const TABLE: &'static str;
}

/// Mark a row as deleted.
///
/// Idempotent: the `deleted_at IS NULL` guard means re-deleting an
/// already-deleted row affects zero rows and leaves the original deletion
/// timestamp unchanged. Returns `true` if a live row was marked.
///
/// # Errors
///
/// Returns `sqlx::Error` if the statement fails.
pub async fn soft_delete<T, I>(conn: &mut PgConnection, id: I) -> Result<bool, sqlx::Error>
where
    T: SoftDeletable,
    I: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send,
{
    let statement = format!(
        "UPDATE {} SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        T::TABLE
    );
    let result = sqlx::query(&statement).bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

/// Whether a row exists at all, deleted or not.
///
/// Used by delete paths to distinguish "already soft-deleted" (idempotent
/// success) from "never existed" (not found).
///
/// # Errors
///
/// Returns `sqlx::Error` if the query fails.
pub async fn exists_any<T, I>(conn: &mut PgConnection, id: I) -> Result<bool, sqlx::Error>
where
    T: SoftDeletable,
    I: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send,
{
    let statement = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", T::TABLE);
    sqlx::query_scalar(&statement)
        .bind(id)
        .fetch_one(conn)
        .await
}
