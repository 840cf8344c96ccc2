//! SAAS admin repository.
//!
//! All statements run on the caller's tenant-bound connection, so table names
//! stay unqualified. Queries are runtime-checked (`sqlx::query_as`) with
//! internal row structs converted into domain models.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use washboard_core::{Email, OrderBy, Page, Pagination, Phone, SaasAdminId};

use super::RepositoryError;
use super::soft_delete::{SoftDeletable, exists_any, soft_delete};
use crate::models::{AuditStamps, NewSaasAdmin, SaasAdmin, SaasAdminSortBy};

/// Column list shared by every query that materializes a full admin.
const COLUMNS: &str = "id, first_name, last_name, username, email, phone_number, \
     password, otp, otp_expire_at, is_active, created_at, updated_at, deleted_at";

impl SoftDeletable for SaasAdmin {
    const TABLE: &'static str = "saas_admins";
}

// =============================================================================
// Internal Row Type
// =============================================================================

/// Internal row type for `PostgreSQL` SAAS admin queries.
#[derive(Debug, sqlx::FromRow)]
struct SaasAdminRow {
    id: SaasAdminId,
    first_name: String,
    last_name: String,
    username: String,
    email: String,
    phone_number: String,
    password: String,
    otp: Option<String>,
    otp_expire_at: Option<DateTime<Utc>>,
    is_active: bool,
    #[sqlx(flatten)]
    audit: AuditStamps,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<SaasAdminRow> for SaasAdmin {
    type Error = RepositoryError;

    fn try_from(row: SaasAdminRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let phone_number = Phone::parse(&row.phone_number).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone number in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            username: row.username,
            email,
            phone_number,
            password_hash: row.password,
            otp: row.otp,
            otp_expire_at: row.otp_expire_at,
            is_active: row.is_active,
            audit: row.audit,
            deleted_at: row.deleted_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for SAAS admin database operations.
pub struct SaasAdminRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> SaasAdminRepository<'c> {
    /// Create a repository over a tenant-bound connection or transaction.
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// List live admins, paginated and sorted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list(
        &mut self,
        pagination: Pagination,
        sort_by: SaasAdminSortBy,
        order_by: OrderBy,
    ) -> Result<Page<SaasAdmin>, RepositoryError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM saas_admins WHERE deleted_at IS NULL")
                .fetch_one(&mut *self.conn)
                .await?;

        let statement = format!(
            "SELECT {COLUMNS} FROM saas_admins WHERE deleted_at IS NULL \
             ORDER BY {} {} LIMIT $1 OFFSET $2",
            sort_by.as_column(),
            order_by.as_sql(),
        );
        let rows: Vec<SaasAdminRow> = sqlx::query_as(&statement)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&mut *self.conn)
            .await?;

        let items: Vec<SaasAdmin> = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()?;
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), pagination))
    }

    /// Get a live admin by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get(&mut self, id: SaasAdminId) -> Result<Option<SaasAdmin>, RepositoryError> {
        let statement =
            format!("SELECT {COLUMNS} FROM saas_admins WHERE id = $1 AND deleted_at IS NULL");
        let row: Option<SaasAdminRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        row.map(TryInto::try_into).transpose()
    }

    /// Get an admin by ID regardless of soft-delete state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_including_deleted(
        &mut self,
        id: SaasAdminId,
    ) -> Result<Option<SaasAdmin>, RepositoryError> {
        let statement = format!("SELECT {COLUMNS} FROM saas_admins WHERE id = $1");
        let row: Option<SaasAdminRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        row.map(TryInto::try_into).transpose()
    }

    /// Whether a live admin already uses `email`, optionally excluding one
    /// admin (for update pre-checks).
    ///
    /// Soft-deleted rows do not count; their emails are free for reuse.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_exists(
        &mut self,
        email: &Email,
        exclude: Option<SaasAdminId>,
    ) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM saas_admins \
             WHERE email = $1 AND deleted_at IS NULL AND ($2::integer IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(exists)
    }

    /// Create a new admin with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming `email` if a live admin
    /// already uses the address.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &mut self,
        new_admin: &NewSaasAdmin,
        password_hash: &str,
    ) -> Result<SaasAdmin, RepositoryError> {
        let statement = format!(
            "INSERT INTO saas_admins \
             (first_name, last_name, username, email, phone_number, password, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, false) \
             RETURNING {COLUMNS}"
        );
        let row: SaasAdminRow = sqlx::query_as(&statement)
            .bind(&new_admin.first_name)
            .bind(&new_admin.last_name)
            .bind(&new_admin.username)
            .bind(&new_admin.email)
            .bind(&new_admin.phone_number)
            .bind(password_hash)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::conflict("email", "email already exists");
                }
                RepositoryError::Database(e)
            })?;

        row.try_into()
    }

    /// Replace the mutable fields of a live admin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the admin doesn't exist or is
    /// soft-deleted.
    /// Returns `RepositoryError::Conflict` naming `email` if another live
    /// admin already uses the address.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &mut self,
        id: SaasAdminId,
        admin: &NewSaasAdmin,
        is_active: bool,
    ) -> Result<SaasAdmin, RepositoryError> {
        let statement = format!(
            "UPDATE saas_admins SET first_name = $2, last_name = $3, username = $4, \
             email = $5, phone_number = $6, is_active = $7 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        let row: Option<SaasAdminRow> = sqlx::query_as(&statement)
            .bind(id)
            .bind(&admin.first_name)
            .bind(&admin.last_name)
            .bind(&admin.username)
            .bind(&admin.email)
            .bind(&admin.phone_number)
            .bind(is_active)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::conflict("email", "email already exists");
                }
                RepositoryError::Database(e)
            })?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Soft-delete an admin.
    ///
    /// Idempotent: deleting an already-deleted admin succeeds without
    /// touching the original deletion timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such admin ever existed.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn soft_delete(&mut self, id: SaasAdminId) -> Result<(), RepositoryError> {
        if soft_delete::<SaasAdmin, _>(&mut *self.conn, id).await? {
            return Ok(());
        }
        if exists_any::<SaasAdmin, _>(&mut *self.conn, id).await? {
            return Ok(()); // already deleted
        }
        Err(RepositoryError::NotFound)
    }
}
