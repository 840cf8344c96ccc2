//! Holiday repository, always scoped to a store.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use washboard_core::{HolidayId, HolidayType, OrderBy, Page, Pagination, SaasAdminId, StoreId};

use super::RepositoryError;
use super::soft_delete::{SoftDeletable, exists_any, soft_delete};
use crate::models::{AuditStamps, Holiday, HolidaySortBy, NewHoliday};

const COLUMNS: &str = "id, store_id, created_by_id, date, holiday_type, reason, \
     from_time, to_time, created_at, updated_at, deleted_at";

impl SoftDeletable for Holiday {
    const TABLE: &'static str = "holidays";
}

// =============================================================================
// Internal Row Type
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct HolidayRow {
    id: HolidayId,
    store_id: StoreId,
    created_by_id: Option<SaasAdminId>,
    date: chrono::NaiveDate,
    holiday_type: HolidayType,
    reason: String,
    from_time: Option<chrono::NaiveTime>,
    to_time: Option<chrono::NaiveTime>,
    #[sqlx(flatten)]
    audit: AuditStamps,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<HolidayRow> for Holiday {
    fn from(row: HolidayRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            created_by_id: row.created_by_id,
            date: row.date,
            holiday_type: row.holiday_type,
            reason: row.reason,
            from_time: row.from_time,
            to_time: row.to_time,
            audit: row.audit,
            deleted_at: row.deleted_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for holiday database operations.
pub struct HolidayRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> HolidayRepository<'c> {
    /// Create a repository over a tenant-bound connection or transaction.
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// List a store's live holidays, paginated and sorted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_by_store(
        &mut self,
        store_id: &StoreId,
        pagination: Pagination,
        sort_by: HolidaySortBy,
        order_by: OrderBy,
    ) -> Result<Page<Holiday>, RepositoryError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM holidays WHERE store_id = $1 AND deleted_at IS NULL",
        )
        .bind(store_id)
        .fetch_one(&mut *self.conn)
        .await?;

        let statement = format!(
            "SELECT {COLUMNS} FROM holidays WHERE store_id = $1 AND deleted_at IS NULL \
             ORDER BY {} {} LIMIT $2 OFFSET $3",
            sort_by.as_column(),
            order_by.as_sql(),
        );
        let rows: Vec<HolidayRow> = sqlx::query_as(&statement)
            .bind(store_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&mut *self.conn)
            .await?;

        let items = rows.into_iter().map(Holiday::from).collect();
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), pagination))
    }

    /// Get a live holiday belonging to a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &mut self,
        store_id: &StoreId,
        id: HolidayId,
    ) -> Result<Option<Holiday>, RepositoryError> {
        let statement = format!(
            "SELECT {COLUMNS} FROM holidays \
             WHERE id = $1 AND store_id = $2 AND deleted_at IS NULL"
        );
        let row: Option<HolidayRow> = sqlx::query_as(&statement)
            .bind(id)
            .bind(store_id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(Holiday::from))
    }

    /// Get a holiday by ID regardless of soft-delete state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_including_deleted(
        &mut self,
        id: HolidayId,
    ) -> Result<Option<Holiday>, RepositoryError> {
        let statement = format!("SELECT {COLUMNS} FROM holidays WHERE id = $1");
        let row: Option<HolidayRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(Holiday::from))
    }

    /// Insert a new holiday for a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming `store_id` if the store
    /// does not exist (foreign key).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &mut self,
        store_id: &StoreId,
        holiday: &NewHoliday,
    ) -> Result<Holiday, RepositoryError> {
        let statement = format!(
            "INSERT INTO holidays \
             (store_id, created_by_id, date, holiday_type, reason, from_time, to_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let row: HolidayRow = sqlx::query_as(&statement)
            .bind(store_id)
            .bind(holiday.created_by_id)
            .bind(holiday.date)
            .bind(holiday.holiday_type)
            .bind(&holiday.reason)
            .bind(holiday.from_time)
            .bind(holiday.to_time)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::conflict("store_id", "store does not exist");
                }
                RepositoryError::Database(e)
            })?;
        Ok(row.into())
    }

    /// Replace the mutable fields of a live holiday.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the holiday doesn't exist, is
    /// soft-deleted, or belongs to another store.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &mut self,
        store_id: &StoreId,
        id: HolidayId,
        holiday: &NewHoliday,
    ) -> Result<Holiday, RepositoryError> {
        let statement = format!(
            "UPDATE holidays SET date = $3, holiday_type = $4, reason = $5, \
             from_time = $6, to_time = $7 \
             WHERE id = $1 AND store_id = $2 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        let row: Option<HolidayRow> = sqlx::query_as(&statement)
            .bind(id)
            .bind(store_id)
            .bind(holiday.date)
            .bind(holiday.holiday_type)
            .bind(&holiday.reason)
            .bind(holiday.from_time)
            .bind(holiday.to_time)
            .fetch_optional(&mut *self.conn)
            .await?;
        row.map(Holiday::from).ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete a holiday. Idempotent for already-deleted rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such holiday ever existed.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn soft_delete(&mut self, id: HolidayId) -> Result<(), RepositoryError> {
        if soft_delete::<Holiday, _>(&mut *self.conn, id).await? {
            return Ok(());
        }
        if exists_any::<Holiday, _>(&mut *self.conn, id).await? {
            return Ok(());
        }
        Err(RepositoryError::NotFound)
    }
}
