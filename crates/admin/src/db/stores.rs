//! Store repository: stores, their detail row, and contact details.
//!
//! Store creation is one unit of work - store, detail, and contact rows are
//! inserted inside a single transaction so a failure in any insert leaves
//! nothing behind. The ULID primary key makes an insert-time collision
//! possible in principle; it is handled as a retryable condition with a
//! fresh identifier.

use chrono::{DateTime, Utc};
use sqlx::{Connection, PgConnection};

use washboard_core::{
    CityId, CountryId, Email, OrderBy, Page, Pagination, Phone, SaasAdminId, StateId,
    StoreContactDetailId, StoreDetailId, StoreId, StoreService, StoreStatus, StoreSubService,
    decode_codes, encode_codes,
};

use super::RepositoryError;
use super::soft_delete::{SoftDeletable, exists_any, soft_delete};
use crate::models::{
    AuditStamps, NewStore, NewStoreContactDetail, NewStoreDetail, Store, StoreContactDetail,
    StoreDetail, StoreSortBy, StoreUpdate, StoreWithDetail,
};

const STORE_COLUMNS: &str = "id, created_by_id, parent_store_id, name, unique_identifier, \
     is_main_store, status, created_at, updated_at, deleted_at";

const DETAIL_COLUMNS: &str = "id, store_id, country_id, state_id, city_id, description, slogan, \
     address, postal_code, gst, tin, services, sub_services, has_online_booking, \
     has_delivery_service, has_parking_facility, has_wifi_facility, \
     created_at, updated_at, deleted_at";

const CONTACT_COLUMNS: &str = "id, store_detail_id, email, is_email_verified, \
     phone_country_code, phone_number, is_phone_number_verified, alternate_email, \
     is_alternate_email_verified, alternate_phone_country_code, alternate_phone_number, \
     is_alternate_phone_number_verified, social_links, created_at, updated_at, deleted_at";

impl SoftDeletable for Store {
    const TABLE: &'static str = "stores";
}

impl SoftDeletable for StoreDetail {
    const TABLE: &'static str = "store_details";
}

impl SoftDeletable for StoreContactDetail {
    const TABLE: &'static str = "store_contact_details";
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    created_by_id: SaasAdminId,
    parent_store_id: Option<StoreId>,
    name: String,
    unique_identifier: Option<String>,
    is_main_store: bool,
    status: StoreStatus,
    #[sqlx(flatten)]
    audit: AuditStamps,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            created_by_id: row.created_by_id,
            parent_store_id: row.parent_store_id,
            name: row.name,
            unique_identifier: row.unique_identifier,
            is_main_store: row.is_main_store,
            status: row.status,
            audit: row.audit,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StoreDetailRow {
    id: StoreDetailId,
    store_id: StoreId,
    country_id: CountryId,
    state_id: StateId,
    city_id: CityId,
    description: Option<String>,
    slogan: Option<String>,
    address: String,
    postal_code: String,
    gst: Option<String>,
    tin: Option<String>,
    services: Vec<i32>,
    sub_services: Vec<i32>,
    has_online_booking: Option<bool>,
    has_delivery_service: Option<bool>,
    has_parking_facility: Option<bool>,
    has_wifi_facility: Option<bool>,
    #[sqlx(flatten)]
    audit: AuditStamps,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<StoreDetailRow> for StoreDetail {
    type Error = RepositoryError;

    fn try_from(row: StoreDetailRow) -> Result<Self, Self::Error> {
        let services: Vec<StoreService> = decode_codes(row.services).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid service code in database: {e}"))
        })?;
        let sub_services: Vec<StoreSubService> = decode_codes(row.sub_services).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid sub-service code in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            store_id: row.store_id,
            country_id: row.country_id,
            state_id: row.state_id,
            city_id: row.city_id,
            description: row.description,
            slogan: row.slogan,
            address: row.address,
            postal_code: row.postal_code,
            gst: row.gst,
            tin: row.tin,
            services,
            sub_services,
            has_online_booking: row.has_online_booking,
            has_delivery_service: row.has_delivery_service,
            has_parking_facility: row.has_parking_facility,
            has_wifi_facility: row.has_wifi_facility,
            audit: row.audit,
            deleted_at: row.deleted_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StoreContactRow {
    id: StoreContactDetailId,
    store_detail_id: StoreDetailId,
    email: String,
    is_email_verified: bool,
    phone_country_code: String,
    phone_number: String,
    is_phone_number_verified: bool,
    alternate_email: Option<String>,
    is_alternate_email_verified: Option<bool>,
    alternate_phone_country_code: Option<String>,
    alternate_phone_number: Option<String>,
    is_alternate_phone_number_verified: Option<bool>,
    social_links: Option<serde_json::Value>,
    #[sqlx(flatten)]
    audit: AuditStamps,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<StoreContactRow> for StoreContactDetail {
    type Error = RepositoryError;

    fn try_from(row: StoreContactRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let phone_number = Phone::parse(&row.phone_number).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone number in database: {e}"))
        })?;
        let alternate_email = row
            .alternate_email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid alternate email in database: {e}"))
            })?;
        let alternate_phone_number = row
            .alternate_phone_number
            .as_deref()
            .map(Phone::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "invalid alternate phone number in database: {e}"
                ))
            })?;

        Ok(Self {
            id: row.id,
            store_detail_id: row.store_detail_id,
            email,
            is_email_verified: row.is_email_verified,
            phone_country_code: row.phone_country_code,
            phone_number,
            is_phone_number_verified: row.is_phone_number_verified,
            alternate_email,
            is_alternate_email_verified: row.is_alternate_email_verified,
            alternate_phone_country_code: row.alternate_phone_country_code,
            alternate_phone_number,
            is_alternate_phone_number_verified: row.is_alternate_phone_number_verified,
            social_links: row.social_links,
            audit: row.audit,
            deleted_at: row.deleted_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for store database operations.
pub struct StoreRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> StoreRepository<'c> {
    /// Create a repository over a tenant-bound connection or transaction.
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// List live stores, paginated and sorted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &mut self,
        pagination: Pagination,
        sort_by: StoreSortBy,
        order_by: OrderBy,
    ) -> Result<Page<Store>, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores WHERE deleted_at IS NULL")
            .fetch_one(&mut *self.conn)
            .await?;

        let statement = format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE deleted_at IS NULL \
             ORDER BY {} {} LIMIT $1 OFFSET $2",
            sort_by.as_column(),
            order_by.as_sql(),
        );
        let rows: Vec<StoreRow> = sqlx::query_as(&statement)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&mut *self.conn)
            .await?;

        let items = rows.into_iter().map(Store::from).collect();
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), pagination))
    }

    /// Get a live store by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&mut self, id: &StoreId) -> Result<Option<Store>, RepositoryError> {
        let statement =
            format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1 AND deleted_at IS NULL");
        let row: Option<StoreRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(Store::from))
    }

    /// Get a store by ID regardless of soft-delete state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_including_deleted(
        &mut self,
        id: &StoreId,
    ) -> Result<Option<Store>, RepositoryError> {
        let statement = format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1");
        let row: Option<StoreRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(Store::from))
    }

    /// Get a live store joined with its detail and contact rows.
    ///
    /// The joins are explicit eager fetches: one query per relation, no
    /// lazy loading.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_with_detail(
        &mut self,
        id: &StoreId,
    ) -> Result<Option<StoreWithDetail>, RepositoryError> {
        let Some(store) = self.get(id).await? else {
            return Ok(None);
        };

        let statement = format!(
            "SELECT {DETAIL_COLUMNS} FROM store_details WHERE store_id = $1 AND deleted_at IS NULL"
        );
        let detail_row: Option<StoreDetailRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        let detail: Option<StoreDetail> = detail_row.map(TryInto::try_into).transpose()?;

        let contact_details = match &detail {
            None => Vec::new(),
            Some(detail) => {
                let statement = format!(
                    "SELECT {CONTACT_COLUMNS} FROM store_contact_details \
                     WHERE store_detail_id = $1 AND deleted_at IS NULL ORDER BY id"
                );
                let rows: Vec<StoreContactRow> = sqlx::query_as(&statement)
                    .bind(detail.id)
                    .fetch_all(&mut *self.conn)
                    .await?;
                rows.into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<_, _>>()?
            }
        };

        Ok(Some(StoreWithDetail {
            store,
            detail,
            contact_details,
        }))
    }

    /// Create a store with its detail and contact rows in one transaction.
    ///
    /// Either all three rows commit or none do. A ULID primary-key collision
    /// is retried once with a fresh identifier; colliding on
    /// `unique_identifier` is a caller error surfaced as a conflict.
    ///
    /// When the repository already runs inside a transaction, the inner
    /// `begin` nests as a savepoint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` for unique or foreign-key
    /// violations, naming the field.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_details(
        &mut self,
        new_store: &NewStore,
        new_detail: &NewStoreDetail,
        new_contact: &NewStoreContactDetail,
    ) -> Result<StoreWithDetail, RepositoryError> {
        let mut tx = Connection::begin(&mut *self.conn).await?;

        let mut retried = false;
        let store = loop {
            let id = StoreId::generate();
            match insert_store(&mut *tx, &id, new_store).await {
                Ok(store) => break store,
                Err(RepositoryError::Conflict { field: "id", .. }) if !retried => {
                    retried = true;
                }
                Err(e) => return Err(e),
            }
        };

        let detail = insert_detail(&mut *tx, &store.id, new_detail).await?;
        let contact = insert_contact(&mut *tx, detail.id, new_contact).await?;

        tx.commit().await?;

        Ok(StoreWithDetail {
            store,
            detail: Some(detail),
            contact_details: vec![contact],
        })
    }

    /// Replace the mutable fields of a live store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist or is
    /// soft-deleted.
    /// Returns `RepositoryError::Conflict` naming `unique_identifier` or
    /// `parent_store_id` on constraint violations.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &mut self,
        id: &StoreId,
        update: &StoreUpdate,
    ) -> Result<Store, RepositoryError> {
        // The database CHECK enforces this too; failing early gives the
        // caller a field-level error instead of a constraint name.
        if update.parent_store_id.as_ref() == Some(id) {
            return Err(RepositoryError::conflict(
                "parent_store_id",
                "a store cannot be its own parent",
            ));
        }

        let statement = format!(
            "UPDATE stores SET name = $2, status = $3, unique_identifier = $4, \
             is_main_store = $5, parent_store_id = $6 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {STORE_COLUMNS}"
        );
        let row: Option<StoreRow> = sqlx::query_as(&statement)
            .bind(id)
            .bind(&update.name)
            .bind(update.status)
            .bind(&update.unique_identifier)
            .bind(update.is_main_store)
            .bind(&update.parent_store_id)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(map_store_constraint_error)?;

        row.map(Store::from).ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete a store. Idempotent for already-deleted rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such store ever existed.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn soft_delete(&mut self, id: &StoreId) -> Result<(), RepositoryError> {
        if soft_delete::<Store, _>(&mut *self.conn, id).await? {
            return Ok(());
        }
        if exists_any::<Store, _>(&mut *self.conn, id).await? {
            return Ok(());
        }
        Err(RepositoryError::NotFound)
    }
}

// =============================================================================
// Insert Helpers
// =============================================================================

/// Map store-table constraint violations to field-level conflicts.
fn map_store_constraint_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.ends_with("pkey") {
                return RepositoryError::conflict("id", "store id collision");
            }
            return RepositoryError::conflict("unique_identifier", "unique identifier already in use");
        }
        if db_err.is_foreign_key_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("parent_store") {
                return RepositoryError::conflict("parent_store_id", "parent store does not exist");
            }
            if constraint.contains("created_by") {
                return RepositoryError::conflict("created_by_id", "creating admin does not exist");
            }
        }
        if db_err.is_check_violation() {
            return RepositoryError::conflict("parent_store_id", "a store cannot be its own parent");
        }
    }
    RepositoryError::Database(e)
}

async fn insert_store(
    conn: &mut PgConnection,
    id: &StoreId,
    new_store: &NewStore,
) -> Result<Store, RepositoryError> {
    let statement = format!(
        "INSERT INTO stores \
         (id, created_by_id, parent_store_id, name, unique_identifier, is_main_store, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {STORE_COLUMNS}"
    );
    let row: StoreRow = sqlx::query_as(&statement)
        .bind(id)
        .bind(new_store.created_by_id)
        .bind(&new_store.parent_store_id)
        .bind(&new_store.name)
        .bind(&new_store.unique_identifier)
        .bind(new_store.is_main_store)
        .bind(new_store.status)
        .fetch_one(conn)
        .await
        .map_err(map_store_constraint_error)?;
    Ok(row.into())
}

async fn insert_detail(
    conn: &mut PgConnection,
    store_id: &StoreId,
    new_detail: &NewStoreDetail,
) -> Result<StoreDetail, RepositoryError> {
    let statement = format!(
        "INSERT INTO store_details \
         (store_id, country_id, state_id, city_id, description, slogan, address, postal_code, \
          gst, tin, services, sub_services, has_online_booking, has_delivery_service, \
          has_parking_facility, has_wifi_facility) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         RETURNING {DETAIL_COLUMNS}"
    );
    let row: StoreDetailRow = sqlx::query_as(&statement)
        .bind(store_id)
        .bind(new_detail.country_id)
        .bind(new_detail.state_id)
        .bind(new_detail.city_id)
        .bind(&new_detail.description)
        .bind(&new_detail.slogan)
        .bind(&new_detail.address)
        .bind(&new_detail.postal_code)
        .bind(&new_detail.gst)
        .bind(&new_detail.tin)
        .bind(encode_codes(&new_detail.services))
        .bind(encode_codes(&new_detail.sub_services))
        .bind(new_detail.has_online_booking)
        .bind(new_detail.has_delivery_service)
        .bind(new_detail.has_parking_facility)
        .bind(new_detail.has_wifi_facility)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return RepositoryError::conflict("store_id", "store already has a detail row");
                }
                if db_err.is_foreign_key_violation() {
                    let constraint = db_err.constraint().unwrap_or_default();
                    for field in ["country_id", "state_id", "city_id"] {
                        if constraint.contains(field) {
                            return RepositoryError::conflict(field, "referenced row does not exist");
                        }
                    }
                }
            }
            RepositoryError::Database(e)
        })?;
    row.try_into()
}

async fn insert_contact(
    conn: &mut PgConnection,
    store_detail_id: StoreDetailId,
    new_contact: &NewStoreContactDetail,
) -> Result<StoreContactDetail, RepositoryError> {
    let statement = format!(
        "INSERT INTO store_contact_details \
         (store_detail_id, email, phone_country_code, phone_number, alternate_email, \
          alternate_phone_country_code, alternate_phone_number, social_links) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {CONTACT_COLUMNS}"
    );
    let row: StoreContactRow = sqlx::query_as(&statement)
        .bind(store_detail_id)
        .bind(&new_contact.email)
        .bind(&new_contact.phone_country_code)
        .bind(&new_contact.phone_number)
        .bind(&new_contact.alternate_email)
        .bind(&new_contact.alternate_phone_country_code)
        .bind(&new_contact.alternate_phone_number)
        .bind(&new_contact.social_links)
        .fetch_one(conn)
        .await?;
    row.try_into()
}
