//! Location reference data repositories: countries, states, cities.
//!
//! The hierarchy is explicit - states are fetched by country, cities by
//! state - there is no lazy loading behind the models.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use washboard_core::{CityId, CountryId, OrderBy, Page, Pagination, StateId, StateType};

use super::RepositoryError;
use super::soft_delete::{SoftDeletable, exists_any, soft_delete};
use crate::models::{
    AuditStamps, City, Country, CountrySortBy, NewCity, NewCountry, NewState, State,
};

const COUNTRY_COLUMNS: &str = "id, name, phone_code, currency, currency_name, currency_symbol, \
     region, subregion, nationality, is_operational, created_at, updated_at, deleted_at";

const STATE_COLUMNS: &str =
    "id, country_id, name, state_type, created_at, updated_at, deleted_at";

const CITY_COLUMNS: &str = "id, state_id, name, created_at, updated_at, deleted_at";

impl SoftDeletable for Country {
    const TABLE: &'static str = "countries";
}

impl SoftDeletable for State {
    const TABLE: &'static str = "states";
}

impl SoftDeletable for City {
    const TABLE: &'static str = "cities";
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CountryRow {
    id: CountryId,
    name: String,
    phone_code: String,
    currency: String,
    currency_name: String,
    currency_symbol: String,
    region: String,
    subregion: String,
    nationality: String,
    is_operational: bool,
    #[sqlx(flatten)]
    audit: AuditStamps,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<CountryRow> for Country {
    fn from(row: CountryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone_code: row.phone_code,
            currency: row.currency,
            currency_name: row.currency_name,
            currency_symbol: row.currency_symbol,
            region: row.region,
            subregion: row.subregion,
            nationality: row.nationality,
            is_operational: row.is_operational,
            audit: row.audit,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StateRow {
    id: StateId,
    country_id: CountryId,
    name: String,
    state_type: StateType,
    #[sqlx(flatten)]
    audit: AuditStamps,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<StateRow> for State {
    fn from(row: StateRow) -> Self {
        Self {
            id: row.id,
            country_id: row.country_id,
            name: row.name,
            state_type: row.state_type,
            audit: row.audit,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CityRow {
    id: CityId,
    state_id: StateId,
    name: String,
    #[sqlx(flatten)]
    audit: AuditStamps,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        Self {
            id: row.id,
            state_id: row.state_id,
            name: row.name,
            audit: row.audit,
            deleted_at: row.deleted_at,
        }
    }
}

// =============================================================================
// Country Repository
// =============================================================================

/// Repository for country operations.
pub struct CountryRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> CountryRepository<'c> {
    /// Create a repository over a tenant-bound connection or transaction.
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// List live countries, paginated and sorted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &mut self,
        pagination: Pagination,
        sort_by: CountrySortBy,
        order_by: OrderBy,
    ) -> Result<Page<Country>, RepositoryError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM countries WHERE deleted_at IS NULL")
                .fetch_one(&mut *self.conn)
                .await?;

        let statement = format!(
            "SELECT {COUNTRY_COLUMNS} FROM countries WHERE deleted_at IS NULL \
             ORDER BY {} {} LIMIT $1 OFFSET $2",
            sort_by.as_column(),
            order_by.as_sql(),
        );
        let rows: Vec<CountryRow> = sqlx::query_as(&statement)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&mut *self.conn)
            .await?;

        let items = rows.into_iter().map(Country::from).collect();
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), pagination))
    }

    /// Get a live country by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&mut self, id: CountryId) -> Result<Option<Country>, RepositoryError> {
        let statement =
            format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE id = $1 AND deleted_at IS NULL");
        let row: Option<CountryRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(Country::from))
    }

    /// Get a country by ID regardless of soft-delete state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_including_deleted(
        &mut self,
        id: CountryId,
    ) -> Result<Option<Country>, RepositoryError> {
        let statement = format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE id = $1");
        let row: Option<CountryRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(Country::from))
    }

    /// Insert a new country.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&mut self, country: &NewCountry) -> Result<Country, RepositoryError> {
        let statement = format!(
            "INSERT INTO countries (name, phone_code, currency, currency_name, currency_symbol, \
             region, subregion, nationality, is_operational) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COUNTRY_COLUMNS}"
        );
        let row: CountryRow = sqlx::query_as(&statement)
            .bind(&country.name)
            .bind(&country.phone_code)
            .bind(&country.currency)
            .bind(&country.currency_name)
            .bind(&country.currency_symbol)
            .bind(&country.region)
            .bind(&country.subregion)
            .bind(&country.nationality)
            .bind(country.is_operational)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(row.into())
    }

    /// Replace the mutable fields of a live country.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the country doesn't exist or is
    /// soft-deleted.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &mut self,
        id: CountryId,
        country: &NewCountry,
    ) -> Result<Country, RepositoryError> {
        let statement = format!(
            "UPDATE countries SET name = $2, phone_code = $3, currency = $4, \
             currency_name = $5, currency_symbol = $6, region = $7, subregion = $8, \
             nationality = $9, is_operational = $10 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COUNTRY_COLUMNS}"
        );
        let row: Option<CountryRow> = sqlx::query_as(&statement)
            .bind(id)
            .bind(&country.name)
            .bind(&country.phone_code)
            .bind(&country.currency)
            .bind(&country.currency_name)
            .bind(&country.currency_symbol)
            .bind(&country.region)
            .bind(&country.subregion)
            .bind(&country.nationality)
            .bind(country.is_operational)
            .fetch_optional(&mut *self.conn)
            .await?;
        row.map(Country::from).ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete a country. Idempotent for already-deleted rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such country ever existed.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn soft_delete(&mut self, id: CountryId) -> Result<(), RepositoryError> {
        if soft_delete::<Country, _>(&mut *self.conn, id).await? {
            return Ok(());
        }
        if exists_any::<Country, _>(&mut *self.conn, id).await? {
            return Ok(());
        }
        Err(RepositoryError::NotFound)
    }
}

// =============================================================================
// State Repository
// =============================================================================

/// Repository for state operations, always scoped to a country.
pub struct StateRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> StateRepository<'c> {
    /// Create a repository over a tenant-bound connection or transaction.
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// List a country's live states, paginated, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_by_country(
        &mut self,
        country_id: CountryId,
        pagination: Pagination,
        order_by: OrderBy,
    ) -> Result<Page<State>, RepositoryError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM states WHERE country_id = $1 AND deleted_at IS NULL",
        )
        .bind(country_id)
        .fetch_one(&mut *self.conn)
        .await?;

        let statement = format!(
            "SELECT {STATE_COLUMNS} FROM states WHERE country_id = $1 AND deleted_at IS NULL \
             ORDER BY name {} LIMIT $2 OFFSET $3",
            order_by.as_sql(),
        );
        let rows: Vec<StateRow> = sqlx::query_as(&statement)
            .bind(country_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&mut *self.conn)
            .await?;

        let items = rows.into_iter().map(State::from).collect();
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), pagination))
    }

    /// Get a live state by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&mut self, id: StateId) -> Result<Option<State>, RepositoryError> {
        let statement =
            format!("SELECT {STATE_COLUMNS} FROM states WHERE id = $1 AND deleted_at IS NULL");
        let row: Option<StateRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(State::from))
    }

    /// Get a state by ID regardless of soft-delete state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_including_deleted(
        &mut self,
        id: StateId,
    ) -> Result<Option<State>, RepositoryError> {
        let statement = format!("SELECT {STATE_COLUMNS} FROM states WHERE id = $1");
        let row: Option<StateRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(State::from))
    }

    /// Insert a new state under a country.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming `country_id` if the country
    /// does not exist (foreign key).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &mut self,
        country_id: CountryId,
        state: &NewState,
    ) -> Result<State, RepositoryError> {
        let statement = format!(
            "INSERT INTO states (country_id, name, state_type) VALUES ($1, $2, $3) \
             RETURNING {STATE_COLUMNS}"
        );
        let row: StateRow = sqlx::query_as(&statement)
            .bind(country_id)
            .bind(&state.name)
            .bind(state.state_type)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::conflict("country_id", "country does not exist");
                }
                RepositoryError::Database(e)
            })?;
        Ok(row.into())
    }

    /// Replace the mutable fields of a live state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the state doesn't exist or is
    /// soft-deleted.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&mut self, id: StateId, state: &NewState) -> Result<State, RepositoryError> {
        let statement = format!(
            "UPDATE states SET name = $2, state_type = $3 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {STATE_COLUMNS}"
        );
        let row: Option<StateRow> = sqlx::query_as(&statement)
            .bind(id)
            .bind(&state.name)
            .bind(state.state_type)
            .fetch_optional(&mut *self.conn)
            .await?;
        row.map(State::from).ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete a state. Idempotent for already-deleted rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such state ever existed.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn soft_delete(&mut self, id: StateId) -> Result<(), RepositoryError> {
        if soft_delete::<State, _>(&mut *self.conn, id).await? {
            return Ok(());
        }
        if exists_any::<State, _>(&mut *self.conn, id).await? {
            return Ok(());
        }
        Err(RepositoryError::NotFound)
    }
}

// =============================================================================
// City Repository
// =============================================================================

/// Repository for city operations, always scoped to a state.
pub struct CityRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> CityRepository<'c> {
    /// Create a repository over a tenant-bound connection or transaction.
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// List a state's live cities, paginated, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_by_state(
        &mut self,
        state_id: StateId,
        pagination: Pagination,
        order_by: OrderBy,
    ) -> Result<Page<City>, RepositoryError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM cities WHERE state_id = $1 AND deleted_at IS NULL",
        )
        .bind(state_id)
        .fetch_one(&mut *self.conn)
        .await?;

        let statement = format!(
            "SELECT {CITY_COLUMNS} FROM cities WHERE state_id = $1 AND deleted_at IS NULL \
             ORDER BY name {} LIMIT $2 OFFSET $3",
            order_by.as_sql(),
        );
        let rows: Vec<CityRow> = sqlx::query_as(&statement)
            .bind(state_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&mut *self.conn)
            .await?;

        let items = rows.into_iter().map(City::from).collect();
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), pagination))
    }

    /// Get a live city by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&mut self, id: CityId) -> Result<Option<City>, RepositoryError> {
        let statement =
            format!("SELECT {CITY_COLUMNS} FROM cities WHERE id = $1 AND deleted_at IS NULL");
        let row: Option<CityRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(City::from))
    }

    /// Get a city by ID regardless of soft-delete state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_including_deleted(
        &mut self,
        id: CityId,
    ) -> Result<Option<City>, RepositoryError> {
        let statement = format!("SELECT {CITY_COLUMNS} FROM cities WHERE id = $1");
        let row: Option<CityRow> = sqlx::query_as(&statement)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row.map(City::from))
    }

    /// Insert a new city under a state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming `state_id` if the state
    /// does not exist (foreign key).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &mut self,
        state_id: StateId,
        city: &NewCity,
    ) -> Result<City, RepositoryError> {
        let statement = format!(
            "INSERT INTO cities (state_id, name) VALUES ($1, $2) RETURNING {CITY_COLUMNS}"
        );
        let row: CityRow = sqlx::query_as(&statement)
            .bind(state_id)
            .bind(&city.name)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::conflict("state_id", "state does not exist");
                }
                RepositoryError::Database(e)
            })?;
        Ok(row.into())
    }

    /// Replace the mutable fields of a live city.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the city doesn't exist or is
    /// soft-deleted.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&mut self, id: CityId, city: &NewCity) -> Result<City, RepositoryError> {
        let statement = format!(
            "UPDATE cities SET name = $2 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {CITY_COLUMNS}"
        );
        let row: Option<CityRow> = sqlx::query_as(&statement)
            .bind(id)
            .bind(&city.name)
            .fetch_optional(&mut *self.conn)
            .await?;
        row.map(City::from).ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete a city. Idempotent for already-deleted rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such city ever existed.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn soft_delete(&mut self, id: CityId) -> Result<(), RepositoryError> {
        if soft_delete::<City, _>(&mut *self.conn, id).await? {
            return Ok(());
        }
        if exists_any::<City, _>(&mut *self.conn, id).await? {
            return Ok(());
        }
        Err(RepositoryError::NotFound)
    }
}
