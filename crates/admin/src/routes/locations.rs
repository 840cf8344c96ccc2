//! Location reference data handlers: countries, states, cities.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use washboard_core::{CityId, CountryId, OrderBy, Page, StateId};

use crate::db::{CityRepository, CountryRepository, StateRepository};
use crate::error::AppError;
use crate::middleware::Tenant;
use crate::models::{City, CityInput, Country, CountryInput, CountrySortBy, State as StateModel, StateInput};
use crate::state::AppState;

/// Routes under `/countries`, `/states`, and `/cities`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries).post(create_country))
        .route(
            "/countries/{id}",
            get(get_country).put(update_country).delete(delete_country),
        )
        .route(
            "/countries/{id}/states",
            get(list_states).post(create_state),
        )
        .route(
            "/states/{id}",
            get(get_state).put(update_state).delete(delete_state),
        )
        .route("/states/{id}/cities", get(list_cities).post(create_city))
        .route(
            "/cities/{id}",
            get(get_city).put(update_city).delete(delete_city),
        )
}

/// Query parameters accepted by the list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u32>,
    size: Option<u32>,
    #[serde(default)]
    sort_by: CountrySortBy,
    #[serde(default)]
    order_by: OrderBy,
}

// =============================================================================
// Countries
// =============================================================================

/// `GET /countries`.
#[instrument(skip(state))]
async fn list_countries(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Country>>, AppError> {
    let pagination = super::pagination(query.page, query.size)?;
    let mut session = state.db().session(&schema).await?;
    let page = CountryRepository::new(session.conn())
        .list(pagination, query.sort_by, query.order_by)
        .await?;
    Ok(Json(page))
}

/// `POST /countries`.
#[instrument(skip(state, input))]
async fn create_country(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Json(input): Json<CountryInput>,
) -> Result<Response, AppError> {
    let country = input.validate()?;
    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    let created = CountryRepository::new(&mut tx).create(&country).await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// `GET /countries/{id}`.
#[instrument(skip(state))]
async fn get_country(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<CountryId>,
) -> Result<Json<Country>, AppError> {
    let mut session = state.db().session(&schema).await?;
    let country = CountryRepository::new(session.conn())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("country not found".to_owned()))?;
    Ok(Json(country))
}

/// `PUT /countries/{id}`.
#[instrument(skip(state, input))]
async fn update_country(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<CountryId>,
    Json(input): Json<CountryInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let country = input.validate()?;
    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    CountryRepository::new(&mut tx)
        .update(id, &country)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("country not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    tx.commit().await?;
    Ok(Json(
        json!({ "detail": "Country has been updated successfully" }),
    ))
}

/// `DELETE /countries/{id}` - soft delete.
#[instrument(skip(state))]
async fn delete_country(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<CountryId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    CountryRepository::new(&mut tx)
        .soft_delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("country not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    tx.commit().await?;
    Ok(Json(
        json!({ "detail": "Country has been deleted successfully" }),
    ))
}

// =============================================================================
// States
// =============================================================================

/// `GET /countries/{id}/states`.
#[instrument(skip(state))]
async fn list_states(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(country_id): Path<CountryId>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<StateModel>>, AppError> {
    let pagination = super::pagination(query.page, query.size)?;
    let mut session = state.db().session(&schema).await?;

    CountryRepository::new(session.conn())
        .get(country_id)
        .await?
        .ok_or_else(|| AppError::NotFound("country not found".to_owned()))?;

    let page = StateRepository::new(session.conn())
        .list_by_country(country_id, pagination, query.order_by)
        .await?;
    Ok(Json(page))
}

/// `POST /countries/{id}/states`.
#[instrument(skip(state, input))]
async fn create_state(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(country_id): Path<CountryId>,
    Json(input): Json<StateInput>,
) -> Result<Response, AppError> {
    let new_state = input.validate()?;
    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    let created = StateRepository::new(&mut tx)
        .create(country_id, &new_state)
        .await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// `GET /states/{id}`.
#[instrument(skip(state))]
async fn get_state(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<StateId>,
) -> Result<Json<StateModel>, AppError> {
    let mut session = state.db().session(&schema).await?;
    let found = StateRepository::new(session.conn())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("state not found".to_owned()))?;
    Ok(Json(found))
}

/// `PUT /states/{id}`.
#[instrument(skip(state, input))]
async fn update_state(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<StateId>,
    Json(input): Json<StateInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let new_state = input.validate()?;
    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    StateRepository::new(&mut tx)
        .update(id, &new_state)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("state not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    tx.commit().await?;
    Ok(Json(
        json!({ "detail": "State has been updated successfully" }),
    ))
}

/// `DELETE /states/{id}` - soft delete.
#[instrument(skip(state))]
async fn delete_state(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<StateId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    StateRepository::new(&mut tx)
        .soft_delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("state not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    tx.commit().await?;
    Ok(Json(
        json!({ "detail": "State has been deleted successfully" }),
    ))
}

// =============================================================================
// Cities
// =============================================================================

/// `GET /states/{id}/cities`.
#[instrument(skip(state))]
async fn list_cities(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(state_id): Path<StateId>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<City>>, AppError> {
    let pagination = super::pagination(query.page, query.size)?;
    let mut session = state.db().session(&schema).await?;

    StateRepository::new(session.conn())
        .get(state_id)
        .await?
        .ok_or_else(|| AppError::NotFound("state not found".to_owned()))?;

    let page = CityRepository::new(session.conn())
        .list_by_state(state_id, pagination, query.order_by)
        .await?;
    Ok(Json(page))
}

/// `POST /states/{id}/cities`.
#[instrument(skip(state, input))]
async fn create_city(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(state_id): Path<StateId>,
    Json(input): Json<CityInput>,
) -> Result<Response, AppError> {
    let city = input.validate()?;
    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    let created = CityRepository::new(&mut tx).create(state_id, &city).await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// `GET /cities/{id}`.
#[instrument(skip(state))]
async fn get_city(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<CityId>,
) -> Result<Json<City>, AppError> {
    let mut session = state.db().session(&schema).await?;
    let city = CityRepository::new(session.conn())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("city not found".to_owned()))?;
    Ok(Json(city))
}

/// `PUT /cities/{id}`.
#[instrument(skip(state, input))]
async fn update_city(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<CityId>,
    Json(input): Json<CityInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let city = input.validate()?;
    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    CityRepository::new(&mut tx)
        .update(id, &city)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("city not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    tx.commit().await?;
    Ok(Json(
        json!({ "detail": "City has been updated successfully" }),
    ))
}

/// `DELETE /cities/{id}` - soft delete.
#[instrument(skip(state))]
async fn delete_city(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<CityId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    CityRepository::new(&mut tx)
        .soft_delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("city not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    tx.commit().await?;
    Ok(Json(
        json!({ "detail": "City has been deleted successfully" }),
    ))
}
