//! Holiday CRUD handlers, nested under a store.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use washboard_core::{HolidayId, OrderBy, Page};

use crate::db::{HolidayRepository, StoreRepository};
use crate::error::AppError;
use crate::middleware::Tenant;
use crate::models::{CreateHolidayRequest, Holiday, HolidaySortBy, UpdateHolidayRequest};
use crate::state::AppState;

use super::stores::store_id_from_path;

/// Routes under `/stores/{id}/holidays`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stores/{id}/holidays", get(list).post(create))
        .route(
            "/stores/{id}/holidays/{holiday_id}",
            get(get_by_id).put(update).delete(delete),
        )
}

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u32>,
    size: Option<u32>,
    #[serde(default)]
    sort_by: HolidaySortBy,
    #[serde(default)]
    order_by: OrderBy,
}

/// `GET /stores/{store_id}/holidays`.
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(store_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Holiday>>, AppError> {
    let store_id = store_id_from_path(&store_id)?;
    let pagination = super::pagination(query.page, query.size)?;

    let mut session = state.db().session(&schema).await?;
    ensure_store_exists(&mut session, &store_id).await?;
    let page = HolidayRepository::new(session.conn())
        .list_by_store(&store_id, pagination, query.sort_by, query.order_by)
        .await?;
    Ok(Json(page))
}

/// `POST /stores/{store_id}/holidays`.
#[instrument(skip(state, request))]
async fn create(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(store_id): Path<String>,
    Json(request): Json<CreateHolidayRequest>,
) -> Result<Response, AppError> {
    let store_id = store_id_from_path(&store_id)?;
    let holiday = request.validate()?;

    let mut session = state.db().session(&schema).await?;
    ensure_store_exists(&mut session, &store_id).await?;
    let mut tx = session.begin().await?;
    let created = HolidayRepository::new(&mut tx)
        .create(&store_id, &holiday)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// `GET /stores/{store_id}/holidays/{id}`.
#[instrument(skip(state))]
async fn get_by_id(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path((store_id, id)): Path<(String, HolidayId)>,
) -> Result<Json<Holiday>, AppError> {
    let store_id = store_id_from_path(&store_id)?;
    let mut session = state.db().session(&schema).await?;
    let holiday = HolidayRepository::new(session.conn())
        .get(&store_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("holiday not found".to_owned()))?;
    Ok(Json(holiday))
}

/// `PUT /stores/{store_id}/holidays/{id}`.
#[instrument(skip(state, request))]
async fn update(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path((store_id, id)): Path<(String, HolidayId)>,
    Json(request): Json<UpdateHolidayRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store_id = store_id_from_path(&store_id)?;
    let holiday = request.validate()?;

    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    HolidayRepository::new(&mut tx)
        .update(&store_id, id, &holiday)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("holiday not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    tx.commit().await?;

    Ok(Json(
        json!({ "detail": "Holiday has been updated successfully" }),
    ))
}

/// `DELETE /stores/{store_id}/holidays/{id}` - soft delete.
#[instrument(skip(state))]
async fn delete(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path((store_id, id)): Path<(String, HolidayId)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store_id = store_id_from_path(&store_id)?;
    let mut session = state.db().session(&schema).await?;

    // The holiday must belong to the addressed store before it is touched.
    HolidayRepository::new(session.conn())
        .get(&store_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("holiday not found".to_owned()))?;

    let mut tx = session.begin().await?;
    HolidayRepository::new(&mut tx)
        .soft_delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("holiday not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    tx.commit().await?;

    Ok(Json(
        json!({ "detail": "Holiday has been deleted successfully" }),
    ))
}

/// 404 when the addressed store does not exist (or is soft-deleted).
async fn ensure_store_exists(
    session: &mut crate::db::TenantSession,
    store_id: &washboard_core::StoreId,
) -> Result<(), AppError> {
    StoreRepository::new(session.conn())
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("store not found".to_owned()))?;
    Ok(())
}
