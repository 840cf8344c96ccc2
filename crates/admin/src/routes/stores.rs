//! Store CRUD handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use washboard_core::{OrderBy, Page, StoreId};

use crate::db::StoreRepository;
use crate::error::AppError;
use crate::middleware::Tenant;
use crate::models::{
    CreateStoreRequest, Store, StoreSortBy, StoreWithDetail, UpdateStoreRequest,
};
use crate::state::AppState;

/// Routes under `/stores`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stores", get(list).post(create))
        .route("/stores/{id}", get(get_by_id).put(update).delete(delete))
}

/// Parse a store id from the path; malformed identifiers cannot exist, so
/// they read as not-found rather than validation failures.
pub(crate) fn store_id_from_path(raw: &str) -> Result<StoreId, AppError> {
    StoreId::parse(raw).map_err(|_| AppError::NotFound("store not found".to_owned()))
}

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u32>,
    size: Option<u32>,
    #[serde(default)]
    sort_by: StoreSortBy,
    #[serde(default)]
    order_by: OrderBy,
}

/// `GET /stores` - paginated list of live stores.
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Store>>, AppError> {
    let pagination = super::pagination(query.page, query.size)?;
    let mut session = state.db().session(&schema).await?;
    let page = StoreRepository::new(session.conn())
        .list(pagination, query.sort_by, query.order_by)
        .await?;
    Ok(Json(page))
}

/// `POST /stores` - create a store with its detail and contact rows in one
/// unit of work.
#[instrument(skip(state, request))]
async fn create(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Json(request): Json<CreateStoreRequest>,
) -> Result<Response, AppError> {
    let (new_store, new_detail, new_contact) = request.validate()?;

    let mut session = state.db().session(&schema).await?;
    let created = StoreRepository::new(session.conn())
        .create_with_details(&new_store, &new_detail, &new_contact)
        .await?;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// `GET /stores/{id}` - store with detail and contacts eagerly joined.
#[instrument(skip(state))]
async fn get_by_id(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<String>,
) -> Result<Json<StoreWithDetail>, AppError> {
    let id = store_id_from_path(&id)?;
    let mut session = state.db().session(&schema).await?;
    let store = StoreRepository::new(session.conn())
        .get_with_detail(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("store not found".to_owned()))?;
    Ok(Json(store))
}

/// `PUT /stores/{id}` - full update of the mutable fields.
#[instrument(skip(state, request))]
async fn update(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<String>,
    Json(request): Json<UpdateStoreRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = store_id_from_path(&id)?;
    let store_update = request.validate()?;

    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    StoreRepository::new(&mut tx)
        .update(&id, &store_update)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("store not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    tx.commit().await?;

    Ok(Json(json!({ "detail": "Store has been updated successfully" })))
}

/// `DELETE /stores/{id}` - soft delete.
#[instrument(skip(state))]
async fn delete(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = store_id_from_path(&id)?;
    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    StoreRepository::new(&mut tx)
        .soft_delete(&id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("store not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    tx.commit().await?;

    Ok(Json(json!({ "detail": "Store has been deleted successfully" })))
}
