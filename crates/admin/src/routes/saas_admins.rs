//! SAAS admin CRUD handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use washboard_core::{OrderBy, Page, SaasAdminId};

use crate::db::SaasAdminRepository;
use crate::error::AppError;
use crate::middleware::Tenant;
use crate::models::{
    CreateSaasAdminRequest, SaasAdmin, SaasAdminSortBy, UpdateSaasAdminRequest, ValidationErrors,
};
use crate::services::password::{GENERATED_PASSWORD_LENGTH, generate_password, hash_password};
use crate::services::tasks::EmailTask;
use crate::state::AppState;

/// Routes under `/saas-admins`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/saas-admins", get(list).post(create))
        .route(
            "/saas-admins/{id}",
            get(get_by_id).put(update).delete(delete),
        )
}

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u32>,
    size: Option<u32>,
    #[serde(default)]
    sort_by: SaasAdminSortBy,
    #[serde(default)]
    order_by: OrderBy,
}

/// `GET /saas-admins` - paginated list of live admins.
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<SaasAdmin>>, AppError> {
    let pagination = super::pagination(query.page, query.size)?;
    let mut session = state.db().session(&schema).await?;
    let page = SaasAdminRepository::new(session.conn())
        .list(pagination, query.sort_by, query.order_by)
        .await?;
    Ok(Json(page))
}

/// `POST /saas-admins` - create an admin and email their generated
/// credentials.
///
/// The email is checked against live admins before insert so the caller gets
/// a field-level error; the partial unique index remains the authoritative
/// arbiter under concurrency.
#[instrument(skip(state, request))]
async fn create(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Json(request): Json<CreateSaasAdminRequest>,
) -> Result<Response, AppError> {
    let new_admin = request.validate()?;

    let password = generate_password(GENERATED_PASSWORD_LENGTH);
    let password_hash = hash_password(&password)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    let admin = {
        let mut repo = SaasAdminRepository::new(&mut tx);
        if repo.email_exists(&new_admin.email, None).await? {
            return Err(AppError::Validation(ValidationErrors::single(
                "email",
                format!("{} SAAS admin already exists", new_admin.email),
            )));
        }
        repo.create(&new_admin, &password_hash).await?
    };
    tx.commit().await?;

    state.tasks().dispatch(EmailTask::SaasAdminCredentials {
        to: admin.email.clone(),
        first_name: admin.first_name.clone(),
        username: admin.username.clone(),
        password,
    });

    Ok((
        StatusCode::CREATED,
        Json(json!({ "detail": "SAAS admin has been created successfully", "id": admin.id })),
    )
        .into_response())
}

/// `GET /saas-admins/{id}`.
#[instrument(skip(state))]
async fn get_by_id(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<SaasAdminId>,
) -> Result<Json<SaasAdmin>, AppError> {
    let mut session = state.db().session(&schema).await?;
    let admin = SaasAdminRepository::new(session.conn())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("SAAS admin not found".to_owned()))?;
    Ok(Json(admin))
}

/// `PUT /saas-admins/{id}` - full update of the mutable fields.
#[instrument(skip(state, request))]
async fn update(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<SaasAdminId>,
    Json(request): Json<UpdateSaasAdminRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (admin, is_active) = request.validate()?;

    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    {
        let mut repo = SaasAdminRepository::new(&mut tx);
        if repo.email_exists(&admin.email, Some(id)).await? {
            return Err(AppError::Validation(ValidationErrors::single(
                "email",
                format!("{} SAAS admin already exists", admin.email),
            )));
        }
        repo.update(id, &admin, is_active).await?;
    }
    tx.commit().await?;

    Ok(Json(
        json!({ "detail": "SAAS admin has been updated successfully" }),
    ))
}

/// `DELETE /saas-admins/{id}` - soft delete.
#[instrument(skip(state))]
async fn delete(
    State(state): State<AppState>,
    Tenant(schema): Tenant,
    Path(id): Path<SaasAdminId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut session = state.db().session(&schema).await?;
    let mut tx = session.begin().await?;
    SaasAdminRepository::new(&mut tx)
        .soft_delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("SAAS admin not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    tx.commit().await?;

    Ok(Json(
        json!({ "detail": "SAAS admin has been deleted successfully" }),
    ))
}
