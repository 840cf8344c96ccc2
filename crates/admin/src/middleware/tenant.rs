//! Tenant resolution extractor.
//!
//! Every request names its tenant with the `x-tenant-schema` header; the
//! absence of the header means the shared `public` schema. The header value
//! must be a valid [`SchemaName`] - anything else is rejected before a
//! database session is ever opened. Whether the schema actually exists is
//! checked when the session binds (see `db::tenancy`), and a missing schema
//! fails the request rather than falling back to another tenant.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use washboard_core::SchemaName;

use crate::error::AppError;
use crate::models::ValidationErrors;

/// Header carrying the tenant schema name.
pub const TENANT_SCHEMA_HEADER: &str = "x-tenant-schema";

/// The tenant a request is scoped to.
#[derive(Debug, Clone)]
pub struct Tenant(pub SchemaName);

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(TENANT_SCHEMA_HEADER) else {
            return Ok(Self(SchemaName::public()));
        };

        let raw = value.to_str().map_err(|_| {
            AppError::Validation(ValidationErrors::single(
                TENANT_SCHEMA_HEADER,
                "must be printable ASCII",
            ))
        })?;

        SchemaName::parse(raw).map(Self).map_err(|e| {
            AppError::Validation(ValidationErrors::single(TENANT_SCHEMA_HEADER, e.to_string()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> Result<Tenant, AppError> {
        let (mut parts, ()) = request.into_parts();
        Tenant::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_missing_header_defaults_to_public() {
        let request = Request::builder().body(()).unwrap();
        let tenant = extract(request).await.unwrap();
        assert!(tenant.0.is_public());
    }

    #[tokio::test]
    async fn test_valid_header_binds_tenant() {
        let request = Request::builder()
            .header(TENANT_SCHEMA_HEADER, "tenant_blue_lotus")
            .body(())
            .unwrap();
        let tenant = extract(request).await.unwrap();
        assert_eq!(tenant.0.as_str(), "tenant_blue_lotus");
    }

    #[tokio::test]
    async fn test_invalid_header_is_rejected() {
        let request = Request::builder()
            .header(TENANT_SCHEMA_HEADER, "Tenant; DROP SCHEMA public")
            .body(())
            .unwrap();
        let result = extract(request).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
