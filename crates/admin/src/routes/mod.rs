//! HTTP route handlers.
//!
//! Thin JSON handlers: resolve the tenant, validate input, open a
//! tenant-bound session, call a repository, map the result. All policy
//! lives below this layer.

pub mod holidays;
pub mod locations;
pub mod saas_admins;
pub mod stores;

use axum::Router;
use axum::routing::get;

use washboard_core::{Pagination, PaginationError};

use crate::error::AppError;
use crate::models::ValidationErrors;
use crate::state::AppState;

/// Assemble the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(saas_admins::router())
        .merge(stores::router())
        .merge(holidays::router())
        .merge(locations::router())
}

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}

/// Validate `page`/`size` query parameters into a [`Pagination`], surfacing
/// failures as field-level validation errors.
pub(crate) fn pagination(page: Option<u32>, size: Option<u32>) -> Result<Pagination, AppError> {
    Pagination::new(
        page.unwrap_or(1),
        size.unwrap_or(Pagination::DEFAULT_SIZE),
    )
    .map_err(|e| {
        let field = match e {
            PaginationError::PageZero => "page",
            PaginationError::SizeZero | PaginationError::SizeTooLarge { .. } => "size",
        };
        AppError::Validation(ValidationErrors::single(field, e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = pagination(None, None).unwrap();
        assert_eq!(p.page(), 1);
        assert_eq!(p.size(), Pagination::DEFAULT_SIZE);
    }

    #[test]
    fn test_pagination_rejects_out_of_range() {
        assert!(pagination(Some(0), None).is_err());
        assert!(pagination(None, Some(0)).is_err());
        assert!(pagination(None, Some(101)).is_err());
    }
}
