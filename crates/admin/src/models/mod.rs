//! Domain models and validated input structs.
//!
//! Entities come out of the repositories as the structs defined here;
//! mutations go in through request structs that must pass `validate()`
//! before they reach a repository. Validation failures carry field-level
//! detail ([`ValidationErrors`]) so the HTTP layer can answer 422 with the
//! offending fields named.

pub mod holiday;
pub mod location;
pub mod saas_admin;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use holiday::{CreateHolidayRequest, Holiday, HolidaySortBy, NewHoliday, UpdateHolidayRequest};
pub use location::{
    City, CityInput, Country, CountryInput, CountrySortBy, NewCity, NewCountry, NewState, State,
    StateInput,
};
pub use saas_admin::{
    CreateSaasAdminRequest, NewSaasAdmin, SaasAdmin, SaasAdminSortBy, UpdateSaasAdminRequest,
};
pub use store::{
    CreateStoreRequest, NewStore, NewStoreContactDetail, NewStoreDetail, Store, StoreContactDetail,
    StoreContactInput, StoreDetail, StoreDetailInput, StoreSortBy, StoreUpdate, StoreWithDetail,
    UpdateStoreRequest,
};

/// Creation and last-modification timestamps carried by every entity.
///
/// Both columns are assigned by the database clock: `created_at` once via the
/// column default, `updated_at` on every mutation via the `set_updated_at`
/// trigger. The application never writes either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditStamps {
    /// Set once at first persistence; immutable afterwards.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the database on every successful mutation of the row,
    /// including soft-delete.
    pub updated_at: DateTime<Utc>,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The input field at fault.
    pub field: String,
    /// What was wrong with it.
    pub message: String,
}

/// Accumulated validation failures for one request.
///
/// Collects every failing field rather than stopping at the first, the way
/// API clients expect 422 responses to behave.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// An empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// A single-field failure.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// Record a failure for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// True when no failures have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recorded failures.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(value)` when empty, `Err(self)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the accumulated failures when any were recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        for error in &self.0 {
            write!(f, "; {}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_accumulate() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.push("email", "must contain an @ symbol");
        errors.push("phone_number", "must be exactly 10 digits long");
        assert_eq!(errors.errors().len(), 2);

        let result: Result<(), ValidationErrors> = errors.into_result(());
        assert!(result.is_err());
    }

    #[test]
    fn test_into_result_passes_value_through() {
        let errors = ValidationErrors::new();
        assert_eq!(errors.into_result(41).unwrap(), 41);
    }

    #[test]
    fn test_display_names_fields() {
        let errors = ValidationErrors::single("name", "cannot be empty");
        assert_eq!(errors.to_string(), "validation failed; name: cannot be empty");
    }

    #[test]
    fn test_serializes_as_field_list() {
        let errors = ValidationErrors::single("email", "already exists");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"field": "email", "message": "already exists"}])
        );
    }
}
