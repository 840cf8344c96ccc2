//! Location reference data: countries, states, cities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use washboard_core::{CityId, CountryId, StateId, StateType};

use super::{AuditStamps, ValidationErrors};

const MAX_NAME_LENGTH: usize = 100;

/// A country, the root of the location hierarchy.
#[derive(Debug, Clone, Serialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub phone_code: String,
    pub currency: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub region: String,
    pub subregion: String,
    pub nationality: String,
    /// Whether the platform currently operates in this country.
    pub is_operational: bool,
    #[serde(flatten)]
    pub audit: AuditStamps,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Sortable columns for country listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CountrySortBy {
    #[default]
    Id,
    Name,
}

impl CountrySortBy {
    /// The whitelisted column name for `ORDER BY`.
    #[must_use]
    pub const fn as_column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
        }
    }
}

/// Create/update payload for a country.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryInput {
    pub name: String,
    pub phone_code: String,
    pub currency: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub region: String,
    pub subregion: String,
    pub nationality: String,
    #[serde(default)]
    pub is_operational: bool,
}

/// A validated country payload.
#[derive(Debug, Clone)]
pub struct NewCountry {
    pub name: String,
    pub phone_code: String,
    pub currency: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub region: String,
    pub subregion: String,
    pub nationality: String,
    pub is_operational: bool,
}

impl CountryInput {
    /// Validate the payload into a [`NewCountry`].
    ///
    /// # Errors
    ///
    /// Returns field-level [`ValidationErrors`] listing every failing field.
    pub fn validate(self) -> Result<NewCountry, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_name(&mut errors, "name", &self.name);
        if self.currency.trim().is_empty() {
            errors.push("currency", "cannot be empty");
        }
        errors.into_result(NewCountry {
            name: self.name,
            phone_code: self.phone_code,
            currency: self.currency,
            currency_name: self.currency_name,
            currency_symbol: self.currency_symbol,
            region: self.region,
            subregion: self.subregion,
            nationality: self.nationality,
            is_operational: self.is_operational,
        })
    }
}

/// A state or union territory within a country.
#[derive(Debug, Clone, Serialize)]
pub struct State {
    pub id: StateId,
    pub country_id: CountryId,
    pub name: String,
    pub state_type: StateType,
    #[serde(flatten)]
    pub audit: AuditStamps,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Create/update payload for a state.
#[derive(Debug, Clone, Deserialize)]
pub struct StateInput {
    pub name: String,
    /// Integer code of [`StateType`].
    pub state_type: i32,
}

/// A validated state payload.
#[derive(Debug, Clone)]
pub struct NewState {
    pub name: String,
    pub state_type: StateType,
}

impl StateInput {
    /// Validate the payload into a [`NewState`].
    ///
    /// # Errors
    ///
    /// Returns field-level [`ValidationErrors`] listing every failing field.
    pub fn validate(self) -> Result<NewState, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_name(&mut errors, "name", &self.name);
        let state_type = match StateType::try_from(self.state_type) {
            Ok(state_type) => Some(state_type),
            Err(e) => {
                errors.push("state_type", e.to_string());
                None
            }
        };
        match state_type {
            Some(state_type) if errors.is_empty() => Ok(NewState {
                name: self.name,
                state_type,
            }),
            _ => Err(errors),
        }
    }
}

/// A city within a state.
#[derive(Debug, Clone, Serialize)]
pub struct City {
    pub id: CityId,
    pub state_id: StateId,
    pub name: String,
    #[serde(flatten)]
    pub audit: AuditStamps,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Create/update payload for a city.
#[derive(Debug, Clone, Deserialize)]
pub struct CityInput {
    pub name: String,
}

/// A validated city payload.
#[derive(Debug, Clone)]
pub struct NewCity {
    pub name: String,
}

impl CityInput {
    /// Validate the payload into a [`NewCity`].
    ///
    /// # Errors
    ///
    /// Returns field-level [`ValidationErrors`] listing every failing field.
    pub fn validate(self) -> Result<NewCity, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_name(&mut errors, "name", &self.name);
        errors.into_result(NewCity { name: self.name })
    }
}

fn validate_name(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "cannot be empty");
    } else if value.len() > MAX_NAME_LENGTH {
        errors.push(field, format!("must be at most {MAX_NAME_LENGTH} characters"));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_country_requires_name_and_currency() {
        let input = CountryInput {
            name: String::new(),
            phone_code: "91".to_owned(),
            currency: " ".to_owned(),
            currency_name: "Indian Rupee".to_owned(),
            currency_symbol: "\u{20b9}".to_owned(),
            region: "Asia".to_owned(),
            subregion: "Southern Asia".to_owned(),
            nationality: "Indian".to_owned(),
            is_operational: true,
        };
        let errors = input.validate().unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "currency"]);
    }

    #[test]
    fn test_state_type_code_is_validated() {
        let input = StateInput {
            name: "Kerala".to_owned(),
            state_type: 10,
        };
        assert_eq!(input.validate().unwrap().state_type, StateType::State);

        let bad = StateInput {
            name: "Kerala".to_owned(),
            state_type: 15,
        };
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.errors().first().unwrap().field, "state_type");
    }

    #[test]
    fn test_city_name_length_cap() {
        let input = CityInput {
            name: "x".repeat(101),
        };
        assert!(input.validate().is_err());
    }
}
