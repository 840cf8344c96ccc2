//! SAAS admin domain model and inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use washboard_core::{Email, Phone, SaasAdminId};

use super::{AuditStamps, ValidationErrors};

/// Longest accepted name/username, matching the column widths.
const MAX_NAME_LENGTH: usize = 50;

/// A platform administrator.
///
/// The password hash and OTP material never leave the server; they are
/// skipped during serialization.
#[derive(Debug, Clone, Serialize)]
pub struct SaasAdmin {
    pub id: SaasAdminId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: Email,
    pub phone_number: Phone,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expire_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    #[serde(flatten)]
    pub audit: AuditStamps,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Sortable columns for SAAS admin listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SaasAdminSortBy {
    #[default]
    Id,
    Email,
}

impl SaasAdminSortBy {
    /// The whitelisted column name for `ORDER BY`.
    #[must_use]
    pub const fn as_column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
        }
    }
}

/// Create-request payload.
///
/// The password is not part of the payload: it is generated server-side,
/// stored as a bcrypt hash, and delivered to the new admin by email.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaasAdminRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
}

/// A validated create request.
#[derive(Debug, Clone)]
pub struct NewSaasAdmin {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: Email,
    pub phone_number: Phone,
}

impl CreateSaasAdminRequest {
    /// Validate the payload into a [`NewSaasAdmin`].
    ///
    /// # Errors
    ///
    /// Returns field-level [`ValidationErrors`] listing every failing field.
    pub fn validate(self) -> Result<NewSaasAdmin, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        validate_name(&mut errors, "first_name", &self.first_name);
        validate_name(&mut errors, "last_name", &self.last_name);
        validate_name(&mut errors, "username", &self.username);

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.push("email", e.to_string());
                None
            }
        };
        let phone_number = match Phone::parse(&self.phone_number) {
            Ok(phone) => Some(phone),
            Err(e) => {
                errors.push("phone_number", e.to_string());
                None
            }
        };

        match (email, phone_number) {
            (Some(email), Some(phone_number)) if errors.is_empty() => Ok(NewSaasAdmin {
                first_name: self.first_name,
                last_name: self.last_name,
                username: self.username,
                email,
                phone_number,
            }),
            _ => Err(errors),
        }
    }
}

/// Update-request payload. Updates are full replacements of the mutable
/// fields, never partial raw writes.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSaasAdminRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub is_active: bool,
}

impl UpdateSaasAdminRequest {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns field-level [`ValidationErrors`] listing every failing field.
    pub fn validate(self) -> Result<(NewSaasAdmin, bool), ValidationErrors> {
        let is_active = self.is_active;
        let create = CreateSaasAdminRequest {
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            email: self.email,
            phone_number: self.phone_number,
        };
        Ok((create.validate()?, is_active))
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

    fn request() -> CreateSaasAdminRequest {
        CreateSaasAdminRequest {
            first_name: "Asha".to_owned(),
            last_name: "Verma".to_owned(),
            username: "asha.verma".to_owned(),
            email: "asha@example.com".to_owned(),
            phone_number: "9876543210".to_owned(),
        }
    }

    #[test]
    fn test_validate_accepts_good_input() {
        let new_admin = request().validate().unwrap();
        assert_eq!(new_admin.email.as_str(), "asha@example.com");
        assert_eq!(new_admin.phone_number.as_str(), "9876543210");
    }

    #[test]
    fn test_validate_collects_all_failures() {
        let bad = CreateSaasAdminRequest {
            first_name: String::new(),
            last_name: "   ".to_owned(),
            username: "a".repeat(51),
            email: "not-an-email".to_owned(),
            phone_number: "123".to_owned(),
        };
        let errors = bad.validate().unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["first_name", "last_name", "username", "email", "phone_number"]
        );
    }

    #[test]
    fn test_update_carries_is_active() {
        let update = UpdateSaasAdminRequest {
            first_name: "Asha".to_owned(),
            last_name: "Verma".to_owned(),
            username: "asha.verma".to_owned(),
            email: "asha@example.com".to_owned(),
            phone_number: "9876543210".to_owned(),
            is_active: true,
        };
        let (_, is_active) = update.validate().unwrap();
        assert!(is_active);
    }

    #[test]
    fn test_password_material_not_serialized() {
        let admin = SaasAdmin {
            id: SaasAdminId::new(1),
            first_name: "Asha".to_owned(),
            last_name: "Verma".to_owned(),
            username: "asha.verma".to_owned(),
            email: Email::parse("asha@example.com").unwrap(),
            phone_number: Phone::parse("9876543210").unwrap(),
            password_hash: "$2b$12$secret".to_owned(),
            otp: Some("123456".to_owned()),
            otp_expire_at: None,
            is_active: true,
            audit: AuditStamps {
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            deleted_at: None,
        };
        let json = serde_json::to_string(&admin).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret"));
        assert!(!json.contains("otp"));
        assert!(json.contains("asha@example.com"));
        assert!(json.contains("created_at"));
    }

    #[test]
    fn test_sort_columns() {
        assert_eq!(SaasAdminSortBy::Id.as_column(), "id");
        assert_eq!(SaasAdminSortBy::Email.as_column(), "email");
        assert_eq!(SaasAdminSortBy::default(), SaasAdminSortBy::Id);
    }
}
