//! Store domain models and inputs: the store itself, its detail row, and
//! contact details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use washboard_core::{
    CityId, CountryId, Email, Phone, SaasAdminId, StateId, StoreContactDetailId, StoreDetailId,
    StoreId, StoreService, StoreStatus, StoreSubService, decode_codes,
};

use super::{AuditStamps, ValidationErrors};

const MAX_NAME_LENGTH: usize = 255;
const MAX_ADDRESS_LENGTH: usize = 255;
const MAX_POSTAL_CODE_LENGTH: usize = 10;
const MAX_SLOGAN_LENGTH: usize = 100;
const MAX_TAX_NUMBER_LENGTH: usize = 20;
const MAX_PHONE_COUNTRY_CODE_LENGTH: usize = 5;

/// A store (one billing location of a tenant).
#[derive(Debug, Clone, Serialize)]
pub struct Store {
    pub id: StoreId,
    pub created_by_id: SaasAdminId,
    /// Branch stores point at the store they branched from.
    pub parent_store_id: Option<StoreId>,
    pub name: String,
    pub unique_identifier: Option<String>,
    pub is_main_store: bool,
    pub status: StoreStatus,
    #[serde(flatten)]
    pub audit: AuditStamps,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// The single live detail row of a store.
#[derive(Debug, Clone, Serialize)]
pub struct StoreDetail {
    pub id: StoreDetailId,
    pub store_id: StoreId,
    pub country_id: CountryId,
    pub state_id: StateId,
    pub city_id: CityId,
    pub description: Option<String>,
    pub slogan: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub gst: Option<String>,
    pub tin: Option<String>,
    pub services: Vec<StoreService>,
    pub sub_services: Vec<StoreSubService>,
    pub has_online_booking: Option<bool>,
    pub has_delivery_service: Option<bool>,
    pub has_parking_facility: Option<bool>,
    pub has_wifi_facility: Option<bool>,
    #[serde(flatten)]
    pub audit: AuditStamps,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A contact row attached to a store detail.
///
/// The primary email/phone pair is required; the alternate trio is optional.
#[derive(Debug, Clone, Serialize)]
pub struct StoreContactDetail {
    pub id: StoreContactDetailId,
    pub store_detail_id: StoreDetailId,
    pub email: Email,
    pub is_email_verified: bool,
    pub phone_country_code: String,
    pub phone_number: Phone,
    pub is_phone_number_verified: bool,
    pub alternate_email: Option<Email>,
    pub is_alternate_email_verified: Option<bool>,
    pub alternate_phone_country_code: Option<String>,
    pub alternate_phone_number: Option<Phone>,
    pub is_alternate_phone_number_verified: Option<bool>,
    pub social_links: Option<serde_json::Value>,
    #[serde(flatten)]
    pub audit: AuditStamps,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A store joined with its detail and contact rows, fetched explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct StoreWithDetail {
    #[serde(flatten)]
    pub store: Store,
    pub detail: Option<StoreDetail>,
    pub contact_details: Vec<StoreContactDetail>,
}

/// Sortable columns for store listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreSortBy {
    /// ULIDs sort by creation time, so this is also chronological order.
    #[default]
    Id,
    Name,
    CreatedAt,
}

impl StoreSortBy {
    /// The whitelisted column name for `ORDER BY`.
    #[must_use]
    pub const fn as_column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::CreatedAt => "created_at",
        }
    }
}

// =============================================================================
// Create
// =============================================================================

/// Create-request payload: the store plus its detail and contact rows, all
/// persisted in one unit of work.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStoreRequest {
    pub name: String,
    pub unique_identifier: Option<String>,
    #[serde(default)]
    pub is_main_store: bool,
    pub created_by_id: SaasAdminId,
    pub parent_store_id: Option<String>,
    pub detail: StoreDetailInput,
    pub contact: StoreContactInput,
}

/// Detail section of [`CreateStoreRequest`].
#[derive(Debug, Clone, Deserialize)]
pub struct StoreDetailInput {
    pub country_id: CountryId,
    pub state_id: StateId,
    pub city_id: CityId,
    pub description: Option<String>,
    pub slogan: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub gst: Option<String>,
    pub tin: Option<String>,
    /// Integer codes of [`StoreService`].
    pub services: Vec<i32>,
    /// Integer codes of [`StoreSubService`].
    pub sub_services: Vec<i32>,
    pub has_online_booking: Option<bool>,
    pub has_delivery_service: Option<bool>,
    pub has_parking_facility: Option<bool>,
    pub has_wifi_facility: Option<bool>,
}

/// Contact section of [`CreateStoreRequest`].
#[derive(Debug, Clone, Deserialize)]
pub struct StoreContactInput {
    pub email: String,
    pub phone_country_code: String,
    pub phone_number: String,
    pub alternate_email: Option<String>,
    pub alternate_phone_country_code: Option<String>,
    pub alternate_phone_number: Option<String>,
    pub social_links: Option<serde_json::Value>,
}

/// A validated store payload. The identifier is generated at insert time by
/// the repository, not carried by the input.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub unique_identifier: Option<String>,
    pub is_main_store: bool,
    pub created_by_id: SaasAdminId,
    pub parent_store_id: Option<StoreId>,
    pub status: StoreStatus,
}

/// A validated detail payload.
#[derive(Debug, Clone)]
pub struct NewStoreDetail {
    pub country_id: CountryId,
    pub state_id: StateId,
    pub city_id: CityId,
    pub description: Option<String>,
    pub slogan: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub gst: Option<String>,
    pub tin: Option<String>,
    pub services: Vec<StoreService>,
    pub sub_services: Vec<StoreSubService>,
    pub has_online_booking: Option<bool>,
    pub has_delivery_service: Option<bool>,
    pub has_parking_facility: Option<bool>,
    pub has_wifi_facility: Option<bool>,
}

/// A validated contact payload.
#[derive(Debug, Clone)]
pub struct NewStoreContactDetail {
    pub email: Email,
    pub phone_country_code: String,
    pub phone_number: Phone,
    pub alternate_email: Option<Email>,
    pub alternate_phone_country_code: Option<String>,
    pub alternate_phone_number: Option<Phone>,
    pub social_links: Option<serde_json::Value>,
}

impl CreateStoreRequest {
    /// Validate the payload into its three typed sections.
    ///
    /// New stores always start in [`StoreStatus::Creating`]; activation is a
    /// separate update.
    ///
    /// # Errors
    ///
    /// Returns field-level [`ValidationErrors`] listing every failing field,
    /// with nested fields dotted (`detail.address`, `contact.email`).
    pub fn validate(
        self,
    ) -> Result<(NewStore, NewStoreDetail, NewStoreContactDetail), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.push("name", "cannot be empty");
        } else if self.name.len() > MAX_NAME_LENGTH {
            errors.push("name", format!("must be at most {MAX_NAME_LENGTH} characters"));
        }
        if let Some(identifier) = &self.unique_identifier
            && identifier.trim().is_empty()
        {
            errors.push("unique_identifier", "cannot be blank when present");
        }

        let parent_store_id = match self.parent_store_id.as_deref() {
            None => None,
            Some(raw) => match StoreId::parse(raw) {
                Ok(id) => Some(id),
                Err(e) => {
                    errors.push("parent_store_id", e.to_string());
                    None
                }
            },
        };

        let detail = self.detail.validate(&mut errors);
        let contact = self.contact.validate(&mut errors);

        match (detail, contact) {
            (Some(detail), Some(contact)) if errors.is_empty() => Ok((
                NewStore {
                    name: self.name,
                    unique_identifier: self.unique_identifier,
                    is_main_store: self.is_main_store,
                    created_by_id: self.created_by_id,
                    parent_store_id,
                    status: StoreStatus::Creating,
                },
                detail,
                contact,
            )),
            _ => Err(errors),
        }
    }
}

impl StoreDetailInput {
    fn validate(self, errors: &mut ValidationErrors) -> Option<NewStoreDetail> {
        if self.address.trim().is_empty() {
            errors.push("detail.address", "cannot be empty");
        } else if self.address.len() > MAX_ADDRESS_LENGTH {
            errors.push(
                "detail.address",
                format!("must be at most {MAX_ADDRESS_LENGTH} characters"),
            );
        }
        if self.postal_code.len() > MAX_POSTAL_CODE_LENGTH {
            errors.push(
                "detail.postal_code",
                format!("must be at most {MAX_POSTAL_CODE_LENGTH} characters"),
            );
        }
        if let Some(slogan) = &self.slogan
            && slogan.len() > MAX_SLOGAN_LENGTH
        {
            errors.push(
                "detail.slogan",
                format!("must be at most {MAX_SLOGAN_LENGTH} characters"),
            );
        }
        for (field, value) in [("detail.gst", &self.gst), ("detail.tin", &self.tin)] {
            if let Some(value) = value
                && value.len() > MAX_TAX_NUMBER_LENGTH
            {
                errors.push(field, format!("must be at most {MAX_TAX_NUMBER_LENGTH} characters"));
            }
        }

        if self.services.is_empty() {
            errors.push("detail.services", "at least one service is required");
        }
        let services = match decode_codes::<StoreService>(self.services) {
            Ok(services) => Some(services),
            Err(e) => {
                errors.push("detail.services", e.to_string());
                None
            }
        };
        let sub_services = match decode_codes::<StoreSubService>(self.sub_services) {
            Ok(sub_services) => Some(sub_services),
            Err(e) => {
                errors.push("detail.sub_services", e.to_string());
                None
            }
        };

        match (services, sub_services) {
            (Some(services), Some(sub_services)) => Some(NewStoreDetail {
                country_id: self.country_id,
                state_id: self.state_id,
                city_id: self.city_id,
                description: self.description,
                slogan: self.slogan,
                address: self.address,
                postal_code: self.postal_code,
                gst: self.gst,
                tin: self.tin,
                services,
                sub_services,
                has_online_booking: self.has_online_booking,
                has_delivery_service: self.has_delivery_service,
                has_parking_facility: self.has_parking_facility,
                has_wifi_facility: self.has_wifi_facility,
            }),
            _ => None,
        }
    }
}

impl StoreContactInput {
    fn validate(self, errors: &mut ValidationErrors) -> Option<NewStoreContactDetail> {
        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.push("contact.email", e.to_string());
                None
            }
        };
        let phone_number = match Phone::parse(&self.phone_number) {
            Ok(phone) => Some(phone),
            Err(e) => {
                errors.push("contact.phone_number", e.to_string());
                None
            }
        };
        if self.phone_country_code.is_empty()
            || self.phone_country_code.len() > MAX_PHONE_COUNTRY_CODE_LENGTH
        {
            errors.push(
                "contact.phone_country_code",
                format!("must be 1-{MAX_PHONE_COUNTRY_CODE_LENGTH} characters"),
            );
        }

        let alternate_email = match self.alternate_email.as_deref() {
            None => None,
            Some(raw) => match Email::parse(raw) {
                Ok(email) => Some(Some(email)),
                Err(e) => {
                    errors.push("contact.alternate_email", e.to_string());
                    Some(None)
                }
            },
        }
        .flatten();
        let alternate_phone_number = match self.alternate_phone_number.as_deref() {
            None => None,
            Some(raw) => match Phone::parse(raw) {
                Ok(phone) => Some(Some(phone)),
                Err(e) => {
                    errors.push("contact.alternate_phone_number", e.to_string());
                    Some(None)
                }
            },
        }
        .flatten();

        match (email, phone_number) {
            (Some(email), Some(phone_number)) => Some(NewStoreContactDetail {
                email,
                phone_country_code: self.phone_country_code,
                phone_number,
                alternate_email,
                alternate_phone_country_code: self.alternate_phone_country_code,
                alternate_phone_number,
                social_links: self.social_links,
            }),
            _ => None,
        }
    }
}

// =============================================================================
// Update
// =============================================================================

/// Update-request payload for the mutable store columns.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStoreRequest {
    pub name: String,
    /// Integer code of [`StoreStatus`].
    pub status: i32,
    pub unique_identifier: Option<String>,
    #[serde(default)]
    pub is_main_store: bool,
    pub parent_store_id: Option<String>,
}

/// A validated store update.
#[derive(Debug, Clone)]
pub struct StoreUpdate {
    pub name: String,
    pub status: StoreStatus,
    pub unique_identifier: Option<String>,
    pub is_main_store: bool,
    pub parent_store_id: Option<StoreId>,
}

impl UpdateStoreRequest {
    /// Validate the payload into a [`StoreUpdate`].
    ///
    /// # Errors
    ///
    /// Returns field-level [`ValidationErrors`] listing every failing field.
    pub fn validate(self) -> Result<StoreUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.push("name", "cannot be empty");
        } else if self.name.len() > MAX_NAME_LENGTH {
            errors.push("name", format!("must be at most {MAX_NAME_LENGTH} characters"));
        }
        let status = match StoreStatus::try_from(self.status) {
            Ok(status) => Some(status),
            Err(e) => {
                errors.push("status", e.to_string());
                None
            }
        };
        let parent_store_id = match self.parent_store_id.as_deref() {
            None => None,
            Some(raw) => match StoreId::parse(raw) {
                Ok(id) => Some(id),
                Err(e) => {
                    errors.push("parent_store_id", e.to_string());
                    None
                }
            },
        };

        match status {
            Some(status) if errors.is_empty() => Ok(StoreUpdate {
                name: self.name,
                status,
                unique_identifier: self.unique_identifier,
                is_main_store: self.is_main_store,
                parent_store_id,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn detail_input() -> StoreDetailInput {
        StoreDetailInput {
            country_id: CountryId::new(1),
            state_id: StateId::new(1),
            city_id: CityId::new(1),
            description: None,
            slogan: None,
            address: "12 MG Road".to_owned(),
            postal_code: "560001".to_owned(),
            gst: None,
            tin: None,
            services: vec![20],
            sub_services: vec![10, 20],
            has_online_booking: Some(true),
            has_delivery_service: None,
            has_parking_facility: None,
            has_wifi_facility: None,
        }
    }

    fn contact_input() -> StoreContactInput {
        StoreContactInput {
            email: "store@example.com".to_owned(),
            phone_country_code: "+91".to_owned(),
            phone_number: "9876543210".to_owned(),
            alternate_email: None,
            alternate_phone_country_code: None,
            alternate_phone_number: None,
            social_links: None,
        }
    }

    fn request() -> CreateStoreRequest {
        CreateStoreRequest {
            name: "Blue Lotus Laundry".to_owned(),
            unique_identifier: Some("BLL-001".to_owned()),
            is_main_store: true,
            created_by_id: SaasAdminId::new(1),
            parent_store_id: None,
            detail: detail_input(),
            contact: contact_input(),
        }
    }

    #[test]
    fn test_create_validates_and_types_sections() {
        let (store, detail, contact) = request().validate().unwrap();
        assert_eq!(store.status, StoreStatus::Creating);
        assert_eq!(detail.services, vec![StoreService::Laundry]);
        assert_eq!(
            detail.sub_services,
            vec![StoreSubService::Washing, StoreSubService::Iron]
        );
        assert_eq!(contact.email.as_str(), "store@example.com");
    }

    #[test]
    fn test_create_rejects_unknown_service_codes() {
        let mut bad = request();
        bad.detail.services = vec![20, 99];
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.errors().first().unwrap().field, "detail.services");
    }

    #[test]
    fn test_create_requires_at_least_one_service() {
        let mut bad = request();
        bad.detail.services = vec![];
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.errors().first().unwrap().field, "detail.services");
    }

    #[test]
    fn test_create_flags_nested_fields_with_dotted_names() {
        let mut bad = request();
        bad.contact.email = "nope".to_owned();
        bad.detail.address = String::new();
        let errors = bad.validate().unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"contact.email"));
        assert!(fields.contains(&"detail.address"));
    }

    #[test]
    fn test_create_rejects_malformed_parent_id() {
        let mut bad = request();
        bad.parent_store_id = Some("not-a-ulid".to_owned());
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.errors().first().unwrap().field, "parent_store_id");
    }

    #[test]
    fn test_update_validates_status_code() {
        let update = UpdateStoreRequest {
            name: "Blue Lotus Laundry".to_owned(),
            status: 20,
            unique_identifier: None,
            is_main_store: false,
            parent_store_id: None,
        };
        assert_eq!(update.validate().unwrap().status, StoreStatus::Active);

        let bad = UpdateStoreRequest {
            name: "Blue Lotus Laundry".to_owned(),
            status: 25,
            unique_identifier: None,
            is_main_store: false,
            parent_store_id: None,
        };
        assert!(bad.validate().is_err());
    }
}
