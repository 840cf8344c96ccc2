//! Store holiday calendar model and inputs.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use washboard_core::{HolidayId, HolidayType, SaasAdminId, StoreId};

use super::{AuditStamps, ValidationErrors};

const MAX_REASON_LENGTH: usize = 255;

/// A holiday on a store's calendar.
///
/// A holiday either closes the whole day or, when the time range is present,
/// a window within it.
#[derive(Debug, Clone, Serialize)]
pub struct Holiday {
    pub id: HolidayId,
    pub store_id: StoreId,
    pub created_by_id: Option<SaasAdminId>,
    pub date: NaiveDate,
    pub holiday_type: HolidayType,
    pub reason: String,
    pub from_time: Option<NaiveTime>,
    pub to_time: Option<NaiveTime>,
    #[serde(flatten)]
    pub audit: AuditStamps,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Sortable columns for holiday listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HolidaySortBy {
    #[default]
    Date,
    Id,
}

impl HolidaySortBy {
    /// The whitelisted column name for `ORDER BY`.
    #[must_use]
    pub const fn as_column(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Id => "id",
        }
    }
}

/// Create-request payload. The store comes from the URL path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHolidayRequest {
    pub date: NaiveDate,
    /// Integer code of [`HolidayType`].
    pub holiday_type: i32,
    pub reason: String,
    pub from_time: Option<NaiveTime>,
    pub to_time: Option<NaiveTime>,
    pub created_by_id: Option<SaasAdminId>,
}

/// Update-request payload; same shape as create.
pub type UpdateHolidayRequest = CreateHolidayRequest;

/// A validated holiday payload.
#[derive(Debug, Clone)]
pub struct NewHoliday {
    pub date: NaiveDate,
    pub holiday_type: HolidayType,
    pub reason: String,
    pub from_time: Option<NaiveTime>,
    pub to_time: Option<NaiveTime>,
    pub created_by_id: Option<SaasAdminId>,
}

impl CreateHolidayRequest {
    /// Validate the payload into a [`NewHoliday`].
    ///
    /// # Errors
    ///
    /// Returns field-level [`ValidationErrors`] listing every failing field.
    pub fn validate(self) -> Result<NewHoliday, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.reason.trim().is_empty() {
            errors.push("reason", "cannot be empty");
        } else if self.reason.len() > MAX_REASON_LENGTH {
            errors.push(
                "reason",
                format!("must be at most {MAX_REASON_LENGTH} characters"),
            );
        }

        let holiday_type = match HolidayType::try_from(self.holiday_type) {
            Ok(holiday_type) => Some(holiday_type),
            Err(e) => {
                errors.push("holiday_type", e.to_string());
                None
            }
        };

        if let (Some(from_time), Some(to_time)) = (self.from_time, self.to_time)
            && from_time > to_time
        {
            errors.push("from_time", "must not be after to_time");
        }

        match holiday_type {
            Some(holiday_type) if errors.is_empty() => Ok(NewHoliday {
                date: self.date,
                holiday_type,
                reason: self.reason,
                from_time: self.from_time,
                to_time: self.to_time,
                created_by_id: self.created_by_id,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> CreateHolidayRequest {
        CreateHolidayRequest {
            date: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
            holiday_type: 10,
            reason: "Independence Day".to_owned(),
            from_time: None,
            to_time: None,
            created_by_id: Some(SaasAdminId::new(1)),
        }
    }

    #[test]
    fn test_validate_full_day_holiday() {
        let holiday = request().validate().unwrap();
        assert_eq!(holiday.holiday_type, HolidayType::Public);
        assert!(holiday.from_time.is_none());
    }

    #[test]
    fn test_validate_accepts_ordered_time_range() {
        let mut req = request();
        req.from_time = NaiveTime::from_hms_opt(9, 0, 0);
        req.to_time = NaiveTime::from_hms_opt(13, 0, 0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_time_range() {
        let mut req = request();
        req.from_time = NaiveTime::from_hms_opt(14, 0, 0);
        req.to_time = NaiveTime::from_hms_opt(9, 0, 0);
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.errors().first().unwrap().field, "from_time");
    }

    #[test]
    fn test_validate_allows_equal_times() {
        let mut req = request();
        req.from_time = NaiveTime::from_hms_opt(9, 0, 0);
        req.to_time = NaiveTime::from_hms_opt(9, 0, 0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_type_and_blank_reason() {
        let mut req = request();
        req.holiday_type = 30;
        req.reason = "  ".to_owned();
        let errors = req.validate().unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["reason", "holiday_type"]);
    }
}
