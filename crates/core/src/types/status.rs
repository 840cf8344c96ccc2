//! Integer-coded status enums.
//!
//! Statuses, service catalogs and type discriminators are stored as `INTEGER`
//! columns with gaps between codes (10, 20, 30...) so new variants can be
//! inserted without renumbering. The `int_enum!` macro generates the
//! `i32` conversions, serde support (serialized as the integer code), and
//! sqlx column mapping for each enum.

use serde::{Deserialize, Serialize};

/// Error returned when an integer code does not match any enum variant.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid {what} code: {code}")]
pub struct InvalidCode {
    /// Human-readable enum name.
    pub what: &'static str,
    /// The offending integer.
    pub code: i32,
}

macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
        )]
        #[cfg_attr(feature = "postgres", derive(sqlx::Type))]
        #[repr(i32)]
        #[serde(into = "i32", try_from = "i32")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $code,
            )+
        }

        impl $name {
            /// The stored integer code.
            #[must_use]
            pub const fn code(self) -> i32 {
                self as i32
            }

            /// All variants, in code order.
            #[must_use]
            pub const fn all() -> &'static [Self] {
                &[$(Self::$variant,)+]
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value as Self
            }
        }

        impl TryFrom<i32> for $name {
            type Error = InvalidCode;

            fn try_from(code: i32) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(InvalidCode { what: $label, code }),
                }
            }
        }
    };
}

int_enum! {
    /// Whether a state-level division is a full state or a union territory.
    StateType, "state type" {
        State = 10,
        UnionTerritory = 20,
    }
}

int_enum! {
    /// Lifecycle status of a store.
    StoreStatus, "store status" {
        Creating = 10,
        Active = 20,
        Inactive = 30,
        Failed = 40,
        Suspended = 50,
        Deleted = 60,
        PendingApproval = 70,
        UnderReview = 80,
        Maintenance = 90,
        TemporarilyClosed = 100,
    }
}

int_enum! {
    /// Primary service lines a store offers.
    StoreService, "store service" {
        All = 10,
        Laundry = 20,
        SellingWholesale = 30,
        SellingRetail = 40,
        CutPieceCenter = 70,
    }
}

int_enum! {
    /// Sub-services within a store's service lines.
    StoreSubService, "store sub-service" {
        Washing = 10,
        Iron = 20,
        DryCleaning = 30,
        StainRemoval = 40,
        Folding = 50,
        Dyeing = 60,
        Bleaching = 70,
        BulkOrderProcessing = 80,
        CustomPackaging = 90,
        Warehousing = 100,
        Distribution = 110,
        ShippingLogistics = 120,
        CustomFitting = 130,
        GiftWrapping = 140,
        HomeDelivery = 150,
        InStorePickup = 160,
        PersonalShopper = 170,
        WholesaleLaundryPackaging = 180,
        RetailLaundryService = 190,
        FabricCutting = 200,
        FabricSorting = 210,
        CustomLabeling = 220,
    }
}

int_enum! {
    /// Whether a holiday applies platform-wide or to one store.
    HolidayType, "holiday type" {
        Public = 10,
        Store = 20,
    }
}

/// Convert a column of stored integer codes into enum values.
///
/// Used for `INTEGER[]` columns (store services, sub-services) where sqlx
/// decodes `Vec<i32>` and each element still needs validation.
///
/// # Errors
///
/// Returns [`InvalidCode`] for the first element that matches no variant.
pub fn decode_codes<T>(codes: Vec<i32>) -> Result<Vec<T>, InvalidCode>
where
    T: TryFrom<i32, Error = InvalidCode>,
{
    codes.into_iter().map(T::try_from).collect()
}

/// Convert enum values back into their stored integer codes.
#[must_use]
pub fn encode_codes<T: Into<i32> + Copy>(values: &[T]) -> Vec<i32> {
    values.iter().map(|&v| v.into()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for status in StoreStatus::all() {
            assert_eq!(StoreStatus::try_from(status.code()).unwrap(), *status);
        }
        for service in StoreSubService::all() {
            assert_eq!(StoreSubService::try_from(service.code()).unwrap(), *service);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        let err = StoreStatus::try_from(15).unwrap_err();
        assert_eq!(err.code, 15);
        assert_eq!(err.what, "store status");
        assert!(HolidayType::try_from(0).is_err());
        assert!(StateType::try_from(-10).is_err());
    }

    #[test]
    fn test_serde_uses_integer_codes() {
        let json = serde_json::to_string(&StoreStatus::Active).unwrap();
        assert_eq!(json, "20");

        let parsed: HolidayType = serde_json::from_str("10").unwrap();
        assert_eq!(parsed, HolidayType::Public);

        assert!(serde_json::from_str::<StoreService>("11").is_err());
    }

    #[test]
    fn test_decode_codes() {
        let services: Vec<StoreService> = decode_codes(vec![20, 40]).unwrap();
        assert_eq!(
            services,
            vec![StoreService::Laundry, StoreService::SellingRetail]
        );

        let err = decode_codes::<StoreService>(vec![20, 99]).unwrap_err();
        assert_eq!(err.code, 99);
    }

    #[test]
    fn test_encode_codes() {
        let codes = encode_codes(&[StoreSubService::Washing, StoreSubService::Iron]);
        assert_eq!(codes, vec![10, 20]);
    }
}
