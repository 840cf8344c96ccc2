//! Lexically sortable store identifier (ULID).
//!
//! Stores are created concurrently by many workers and their identifiers must
//! sort by creation time, so they use a ULID-style string primary key instead
//! of a database sequence: a 10-character Crockford base32 encoding of the
//! millisecond timestamp followed by a 16-character encoding of 80 random
//! bits. Identifiers generated later sort lexically after identifiers
//! generated earlier, to within clock resolution.
//!
//! Collision probability is bounded by the 80-bit random suffix and treated
//! as negligible, not zero: insert paths must map a primary-key unique
//! violation to a retryable conflict.

use core::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Crockford base32 alphabet (no I, L, O, U).
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Width of the timestamp prefix in characters.
const TIMESTAMP_WIDTH: usize = 10;

/// Width of the random suffix in characters.
const RANDOMNESS_WIDTH: usize = 16;

/// Total identifier length.
const LENGTH: usize = TIMESTAMP_WIDTH + RANDOMNESS_WIDTH;

/// Errors that can occur when parsing a [`StoreId`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum StoreIdError {
    /// The input is not exactly 26 characters.
    #[error("store id must be exactly {expected} characters")]
    WrongLength {
        /// Required length.
        expected: usize,
    },
    /// The input contains a character outside the Crockford base32 alphabet.
    #[error("store id contains invalid character {0:?}")]
    BadChar(char),
}

/// A store's primary key: a 26-character ULID string.
///
/// ## Examples
///
/// ```
/// use washboard_core::StoreId;
///
/// let a = StoreId::generate();
/// let b = StoreId::generate();
/// assert_eq!(a.as_str().len(), 26);
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct StoreId(String);

impl StoreId {
    /// Generate a new identifier from the current time and 80 random bits.
    ///
    /// Stateless and safe to call concurrently from any number of workers;
    /// there is no coordination and no shared counter.
    #[must_use]
    pub fn generate() -> Self {
        let timestamp = u128::from(unix_millis());
        let randomness: [u8; 10] = rand::random();

        let mut wide = [0_u8; 16];
        wide[6..].copy_from_slice(&randomness);
        let random_number = u128::from_be_bytes(wide);

        let mut id = String::with_capacity(LENGTH);
        encode_base32(timestamp, TIMESTAMP_WIDTH, &mut id);
        encode_base32(random_number, RANDOMNESS_WIDTH, &mut id);
        Self(id)
    }

    /// Parse a `StoreId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 26 characters from the
    /// Crockford base32 alphabet.
    pub fn parse(s: &str) -> Result<Self, StoreIdError> {
        if s.len() != LENGTH {
            return Err(StoreIdError::WrongLength { expected: LENGTH });
        }
        if let Some(bad) = s
            .chars()
            .find(|&c| !u8::try_from(c).is_ok_and(|b| ALPHABET.contains(&b)))
        {
            return Err(StoreIdError::BadChar(bad));
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `StoreId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the 10-character timestamp prefix.
    #[must_use]
    pub fn timestamp_part(&self) -> &str {
        self.0.get(..TIMESTAMP_WIDTH).unwrap_or("")
    }
}

/// Milliseconds since the Unix epoch, saturating on clock anomalies.
fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Append `value` to `out` as fixed-width, zero-padded Crockford base32.
fn encode_base32(value: u128, width: usize, out: &mut String) {
    let mut buf = [0_u8; LENGTH];
    let mut value = value;
    for slot in buf.iter_mut().take(width).rev() {
        #[allow(clippy::indexing_slicing)] // masked to 0..32
        let symbol = ALPHABET[(value & 0x1f) as usize];
        *slot = symbol;
        value >>= 5;
    }
    for &b in buf.iter().take(width) {
        out.push(char::from(b));
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for StoreId {
    type Err = StoreIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for StoreId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for StoreId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for StoreId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for StoreId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_generate_length_and_alphabet() {
        let id = StoreId::generate();
        assert_eq!(id.as_str().len(), 26);
        assert!(
            id.as_str()
                .chars()
                .all(|c| ALPHABET.contains(&(c as u8)))
        );
    }

    #[test]
    fn test_generate_unique() {
        let ids: HashSet<String> = (0..1000)
            .map(|_| StoreId::generate().into_inner())
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_timestamp_prefix_orders_across_milliseconds() {
        let earlier = StoreId::generate();
        std::thread::sleep(Duration::from_millis(2));
        let later = StoreId::generate();
        assert!(earlier.timestamp_part() <= later.timestamp_part());
        assert!(earlier.as_str() < later.as_str());
    }

    #[test]
    fn test_encode_base32_zero_pads() {
        let mut out = String::new();
        encode_base32(0, 10, &mut out);
        assert_eq!(out, "0000000000");
    }

    #[test]
    fn test_encode_base32_known_value() {
        // 32 = "10" in base32, zero-padded to width 4
        let mut out = String::new();
        encode_base32(32, 4, &mut out);
        assert_eq!(out, "0010");
    }

    #[test]
    fn test_encode_base32_is_monotonic_in_value() {
        let mut previous = String::new();
        encode_base32(0, 10, &mut previous);
        for value in [1_u128, 31, 32, 1000, 1 << 40, (1 << 48) - 1] {
            let mut current = String::new();
            encode_base32(value, 10, &mut current);
            assert!(previous < current, "{previous} should sort before {current}");
            previous = current;
        }
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = StoreId::generate();
        let parsed = StoreId::parse(id.as_str()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            StoreId::parse("ABC"),
            Err(StoreIdError::WrongLength { expected: 26 })
        ));
    }

    #[test]
    fn test_parse_bad_char() {
        // 'L' is excluded from the Crockford alphabet
        let bad = "L".repeat(26);
        assert!(matches!(
            StoreId::parse(&bad),
            Err(StoreIdError::BadChar('L'))
        ));
    }
}
