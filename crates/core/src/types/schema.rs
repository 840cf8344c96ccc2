//! Tenant schema name type.
//!
//! Every tenant's data lives in its own `PostgreSQL` schema. A [`SchemaName`]
//! is the validated identifier that binds a database session to one tenant
//! via `SET search_path`. Because the name is interpolated into that
//! statement (schema names cannot be bound as parameters), validation here is
//! the injection barrier: only names that pass [`SchemaName::parse`] ever
//! reach the database layer.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`SchemaName`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SchemaNameError {
    /// The input string is empty.
    #[error("schema name cannot be empty")]
    Empty,
    /// The input exceeds the `PostgreSQL` identifier limit.
    #[error("schema name must be at most {max} bytes")]
    TooLong {
        /// Maximum allowed length in bytes.
        max: usize,
    },
    /// The first character is not a lowercase ASCII letter.
    #[error("schema name must start with a lowercase letter")]
    BadLeadingChar,
    /// The input contains a character outside `[a-z0-9_]`.
    #[error("schema name may contain only lowercase letters, digits, and underscores")]
    BadChar,
}

/// A validated tenant schema identifier.
///
/// ## Constraints
///
/// - 1-63 bytes (the `PostgreSQL` identifier limit)
/// - First character: lowercase ASCII letter
/// - Remaining characters: lowercase ASCII letters, digits, underscores
///
/// ## Examples
///
/// ```
/// use washboard_core::SchemaName;
///
/// assert!(SchemaName::parse("tenant_blue_lotus").is_ok());
/// assert!(SchemaName::parse("public").is_ok());
///
/// assert!(SchemaName::parse("").is_err());              // empty
/// assert!(SchemaName::parse("9lives").is_err());        // leading digit
/// assert!(SchemaName::parse("acme; drop--").is_err());  // invalid characters
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SchemaName(String);

impl SchemaName {
    /// Maximum length of a schema name (`PostgreSQL` `NAMEDATALEN` - 1).
    pub const MAX_LENGTH: usize = 63;

    /// Name of the default shared schema.
    pub const PUBLIC: &'static str = "public";

    /// Parse a `SchemaName` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, does not start with
    /// a lowercase letter, or contains a character outside `[a-z0-9_]`.
    pub fn parse(s: &str) -> Result<Self, SchemaNameError> {
        if s.is_empty() {
            return Err(SchemaNameError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SchemaNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let mut chars = s.chars();
        match chars.next() {
            Some(c) if c.is_ascii_lowercase() => {}
            _ => return Err(SchemaNameError::BadLeadingChar),
        }

        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(SchemaNameError::BadChar);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the default shared schema (`public`).
    #[must_use]
    pub fn public() -> Self {
        Self(Self::PUBLIC.to_owned())
    }

    /// Returns true if this is the default shared schema.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.0 == Self::PUBLIC
    }

    /// Returns the schema name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SchemaName {
    type Err = SchemaNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for SchemaName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Default for SchemaName {
    fn default() -> Self {
        Self::public()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(SchemaName::parse("public").is_ok());
        assert!(SchemaName::parse("tenant_blue_lotus").is_ok());
        assert!(SchemaName::parse("t1").is_ok());
        assert!(SchemaName::parse("a").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(SchemaName::parse(""), Err(SchemaNameError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(64);
        assert!(matches!(
            SchemaName::parse(&long),
            Err(SchemaNameError::TooLong { max: 63 })
        ));
        // 63 bytes is still fine
        assert!(SchemaName::parse(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn test_parse_bad_leading_char() {
        assert!(matches!(
            SchemaName::parse("9lives"),
            Err(SchemaNameError::BadLeadingChar)
        ));
        assert!(matches!(
            SchemaName::parse("_private"),
            Err(SchemaNameError::BadLeadingChar)
        ));
        assert!(matches!(
            SchemaName::parse("Tenant"),
            Err(SchemaNameError::BadLeadingChar)
        ));
    }

    #[test]
    fn test_parse_rejects_injection_attempts() {
        assert!(matches!(
            SchemaName::parse("acme; drop table stores"),
            Err(SchemaNameError::BadChar)
        ));
        assert!(matches!(
            SchemaName::parse("acme\"--"),
            Err(SchemaNameError::BadChar)
        ));
        assert!(matches!(
            SchemaName::parse("acme-prod"),
            Err(SchemaNameError::BadChar)
        ));
    }

    #[test]
    fn test_public_default() {
        assert_eq!(SchemaName::default(), SchemaName::public());
        assert!(SchemaName::public().is_public());
        assert!(!SchemaName::parse("acme").unwrap().is_public());
    }
}
