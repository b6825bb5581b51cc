//! Customer-facing order number type.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur when parsing an [`OrderNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum OrderNumberError {
    /// The input does not start with the `ORD-` prefix.
    #[error("order number must start with ORD-")]
    MissingPrefix,
    /// The suffix is not exactly 8 characters.
    #[error("order number suffix must be exactly 8 characters")]
    BadLength,
    /// The suffix contains characters outside `0-9A-F`.
    #[error("order number suffix must be uppercase hexadecimal")]
    BadCharacter,
}

/// A customer-facing order number in the form `ORD-XXXXXXXX`.
///
/// The suffix is 8 uppercase hex characters drawn from a random UUID. A
/// random suffix alone does not guarantee uniqueness; the database carries a
/// unique constraint on the column and order creation retries with a fresh
/// number on collision.
///
/// ## Examples
///
/// ```
/// use monsoon_core::OrderNumber;
///
/// let number = OrderNumber::generate();
/// assert!(number.as_str().starts_with("ORD-"));
/// assert!(OrderNumber::parse(number.as_str()).is_ok());
/// assert!(OrderNumber::parse("ORD-notahex1").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Prefix shared by every order number.
    pub const PREFIX: &'static str = "ORD-";

    /// Length of the hex suffix.
    pub const SUFFIX_LENGTH: usize = 8;

    /// Generate a fresh order number from a random UUID.
    #[must_use]
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        let suffix: String = hex
            .chars()
            .take(Self::SUFFIX_LENGTH)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Self(format!("{}{suffix}", Self::PREFIX))
    }

    /// Parse an `OrderNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is missing the `ORD-` prefix, has a
    /// suffix that is not exactly 8 characters, or contains characters
    /// outside uppercase hexadecimal.
    pub fn parse(s: &str) -> Result<Self, OrderNumberError> {
        let suffix = s
            .strip_prefix(Self::PREFIX)
            .ok_or(OrderNumberError::MissingPrefix)?;

        if suffix.len() != Self::SUFFIX_LENGTH {
            return Err(OrderNumberError::BadLength);
        }

        if !suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase() && c.is_ascii_hexdigit())
        {
            return Err(OrderNumberError::BadCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for OrderNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for OrderNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for OrderNumber {
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
    use super::*;

    #[test]
    fn test_generate_format() {
        let number = OrderNumber::generate();
        let s = number.as_str();
        assert!(s.starts_with("ORD-"));
        assert_eq!(s.len(), OrderNumber::PREFIX.len() + OrderNumber::SUFFIX_LENGTH);
        let suffix = s.strip_prefix("ORD-").unwrap();
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || (c.is_ascii_uppercase() && c.is_ascii_hexdigit()))
        );
    }

    #[test]
    fn test_generate_reparses() {
        let number = OrderNumber::generate();
        assert_eq!(OrderNumber::parse(number.as_str()).unwrap(), number);
    }

    #[test]
    fn test_parse_valid() {
        assert!(OrderNumber::parse("ORD-1A2B3C4D").is_ok());
        assert!(OrderNumber::parse("ORD-00000000").is_ok());
        assert!(OrderNumber::parse("ORD-FFFFFFFF").is_ok());
    }

    #[test]
    fn test_parse_missing_prefix() {
        assert!(matches!(
            OrderNumber::parse("1A2B3C4D"),
            Err(OrderNumberError::MissingPrefix)
        ));
        assert!(matches!(
            OrderNumber::parse("ord-1A2B3C4D"),
            Err(OrderNumberError::MissingPrefix)
        ));
    }

    #[test]
    fn test_parse_bad_length() {
        assert!(matches!(
            OrderNumber::parse("ORD-1A2B"),
            Err(OrderNumberError::BadLength)
        ));
        assert!(matches!(
            OrderNumber::parse("ORD-1A2B3C4D5E"),
            Err(OrderNumberError::BadLength)
        ));
    }

    #[test]
    fn test_parse_bad_character() {
        // lowercase hex is rejected
        assert!(matches!(
            OrderNumber::parse("ORD-1a2b3c4d"),
            Err(OrderNumberError::BadCharacter)
        ));
        // non-hex letters are rejected
        assert!(matches!(
            OrderNumber::parse("ORD-GHIJKLMN"),
            Err(OrderNumberError::BadCharacter)
        ));
    }

    #[test]
    fn test_display() {
        let number = OrderNumber::parse("ORD-DEADBEEF").unwrap();
        assert_eq!(format!("{number}"), "ORD-DEADBEEF");
    }
}
