//! PhoneNumber value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A type-safe wrapper for phone numbers.
///
/// Accepted characters are ASCII digits, `+`, `-` and the space character.
/// Nothing else is checked: `"+"` or `"- -"` are accepted as typed.
///
/// # Example
///
/// ```
/// use address_book_mcp_server::domain::PhoneNumber;
///
/// let phone = PhoneNumber::new("+1 555-1234").unwrap();
/// assert_eq!(phone.as_str(), "+1 555-1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a new PhoneNumber, validating the format.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPhone` if the number is blank or
    /// contains a character outside the allowed set.
    pub fn new(phone: impl Into<String>) -> Result<Self, ValidationError> {
        let phone = phone.into();

        if phone.trim().is_empty() || !Self::has_allowed_chars(&phone) {
            return Err(ValidationError::InvalidPhone(phone));
        }

        Ok(Self(phone))
    }

    /// True if every character is a digit, `+`, `-` or a space.
    ///
    /// The empty string passes; blankness is the caller's concern.
    pub fn has_allowed_chars(phone: &str) -> bool {
        phone
            .chars()
            .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
    }

    /// Get the phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The number with spaces removed, as used in `tel:` URIs.
    pub fn compact(&self) -> String {
        self.0.chars().filter(|c| *c != ' ').collect()
    }
}

// Serde support - serialize as string
impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

// Serde support - deserialize from string with validation
impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PhoneNumber::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_valid() {
        let phone = PhoneNumber::new("+1 555-1234").unwrap();
        assert_eq!(phone.as_str(), "+1 555-1234");
    }

    #[test]
    fn test_phone_validates_format() {
        assert!(PhoneNumber::new("").is_err());
        assert!(PhoneNumber::new("   ").is_err());
        assert!(PhoneNumber::new("(555) 123").is_err());
        assert!(PhoneNumber::new("555.123.4567").is_err());
        assert!(PhoneNumber::new("invalid@phone").is_err());
        assert!(PhoneNumber::new("123-456-7890").is_ok());
        assert!(PhoneNumber::new("+14155551234").is_ok());
        assert!(PhoneNumber::new("+").is_ok());
    }

    #[test]
    fn test_phone_rejects_non_ascii_digits() {
        // Arabic-Indic digits are numeric but not in the allowed set
        assert!(PhoneNumber::new("٣٤٥").is_err());
    }

    #[test]
    fn test_phone_compact() {
        let phone = PhoneNumber::new("+1 555 123-4567").unwrap();
        assert_eq!(phone.compact(), "+1555123-4567");
    }

    #[test]
    fn test_phone_deserialization_invalid_fails() {
        let result: Result<PhoneNumber, _> = serde_json::from_str("\"call me\"");
        assert!(result.is_err());
    }
}
