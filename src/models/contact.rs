//! Contact model representing one entry of the shared contacts store.

use crate::color::{color_for, PastelColor};
use crate::domain::ContactId;
use serde::{Deserialize, Serialize};

/// A contact as composed from the store's identity, phone and email sources.
///
/// Contacts are never built locally from user input; they only come out of
/// a repository query and are replaced wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Identifier assigned by the store
    pub id: ContactId,

    /// Display name, never blank
    pub name: String,

    /// One phone number, chosen by the repository's selection policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// One email address, chosen by the repository's selection policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Contact {
    /// Create a contact with no phone or email.
    pub fn new(id: impl Into<ContactId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: None,
            email: None,
        }
    }

    /// Builder-style phone setter.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Builder-style email setter.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Avatar letter: the first character of the name, uppercased.
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    /// Avatar background color.
    pub fn color(&self) -> PastelColor {
        color_for(&self.name)
    }

    /// Phone number if present and not blank.
    pub fn phone_number(&self) -> Option<&str> {
        self.phone.as_deref().filter(|p| !p.trim().is_empty())
    }

    /// Email address if present and not blank.
    pub fn email_address(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_builders() {
        let contact = Contact::new(1, "Ann")
            .with_phone("+1 555-1234")
            .with_email("ann@example.com");
        assert_eq!(contact.id, ContactId::new(1));
        assert_eq!(contact.phone.as_deref(), Some("+1 555-1234"));
        assert_eq!(contact.email.as_deref(), Some("ann@example.com"));
    }

    #[test]
    fn test_initial_uppercases_first_char() {
        assert_eq!(Contact::new(1, "ann").initial(), "A");
        assert_eq!(Contact::new(2, "éva").initial(), "É");
        assert_eq!(Contact::new(3, "").initial(), "");
    }

    #[test]
    fn test_blank_attributes_are_hidden() {
        let contact = Contact::new(1, "Bob").with_phone("  ");
        assert_eq!(contact.phone_number(), None);
        assert_eq!(contact.email_address(), None);
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let json = serde_json::to_value(Contact::new(5, "Bob")).unwrap();
        assert_eq!(json, serde_json::json!({"id": 5, "name": "Bob"}));
    }

    #[test]
    fn test_color_matches_name_color() {
        let contact = Contact::new(9, "Carol");
        assert_eq!(contact.color(), color_for("Carol"));
    }
}
