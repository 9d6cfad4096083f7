//! Creation-form input and its validated, store-ready form.

use crate::domain::{EmailAddress, PhoneNumber, ValidationError};
use crate::error::ContactsError;
use crate::validation::validate;
use serde::{Deserialize, Serialize};

/// Longest phone input the creation form accepts, in characters.
pub const MAX_PHONE_INPUT_LEN: usize = 20;

/// Raw, unvalidated user input for a contact that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl ContactDraft {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replace the phone input, refusing values longer than
    /// [`MAX_PHONE_INPUT_LEN`]. Returns whether the edit was applied.
    pub fn set_phone(&mut self, phone: impl Into<String>) -> bool {
        let phone = phone.into();
        if phone.chars().count() > MAX_PHONE_INPUT_LEN {
            return false;
        }
        self.phone = phone;
        true
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Reset all fields, as when the form is dismissed.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A contact request that passed validation.
///
/// Blank optional fields are normalized to `None` so no empty data rows are
/// ever written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    name: String,
    phone: Option<PhoneNumber>,
    email: Option<EmailAddress>,
}

impl NewContact {
    /// # Errors
    ///
    /// Returns `ValidationError::BlankName` if `name` is blank.
    pub fn new(
        name: impl Into<String>,
        phone: Option<PhoneNumber>,
        email: Option<EmailAddress>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        Ok(Self { name, phone, email })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }
}

impl TryFrom<&ContactDraft> for NewContact {
    type Error = ContactsError;

    fn try_from(draft: &ContactDraft) -> Result<Self, Self::Error> {
        let result = validate(draft);
        if !result.is_submittable() {
            return Err(ContactsError::ValidationFailed(result));
        }

        let invalid = |e: ValidationError| {
            tracing::error!("Draft passed validation but failed conversion: {}", e);
            ContactsError::ValidationFailed(validate(draft))
        };

        let phone = match draft.phone.trim() {
            "" => None,
            _ => Some(PhoneNumber::new(draft.phone.as_str()).map_err(invalid)?),
        };
        let email = match draft.email.trim() {
            "" => None,
            _ => Some(EmailAddress::new(draft.email.as_str()).map_err(invalid)?),
        };

        NewContact::new(draft.name.as_str(), phone, email).map_err(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_phone_respects_length_limit() {
        let mut draft = ContactDraft::default();
        assert!(draft.set_phone("12345678901234567890"));
        assert!(!draft.set_phone("123456789012345678901"));
        assert_eq!(draft.phone, "12345678901234567890");
    }

    #[test]
    fn test_clear_resets_fields() {
        let mut draft = ContactDraft::new("Ann", "1", "a@b.co");
        draft.clear();
        assert_eq!(draft, ContactDraft::default());
    }

    #[test]
    fn test_new_contact_rejects_blank_name() {
        assert_eq!(
            NewContact::new("  ", None, None),
            Err(ValidationError::BlankName)
        );
    }

    #[test]
    fn test_try_from_normalizes_blank_optionals() {
        let draft = ContactDraft::new("Ann", "  ", "");
        let contact = NewContact::try_from(&draft).unwrap();
        assert_eq!(contact.name(), "Ann");
        assert!(contact.phone().is_none());
        assert!(contact.email().is_none());
    }

    #[test]
    fn test_try_from_keeps_valid_optionals() {
        let draft = ContactDraft::new("Ann", "+1 555-1234", "ann@example.com");
        let contact = NewContact::try_from(&draft).unwrap();
        assert_eq!(contact.phone().map(|p| p.as_str()), Some("+1 555-1234"));
        assert_eq!(contact.email().map(|e| e.as_str()), Some("ann@example.com"));
    }

    #[test]
    fn test_try_from_invalid_draft_fails() {
        let draft = ContactDraft::new("", "123", "");
        match NewContact::try_from(&draft) {
            Err(ContactsError::ValidationFailed(result)) => {
                assert!(!result.is_submittable());
                assert!(result.name.is_invalid());
            }
            other => panic!("Expected ValidationFailed, got: {:?}", other),
        }
    }
}
