//! Actions offered on a contact's detail view.

use crate::models::Contact;
use serde::Serialize;

/// A hand-off to another app, expressed as a URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactAction {
    Dial,
    Message,
    Email,
}

impl ContactAction {
    pub const ALL: [ContactAction; 3] = [Self::Dial, Self::Message, Self::Email];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dial => "dial",
            Self::Message => "message",
            Self::Email => "email",
        }
    }

    /// The URI for this action, or `None` when the contact lacks the field.
    pub fn uri(self, contact: &Contact) -> Option<String> {
        match self {
            Self::Dial => contact
                .phone_number()
                .map(|phone| format!("tel:{}", compact(phone))),
            Self::Message => contact
                .phone_number()
                .map(|phone| format!("smsto:{}", compact(phone))),
            Self::Email => contact
                .email_address()
                .map(|email| format!("mailto:{}", email.trim())),
        }
    }

    /// Every action available for `contact`, with its URI.
    pub fn available(contact: &Contact) -> Vec<(ContactAction, String)> {
        Self::ALL
            .into_iter()
            .filter_map(|action| action.uri(contact).map(|uri| (action, uri)))
            .collect()
    }
}

fn compact(phone: &str) -> String {
    phone.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_actions_drop_spaces() {
        let contact = Contact::new(1, "Ann").with_phone("+1 555 1234");
        assert_eq!(
            ContactAction::Dial.uri(&contact).as_deref(),
            Some("tel:+15551234")
        );
        assert_eq!(
            ContactAction::Message.uri(&contact).as_deref(),
            Some("smsto:+15551234")
        );
    }

    #[test]
    fn test_email_action() {
        let contact = Contact::new(1, "Ann").with_email("ann@example.com");
        assert_eq!(
            ContactAction::Email.uri(&contact).as_deref(),
            Some("mailto:ann@example.com")
        );
        assert!(ContactAction::Dial.uri(&contact).is_none());
    }

    #[test]
    fn test_blank_fields_disable_actions() {
        let contact = Contact::new(1, "Ann").with_phone("  ").with_email("");
        assert!(ContactAction::available(&contact).is_empty());
    }

    #[test]
    fn test_available_lists_in_order() {
        let contact = Contact::new(1, "Ann")
            .with_phone("555")
            .with_email("ann@example.com");
        let actions: Vec<_> = ContactAction::available(&contact)
            .into_iter()
            .map(|(a, _)| a)
            .collect();
        assert_eq!(
            actions,
            vec![ContactAction::Dial, ContactAction::Message, ContactAction::Email]
        );
    }
}
