//! Field-level validation for contact drafts.
//!
//! Validation is a pure function of the draft. It runs before any store
//! call, so an invalid draft never produces a batch.

use crate::domain::{EmailAddress, PhoneNumber};
use crate::models::ContactDraft;
use serde::Serialize;
use std::fmt;

pub const NAME_REQUIRED: &str = "Name cannot be empty";
pub const PHONE_CHARSET: &str = "Only digits, +, - and spaces are allowed";
pub const EMAIL_FORMAT: &str = "Invalid email format";

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum FieldStatus {
    Valid,
    Invalid(String),
}

impl FieldStatus {
    fn invalid(message: &str) -> Self {
        Self::Invalid(message.to_string())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// The error message, if the field is invalid.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(message),
        }
    }
}

/// Per-field validation of a [`ContactDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub name: FieldStatus,
    pub phone: FieldStatus,
    pub email: FieldStatus,
    /// Cached result of [`ValidationResult::is_submittable`]
    pub submittable: bool,
}

impl ValidationResult {
    /// True iff every field is valid and the name is not blank.
    pub fn is_submittable(&self) -> bool {
        self.submittable
    }

    /// `(field, message)` pairs for every invalid field.
    pub fn errors(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
        ]
        .into_iter()
        .filter_map(|(field, status)| status.message().map(|m| (field, m)))
        .collect()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors();
        if errors.is_empty() {
            return write!(f, "all fields valid");
        }
        let parts: Vec<String> = errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

fn validate_name(name: &str) -> FieldStatus {
    if name.trim().is_empty() {
        FieldStatus::invalid(NAME_REQUIRED)
    } else {
        FieldStatus::Valid
    }
}

fn validate_phone(phone: &str) -> FieldStatus {
    if !phone.trim().is_empty() && !PhoneNumber::has_allowed_chars(phone) {
        FieldStatus::invalid(PHONE_CHARSET)
    } else {
        FieldStatus::Valid
    }
}

fn validate_email(email: &str) -> FieldStatus {
    if !email.trim().is_empty() && !EmailAddress::is_valid(email) {
        FieldStatus::invalid(EMAIL_FORMAT)
    } else {
        FieldStatus::Valid
    }
}

/// Validate every field of a draft.
pub fn validate(draft: &ContactDraft) -> ValidationResult {
    let name = validate_name(&draft.name);
    let phone = validate_phone(&draft.phone);
    let email = validate_email(&draft.email);

    let submittable = name.is_valid()
        && phone.is_valid()
        && email.is_valid()
        && !draft.name.trim().is_empty();

    ValidationResult {
        name,
        phone,
        email,
        submittable,
    }
}
