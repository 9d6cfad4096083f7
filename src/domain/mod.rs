//! Domain value objects and types.
//!
//! Type-safe wrappers for contact ids, email addresses and phone numbers.
//! Phone and email values are validated at construction, so a `NewContact`
//! can never carry a malformed attribute into a store batch.

pub mod contact_id;
pub mod email;
pub mod errors;
pub mod phone;

pub use contact_id::ContactId;
pub use email::EmailAddress;
pub use errors::ValidationError;
pub use phone::PhoneNumber;
