//! Data models for the address book.
//!
//! `Contact` is the immutable record produced by a store query; `ContactDraft`
//! is the mutable creation-form input and `NewContact` its validated form.

pub mod contact;
pub mod draft;

pub use contact::Contact;
pub use draft::{ContactDraft, NewContact, MAX_PHONE_INPUT_LEN};
