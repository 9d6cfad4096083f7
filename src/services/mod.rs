//! Application service layer.
//!
//! Services contain business logic and orchestrate interactions between
//! repositories and the MCP handlers. They hold the current contact set and
//! keep it in step with the store after every mutation.

mod contact_service;

pub use contact_service::{ContactService, ContactServiceImpl};

// Re-export common types used by services
pub use crate::models::{Contact, ContactDraft};
pub use crate::validation::ValidationResult;
