//! Address Book MCP Server - a contacts data-access layer with a Model Context Protocol front end.
//!
//! The library reads and writes contacts held in an external contacts store,
//! composing each contact from an identity row and separate phone and email
//! rows, and exposes list, search, detail, create and delete operations to AI
//! assistants over MCP.
//!
//! # Architecture
//!
//! - **store**: The contacts store interface plus in-memory and JSON-file implementations
//! - **repositories**: Store-backed contact queries and atomic create/delete
//! - **services**: Async orchestration holding the current contact set
//! - **search**: In-memory substring filter
//! - **validation**: Field-level checks for contact drafts
//! - **color**: Deterministic avatar colors
//! - **permissions**: Read/write capabilities checked before store access
//! - **actions**: Dial, message and email links for a contact
//! - **models** / **domain**: Contact records and validated value objects
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **metrics**: Counters for store traffic
//! - **server**: MCP protocol server

pub mod actions;
pub mod color;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod permissions;
pub mod repositories;
pub mod search;
pub mod server;
pub mod services;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use actions::ContactAction;
pub use color::{color_for, PastelColor};
pub use config::Config;
pub use domain::{ContactId, EmailAddress, PhoneNumber, ValidationError};
pub use error::{ConfigError, ContactsError, ContactsResult, StoreError, StoreResult};
pub use metrics::{Metrics, MetricsSummary, QueryTimer};
pub use models::{Contact, ContactDraft, NewContact};
pub use permissions::{Capability, Permissions};
pub use repositories::{AttributeSelection, ContactRepository, StoreContactRepository};
pub use server::AddressBookMcpServer;
pub use services::{ContactService, ContactServiceImpl};
pub use store::{ContactsStore, FileContactsStore, MemoryContactsStore};
pub use validation::{validate, FieldStatus, ValidationResult};
