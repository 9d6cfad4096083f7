//! Error types for the address book server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use crate::domain::ContactId;
use crate::permissions::Capability;
use crate::validation::ValidationResult;
use thiserror::Error;

/// Errors raised by a contacts store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store cannot be reached or refuses all requests
    #[error("Contacts store unavailable: {0}")]
    Unavailable(String),

    /// One operation of a batch was refused; the whole batch was discarded
    #[error("Batch operation {index} rejected: {reason}")]
    Rejected { index: usize, reason: String },

    /// A query or operation referenced something the store does not understand
    #[error("Invalid store request: {0}")]
    InvalidRequest(String),

    /// Reading or writing the backing file failed
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be (de)serialized
    #[error("Store snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by the contacts repository and service layer.
#[derive(Error, Debug)]
pub enum ContactsError {
    /// Querying the store failed; distinct from an empty address book
    #[error("Contacts query failed: {0}")]
    StoreUnavailable(String),

    /// The atomic create batch failed and nothing was written
    #[error("Contact creation rejected: {0}")]
    BatchRejected(String),

    /// The draft did not pass field validation
    #[error("Contact validation failed: {0}")]
    ValidationFailed(ValidationResult),

    /// The caller lacks a capability required for the operation
    #[error("Permission denied: {0} is not granted")]
    PermissionDenied(Capability),

    /// No contact with this id is known
    #[error("Contact not found: {0}")]
    NotFound(ContactId),

    /// A store mutation other than a create batch failed
    #[error("Contacts store error: {0}")]
    Store(#[from] StoreError),

    /// A blocking store task could not be joined
    #[error("Background task failed: {0}")]
    Task(String),
}

impl ContactsError {
    /// Classify a store failure: only an unreachable store is
    /// `StoreUnavailable`; anything else keeps its `StoreError` cause.
    pub fn from_store(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(reason) => Self::StoreUnavailable(reason),
            other => Self::Store(other),
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Other(String),
}

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with ContactsError
pub type ContactsResult<T> = Result<T, ContactsError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
