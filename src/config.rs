//! Configuration management for the address book server.
//!
//! This module handles loading and validating configuration from environment variables.
//! It avoids polluting stdout (which MCP uses for communication); `.env` files are
//! read with `dotenvy`, which prints nothing.

use crate::error::{ConfigError, ConfigResult};
use crate::permissions::Permissions;
use crate::repositories::AttributeSelection;
use std::env;
use std::path::PathBuf;

/// Configuration for the address book server.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file backing the contacts store; `None` keeps contacts in memory
    pub store_path: Option<PathBuf>,

    /// Capabilities granted to the repository (default: read and write)
    pub permissions: Permissions,

    /// Which phone/email row represents a contact (default: first)
    pub selection: AttributeSelection,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `ADDRESS_BOOK_STORE_PATH`: JSON store file (default: in-memory store)
    /// - `ADDRESS_BOOK_PERMISSIONS`: comma list of `read`, `write` (default: both)
    /// - `ADDRESS_BOOK_SELECTION`: `first` or `primary` (default: first)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let store_path = match env::var("ADDRESS_BOOK_STORE_PATH") {
            Ok(path) if path.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    var: "ADDRESS_BOOK_STORE_PATH".to_string(),
                    reason: "Cannot be empty".to_string(),
                })
            }
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => None,
        };

        let permissions = match env::var("ADDRESS_BOOK_PERMISSIONS") {
            Ok(list) => {
                Permissions::parse_list(&list)
                    .map_err(|e| invalid_value("ADDRESS_BOOK_PERMISSIONS", e))?
            }
            Err(_) => Permissions::all(),
        };

        let selection = match env::var("ADDRESS_BOOK_SELECTION") {
            Ok(value) => value
                .parse::<AttributeSelection>()
                .map_err(|e| invalid_value("ADDRESS_BOOK_SELECTION", e))?,
            Err(_) => AttributeSelection::default(),
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            store_path,
            permissions,
            selection,
            log_level,
        })
    }
}

/// Attach the variable name to a parse error, keeping its reason text bare.
fn invalid_value(var: &str, e: ConfigError) -> ConfigError {
    let reason = match e {
        ConfigError::Other(reason) => reason,
        ConfigError::InvalidValue { reason, .. } => reason,
    };
    ConfigError::InvalidValue {
        var: var.to_string(),
        reason,
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_path: None,
            permissions: Permissions::all(),
            selection: AttributeSelection::First,
            log_level: "error".to_string(),
        }
    }
}
