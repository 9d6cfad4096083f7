//! Capabilities gating access to the contacts store.
//!
//! Prompting the user for a capability is outside this crate; callers grant
//! what the platform granted and the repository refuses to touch the store
//! without it.

use crate::error::{ConfigError, ConfigResult, ContactsError, ContactsResult};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A store capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ReadContacts,
    WriteContacts,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadContacts => write!(f, "read contacts"),
            Self::WriteContacts => write!(f, "write contacts"),
        }
    }
}

impl FromStr for Capability {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read" | "read_contacts" => Ok(Self::ReadContacts),
            "write" | "write_contacts" => Ok(Self::WriteContacts),
            other => Err(ConfigError::Other(format!("Unknown capability: {}", other))),
        }
    }
}

/// The set of capabilities the caller holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions {
    granted: BTreeSet<Capability>,
}

impl Permissions {
    /// No capabilities granted.
    pub fn none() -> Self {
        Self::default()
    }

    /// Both read and write granted.
    pub fn all() -> Self {
        [Capability::ReadContacts, Capability::WriteContacts]
            .into_iter()
            .collect()
    }

    /// Parse a comma-separated list such as `"read,write"`.
    pub fn parse_list(list: &str) -> ConfigResult<Self> {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(Capability::from_str)
            .collect()
    }

    pub fn grant(&mut self, capability: Capability) {
        self.granted.insert(capability);
    }

    pub fn revoke(&mut self, capability: Capability) {
        self.granted.remove(&capability);
    }

    pub fn is_granted(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }

    /// Fail with `PermissionDenied` unless `capability` is granted.
    pub fn require(&self, capability: Capability) -> ContactsResult<()> {
        if self.is_granted(capability) {
            Ok(())
        } else {
            Err(ContactsError::PermissionDenied(capability))
        }
    }
}

impl FromIterator<Capability> for Permissions {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        let permissions = Permissions::all();
        assert!(permissions.require(Capability::ReadContacts).is_ok());
        assert!(permissions.require(Capability::WriteContacts).is_ok());

        let permissions = Permissions::none();
        assert!(matches!(
            permissions.require(Capability::ReadContacts),
            Err(ContactsError::PermissionDenied(Capability::ReadContacts))
        ));
    }

    #[test]
    fn test_grant_and_revoke() {
        let mut permissions = Permissions::none();
        permissions.grant(Capability::WriteContacts);
        assert!(permissions.is_granted(Capability::WriteContacts));
        permissions.revoke(Capability::WriteContacts);
        assert!(!permissions.is_granted(Capability::WriteContacts));
    }

    #[test]
    fn test_parse_list() {
        let permissions = Permissions::parse_list("read, write").unwrap();
        assert_eq!(permissions, Permissions::all());

        let permissions = Permissions::parse_list("READ").unwrap();
        assert!(permissions.is_granted(Capability::ReadContacts));
        assert!(!permissions.is_granted(Capability::WriteContacts));

        assert_eq!(Permissions::parse_list("").unwrap(), Permissions::none());
        assert!(Permissions::parse_list("read,delete").is_err());
    }
}
