//! ContactId value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier the contacts store assigns to a contact.
///
/// The layer never invents ids: they only come back from store queries and
/// are handed back verbatim for deletes and detail lookups.
///
/// # Example
///
/// ```
/// use address_book_mcp_server::domain::ContactId;
///
/// let id: ContactId = "17".parse().unwrap();
/// assert_eq!(id.get(), 17);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(i64);

impl ContactId {
    /// Wrap a raw store id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw store id.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ContactId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i32> for ContactId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

impl FromStr for ContactId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
