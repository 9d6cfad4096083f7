use crate::domain::ContactId;
use crate::error::ContactsResult;
use crate::models::{Contact, NewContact};

/// Repository for managing contacts.
///
/// Provides abstraction over the contacts store, enabling different
/// implementations (store-backed, mock). Calls are blocking; async callers
/// run them on a blocking task.
pub trait ContactRepository: Send + Sync {
    /// Fetch every contact, sorted ascending by display name.
    fn fetch_all(&self) -> ContactsResult<Vec<Contact>>;

    /// Create a contact in one atomic batch.
    fn create(&self, contact: &NewContact) -> ContactsResult<()>;

    /// Delete a contact. Deleting an unknown id is not an error.
    fn delete(&self, id: ContactId) -> ContactsResult<()>;
}
