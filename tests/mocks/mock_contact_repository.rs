use address_book_mcp_server::domain::ContactId;
use address_book_mcp_server::error::{ContactsError, ContactsResult};
use address_book_mcp_server::models::{Contact, NewContact};
use address_book_mcp_server::repositories::ContactRepository;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Mock contact repository for testing.
///
/// Provides an in-memory implementation of ContactRepository that can be
/// easily configured with test data and tracks method calls for verification.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockContactRepository {
    contacts: Arc<Mutex<BTreeMap<i64, Contact>>>,
    next_id: Arc<Mutex<i64>>,
    unavailable: Arc<Mutex<bool>>,
    reads_failing: Arc<Mutex<bool>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockContactRepository {
    /// Create a new empty MockContactRepository.
    pub fn new() -> Self {
        Self {
            contacts: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(Mutex::new(1)),
            unavailable: Arc::new(Mutex::new(false)),
            reads_failing: Arc::new(Mutex::new(false)),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a contact to the mock repository.
    pub fn add_contact(&self, contact: Contact) {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id = (*next_id).max(contact.id.get() + 1);
        self.contacts
            .lock()
            .unwrap()
            .insert(contact.id.get(), contact);
    }

    /// Make every call fail as if the store were offline.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    /// Make only `fetch_all` fail; writes keep succeeding.
    pub fn set_reads_failing(&self, failing: bool) {
        *self.reads_failing.lock().unwrap() = failing;
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Reset all call counts.
    pub fn reset_call_counts(&self) {
        self.call_counts.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.contacts.lock().unwrap().len()
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }

    fn check_available(&self) -> ContactsResult<()> {
        if *self.unavailable.lock().unwrap() {
            return Err(ContactsError::StoreUnavailable("mock offline".to_string()));
        }
        Ok(())
    }
}

impl Default for MockContactRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactRepository for MockContactRepository {
    fn fetch_all(&self) -> ContactsResult<Vec<Contact>> {
        self.track_call("fetch_all");
        self.check_available()?;
        if *self.reads_failing.lock().unwrap() {
            return Err(ContactsError::StoreUnavailable("read failed".to_string()));
        }

        let mut contacts: Vec<Contact> = self.contacts.lock().unwrap().values().cloned().collect();
        contacts.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        Ok(contacts)
    }

    fn create(&self, contact: &NewContact) -> ContactsResult<()> {
        self.track_call("create");
        self.check_available()?;

        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let mut record = Contact::new(id, contact.name());
        record.phone = contact.phone().map(|p| p.as_str().to_string());
        record.email = contact.email().map(|e| e.as_str().to_string());
        self.contacts.lock().unwrap().insert(id, record);
        Ok(())
    }

    fn delete(&self, id: ContactId) -> ContactsResult<()> {
        self.track_call("delete");
        self.check_available()?;

        self.contacts.lock().unwrap().remove(&id.get());
        Ok(())
    }
}
