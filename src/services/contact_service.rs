//! Contact service layer.
//!
//! Business logic for listing, inspecting, creating and deleting contacts.

use crate::domain::ContactId;
use crate::error::{ContactsError, ContactsResult};
use crate::models::{Contact, ContactDraft, NewContact};
use crate::repositories::ContactRepository;
use crate::search;
use crate::validation::{self, ValidationResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Contact service trait for business operations.
#[async_trait]
pub trait ContactService: Send + Sync {
    /// Re-read every contact from the store and replace the current set.
    async fn refresh(&self) -> ContactsResult<Arc<Vec<Contact>>>;

    /// Refresh, then return the contacts matching `query`.
    async fn list_contacts(&self, query: &str) -> ContactsResult<Vec<Contact>>;

    /// Get one contact from the current set.
    ///
    /// An unknown id triggers a single refresh before giving up.
    async fn get_contact(&self, id: ContactId) -> ContactsResult<Contact>;

    /// Validate a draft without touching the store.
    fn validate_draft(&self, draft: &ContactDraft) -> ValidationResult;

    /// Validate and create a contact, then refresh.
    ///
    /// Once the store accepted the contact this returns `Ok`, even if the
    /// refresh that follows fails.
    async fn create_contact(&self, draft: &ContactDraft) -> ContactsResult<()>;

    /// Delete a contact, then refresh. A failed refresh does not fail the delete.
    async fn delete_contact(&self, id: ContactId) -> ContactsResult<()>;

    /// The contact set as of the last refresh.
    async fn contacts(&self) -> Arc<Vec<Contact>>;
}

/// Default implementation of ContactService.
///
/// Repository calls block, so each runs on `spawn_blocking` and is awaited
/// before the next is issued. The `gate` keeps concurrent callers from
/// interleaving store requests.
pub struct ContactServiceImpl {
    repository: Arc<dyn ContactRepository>,
    contacts: RwLock<Arc<Vec<Contact>>>,
    gate: Mutex<()>,
}

impl ContactServiceImpl {
    /// Create a new contact service with an empty contact set.
    pub fn new(repository: Arc<dyn ContactRepository>) -> Self {
        Self {
            repository,
            contacts: RwLock::new(Arc::new(Vec::new())),
            gate: Mutex::new(()),
        }
    }

    async fn run_blocking<T, F>(&self, f: F) -> ContactsResult<T>
    where
        F: FnOnce(&dyn ContactRepository) -> ContactsResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let repository = self.repository.clone();
        tokio::task::spawn_blocking(move || f(repository.as_ref()))
            .await
            .map_err(|e| ContactsError::Task(format!("Task join error: {}", e)))?
    }

    /// Refresh while the caller already holds the gate.
    async fn reload(&self) -> ContactsResult<Arc<Vec<Contact>>> {
        let fetched = Arc::new(self.run_blocking(|repo| repo.fetch_all()).await?);
        *self.contacts.write().await = fetched.clone();
        tracing::debug!("Contact set refreshed ({} contacts)", fetched.len());
        Ok(fetched)
    }

    /// Refresh after a committed mutation. A failed read keeps the previous
    /// set; the mutation itself already succeeded and must not be reported
    /// as failed.
    async fn reload_after(&self, mutation: &str) {
        if let Err(e) = self.reload().await {
            tracing::warn!("Refresh after {} failed, keeping previous contact set: {}", mutation, e);
        }
    }

    async fn find_cached(&self, id: ContactId) -> Option<Contact> {
        self.contacts
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }
}

#[async_trait]
impl ContactService for ContactServiceImpl {
    async fn refresh(&self) -> ContactsResult<Arc<Vec<Contact>>> {
        let _gate = self.gate.lock().await;
        self.reload().await
    }

    async fn list_contacts(&self, query: &str) -> ContactsResult<Vec<Contact>> {
        let contacts = self.refresh().await?;
        Ok(search::filter(&contacts, query)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn get_contact(&self, id: ContactId) -> ContactsResult<Contact> {
        if let Some(contact) = self.find_cached(id).await {
            return Ok(contact);
        }

        self.refresh().await?;
        self.find_cached(id)
            .await
            .ok_or(ContactsError::NotFound(id))
    }

    fn validate_draft(&self, draft: &ContactDraft) -> ValidationResult {
        validation::validate(draft)
    }

    async fn create_contact(&self, draft: &ContactDraft) -> ContactsResult<()> {
        let contact = NewContact::try_from(draft)?;

        let _gate = self.gate.lock().await;
        self.run_blocking(move |repo| repo.create(&contact)).await?;
        self.reload_after("create").await;
        Ok(())
    }

    async fn delete_contact(&self, id: ContactId) -> ContactsResult<()> {
        let _gate = self.gate.lock().await;
        self.run_blocking(move |repo| repo.delete(id)).await?;
        self.reload_after("delete").await;
        Ok(())
    }

    async fn contacts(&self) -> Arc<Vec<Contact>> {
        self.contacts.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::Permissions;
    use crate::repositories::StoreContactRepository;
    use crate::store::MemoryContactsStore;

    fn service() -> (Arc<MemoryContactsStore>, ContactServiceImpl) {
        let store = Arc::new(MemoryContactsStore::new());
        let repo = StoreContactRepository::new(store.clone(), Permissions::all());
        (store, ContactServiceImpl::new(Arc::new(repo)))
    }

    #[tokio::test]
    async fn test_create_refreshes_contact_set() {
        let (_store, service) = service();
        assert!(service.contacts().await.is_empty());

        service
            .create_contact(&ContactDraft::new("Ann", "555", ""))
            .await
            .unwrap();

        let contacts = service.contacts().await;
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "Ann");
        assert_eq!(contacts[0].phone.as_deref(), Some("555"));
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_store() {
        let (store, service) = service();

        let err = service
            .create_contact(&ContactDraft::new("", "abc", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, ContactsError::ValidationFailed(_)));
        assert_eq!(store.raw_contact_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_refreshes_contact_set() {
        let (_store, service) = service();
        service
            .create_contact(&ContactDraft::new("Ann", "", ""))
            .await
            .unwrap();
        let id = service.contacts().await[0].id;

        service.delete_contact(id).await.unwrap();
        assert!(service.contacts().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_contact_refreshes_once_for_unknown_id() {
        let (store, service) = service();
        let repo = StoreContactRepository::new(store.clone(), Permissions::all());
        repo.create(&NewContact::new("Bob", None, None).unwrap())
            .unwrap();

        // Created behind the service's back; the cached set is still empty
        let bob = repo.fetch_all().unwrap()[0].clone();
        assert_eq!(service.get_contact(bob.id).await.unwrap(), bob);

        let err = service.get_contact(ContactId::new(999)).await.unwrap_err();
        assert!(matches!(err, ContactsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_contacts_filters() {
        let (_store, service) = service();
        for name in ["Ann", "Bob", "Anna"] {
            service
                .create_contact(&ContactDraft::new(name, "", ""))
                .await
                .unwrap();
        }

        let names: Vec<String> = service
            .list_contacts("ann")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ann", "Anna"]);
    }
}
