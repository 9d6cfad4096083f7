use crate::domain::ContactId;
use crate::error::{ContactsError, ContactsResult};
use crate::metrics::{Metrics, QueryTimer};
use crate::models::{Contact, NewContact};
use crate::permissions::{Capability, Permissions};
use crate::repositories::selection::AttributeSelection;
use crate::repositories::traits::ContactRepository;
use crate::store::{
    BatchOperation, Collection, Column, ContactsStore, Mimetype, RecordUri, SortDirection,
    StoreQuery, Value, TYPE_HOME, TYPE_MOBILE,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Contact repository backed by a [`ContactsStore`].
///
/// Reads join the contacts collection with the phone and email views, one
/// query per identity and attribute. Creates are a single atomic batch.
/// Every call checks the granted capabilities before the store is touched.
pub struct StoreContactRepository {
    store: Arc<dyn ContactsStore>,
    permissions: Permissions,
    selection: AttributeSelection,
    metrics: Metrics,
}

impl StoreContactRepository {
    /// Create a repository over `store` with the given granted capabilities.
    pub fn new(store: Arc<dyn ContactsStore>, permissions: Permissions) -> Self {
        Self {
            store,
            permissions,
            selection: AttributeSelection::default(),
            metrics: Metrics::new(),
        }
    }

    pub fn with_selection(mut self, selection: AttributeSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn query(&self, query: StoreQuery) -> ContactsResult<Vec<crate::store::Row>> {
        let timer = QueryTimer::new(self.metrics.clone());
        match self.store.query(&query) {
            Ok(cursor) => {
                timer.complete();
                Ok(cursor.collect())
            }
            Err(e) => {
                timer.complete_with_error();
                tracing::error!("Query on {} failed: {}", query.collection, e);
                Err(ContactsError::from_store(e))
            }
        }
    }

    /// One attribute value for a contact, picked by the selection policy.
    fn attribute(&self, id: i64, mimetype: Mimetype) -> ContactsResult<Option<String>> {
        let (collection, column) = match mimetype {
            Mimetype::Phone => (Collection::Phones, Column::Number),
            Mimetype::Email => (Collection::Emails, Column::Address),
            Mimetype::StructuredName => (Collection::Data, Column::DisplayName),
        };

        let rows = self.query(
            StoreQuery::new(collection)
                .project([column, Column::IsPrimary])
                .filter(Column::ContactId, id),
        )?;

        Ok(self
            .selection
            .pick(rows)
            .and_then(|row| row.get_str(column).map(str::to_string)))
    }

    fn create_batch(contact: &NewContact) -> Vec<BatchOperation> {
        let mut operations = vec![
            BatchOperation::insert(Collection::RawContacts)
                .with_value(Column::AccountType, Value::Null)
                .with_value(Column::AccountName, Value::Null),
            BatchOperation::insert(Collection::Data)
                .with_back_reference(Column::RawContactId, 0)
                .with_value(Column::Mimetype, Mimetype::StructuredName)
                .with_value(Column::DisplayName, contact.name()),
        ];

        if let Some(phone) = contact.phone() {
            operations.push(
                BatchOperation::insert(Collection::Data)
                    .with_back_reference(Column::RawContactId, 0)
                    .with_value(Column::Mimetype, Mimetype::Phone)
                    .with_value(Column::Number, phone.as_str())
                    .with_value(Column::Kind, TYPE_MOBILE),
            );
        }

        if let Some(email) = contact.email() {
            operations.push(
                BatchOperation::insert(Collection::Data)
                    .with_back_reference(Column::RawContactId, 0)
                    .with_value(Column::Mimetype, Mimetype::Email)
                    .with_value(Column::Address, email.as_str())
                    .with_value(Column::Kind, TYPE_HOME),
            );
        }

        operations
    }
}

impl ContactRepository for StoreContactRepository {
    fn fetch_all(&self) -> ContactsResult<Vec<Contact>> {
        self.permissions.require(Capability::ReadContacts)?;

        let identities = self.query(
            StoreQuery::new(Collection::Contacts)
                .project([Column::Id, Column::DisplayName])
                .order_by(Column::DisplayName, SortDirection::Ascending),
        )?;

        let mut seen = HashSet::new();
        let mut contacts = Vec::with_capacity(identities.len());

        for row in identities {
            let Some(id) = row.get_i64(Column::Id) else {
                tracing::warn!("Skipping contact row without an id");
                continue;
            };
            let name = match row.get_str(Column::DisplayName) {
                Some(name) if !name.trim().is_empty() => name.to_string(),
                _ => {
                    tracing::warn!("Skipping contact {} without a display name", id);
                    continue;
                }
            };
            if !seen.insert(id) {
                tracing::warn!("Skipping duplicate contact id {}", id);
                continue;
            }

            let mut contact = Contact::new(id, name);
            contact.phone = self.attribute(id, Mimetype::Phone)?;
            contact.email = self.attribute(id, Mimetype::Email)?;
            contacts.push(contact);
        }

        self.metrics.record_contacts_fetched(contacts.len());
        tracing::debug!("Fetched {} contacts", contacts.len());
        Ok(contacts)
    }

    fn create(&self, contact: &NewContact) -> ContactsResult<()> {
        self.permissions.require(Capability::WriteContacts)?;

        let operations = Self::create_batch(contact);
        let count = operations.len();

        match self.store.apply_batch(operations) {
            Ok(_) => {
                self.metrics.record_batch_applied();
                tracing::info!("Created contact '{}' ({} operations)", contact.name(), count);
                Ok(())
            }
            Err(e) => {
                self.metrics.record_batch_rejected();
                self.metrics.record_store_error();
                tracing::error!("Create batch for '{}' failed: {}", contact.name(), e);
                Err(ContactsError::BatchRejected(e.to_string()))
            }
        }
    }

    fn delete(&self, id: ContactId) -> ContactsResult<()> {
        self.permissions.require(Capability::WriteContacts)?;

        let uri = RecordUri::contact(id);
        self.metrics.record_delete();
        match self.store.delete(&uri) {
            Ok(0) => {
                tracing::info!("Delete of {} affected no rows", uri);
                Ok(())
            }
            Ok(count) => {
                tracing::info!("Deleted {} ({} rows)", uri, count);
                Ok(())
            }
            Err(e) => {
                self.metrics.record_store_error();
                tracing::error!("Delete of {} failed: {}", uri, e);
                Err(ContactsError::from_store(e))
            }
        }
    }
}
