//! In-memory contacts store.

use super::tables::Tables;
use super::{BatchOperation, BatchResult, ContactsStore, Cursor, RecordUri, StoreQuery};
use crate::error::{StoreError, StoreResult};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Faults {
    unavailable: bool,
    reject_next_batch_at: Option<usize>,
}

#[derive(Debug, Default)]
struct State {
    tables: Tables,
    faults: Faults,
}

/// A contacts store held entirely in memory.
///
/// Besides serving as a throwaway runtime store it can simulate failures:
/// the whole store can be marked unavailable, and the next batch can be made
/// to fail at a chosen operation index.
#[derive(Debug, Default)]
pub struct MemoryContactsStore {
    state: Mutex<State>,
}

impl MemoryContactsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn check_available(state: &State) -> StoreResult<()> {
        if state.faults.unavailable {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut state) = self.lock() {
            state.faults.unavailable = unavailable;
        }
    }

    /// Make the next batch fail when it reaches operation `index`.
    pub fn reject_next_batch_at(&self, index: usize) {
        if let Ok(mut state) = self.lock() {
            state.faults.reject_next_batch_at = Some(index);
        }
    }

    /// Number of identity rows currently stored.
    pub fn raw_contact_count(&self) -> usize {
        self.lock().map(|s| s.tables.raw_contact_count()).unwrap_or(0)
    }

    /// Number of attribute rows currently stored.
    pub fn data_row_count(&self) -> usize {
        self.lock().map(|s| s.tables.data_row_count()).unwrap_or(0)
    }
}

impl ContactsStore for MemoryContactsStore {
    fn query(&self, query: &StoreQuery) -> StoreResult<Cursor> {
        let state = self.lock()?;
        Self::check_available(&state)?;

        let rows = state.tables.query(query)?;
        tracing::debug!(
            "query {} where {:?} -> {} rows",
            query.collection,
            query.selection.as_ref().map(|s| s.to_string()),
            rows.len()
        );
        Ok(Cursor::new(rows))
    }

    fn apply_batch(&self, operations: Vec<BatchOperation>) -> StoreResult<Vec<BatchResult>> {
        let mut state = self.lock()?;
        Self::check_available(&state)?;

        let reject_at = state.faults.reject_next_batch_at.take();
        let mut staged = state.tables.clone();

        let applied = match reject_at {
            Some(index) if index < operations.len() => {
                staged.apply_batch(&operations[..index])?;
                Err(StoreError::Rejected {
                    index,
                    reason: "injected failure".to_string(),
                })
            }
            _ => staged.apply_batch(&operations),
        };

        match applied {
            Ok(results) => {
                state.tables = staged;
                tracing::debug!("batch of {} operations committed", operations.len());
                Ok(results)
            }
            Err(e) => {
                tracing::debug!("batch of {} operations discarded: {}", operations.len(), e);
                Err(e)
            }
        }
    }

    fn delete(&self, uri: &RecordUri) -> StoreResult<usize> {
        let mut state = self.lock()?;
        Self::check_available(&state)?;

        let count = state.tables.delete(uri);
        tracing::debug!("delete {} -> {} rows", uri, count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Collection, Column, Mimetype, Value};

    fn contact_batch(name: &str, phone: &str) -> Vec<BatchOperation> {
        vec![
            BatchOperation::insert(Collection::RawContacts)
                .with_value(Column::AccountType, Value::Null),
            BatchOperation::insert(Collection::Data)
                .with_back_reference(Column::RawContactId, 0)
                .with_value(Column::Mimetype, Mimetype::StructuredName)
                .with_value(Column::DisplayName, name),
            BatchOperation::insert(Collection::Data)
                .with_back_reference(Column::RawContactId, 0)
                .with_value(Column::Mimetype, Mimetype::Phone)
                .with_value(Column::Number, phone),
        ]
    }

    #[test]
    fn test_batch_commits() {
        let store = MemoryContactsStore::new();
        let results = store.apply_batch(contact_batch("Ann", "555")).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(store.raw_contact_count(), 1);
        assert_eq!(store.data_row_count(), 2);
    }

    #[test]
    fn test_injected_failure_discards_batch() {
        let store = MemoryContactsStore::new();
        store.reject_next_batch_at(2);

        let err = store.apply_batch(contact_batch("Ann", "555")).unwrap_err();
        assert!(matches!(err, StoreError::Rejected { index: 2, .. }));
        assert_eq!(store.raw_contact_count(), 0);
        assert_eq!(store.data_row_count(), 0);

        // The fault is one-shot
        assert!(store.apply_batch(contact_batch("Ann", "555")).is_ok());
    }

    #[test]
    fn test_unavailable_store_fails_every_call() {
        let store = MemoryContactsStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.query(&StoreQuery::new(Collection::Contacts)),
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.apply_batch(contact_batch("Ann", "555")).is_err());
        assert!(store
            .delete(&RecordUri::new(Collection::Contacts, 1))
            .is_err());

        store.set_unavailable(false);
        assert!(store.query(&StoreQuery::new(Collection::Contacts)).is_ok());
    }
}
