//! JSON-file-backed contacts store.

use super::tables::Tables;
use super::{BatchOperation, BatchResult, ContactsStore, Cursor, RecordUri, StoreQuery};
use crate::error::{StoreError, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// A contacts store persisted as a JSON snapshot.
///
/// The snapshot is rewritten after every mutation that changed something,
/// through a temporary file renamed over the original, so a crash leaves
/// either the old or the new snapshot on disk.
#[derive(Debug)]
pub struct FileContactsStore {
    path: PathBuf,
    tables: Mutex<Tables>,
}

impl FileContactsStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let tables = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Tables::default()
        };

        tracing::info!(
            "Opened contacts store at {} ({} contacts)",
            path.display(),
            tables.raw_contact_count()
        );

        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn persist(&self, tables: &Tables) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(tables)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ContactsStore for FileContactsStore {
    fn query(&self, query: &StoreQuery) -> StoreResult<Cursor> {
        let tables = self.lock()?;
        let rows = tables.query(query)?;
        tracing::debug!("query {} -> {} rows", query.collection, rows.len());
        Ok(Cursor::new(rows))
    }

    fn apply_batch(&self, operations: Vec<BatchOperation>) -> StoreResult<Vec<BatchResult>> {
        let mut tables = self.lock()?;
        let mut staged = tables.clone();
        let results = staged.apply_batch(&operations)?;

        self.persist(&staged)?;
        *tables = staged;
        Ok(results)
    }

    fn delete(&self, uri: &RecordUri) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        let mut staged = tables.clone();
        let count = staged.delete(uri);

        if count > 0 {
            self.persist(&staged)?;
            *tables = staged;
        }
        Ok(count)
    }
}
