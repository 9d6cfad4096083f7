//! Table storage shared by the memory and file stores.
//!
//! Mutations are applied to a clone of [`Tables`] and swapped in only when
//! every operation succeeded, which is what makes batches atomic.

use super::{
    BatchOperation, BatchResult, CellValue, Collection, Column, Mimetype, OperationKind,
    RecordUri, Row, Selection, SortDirection, StoreQuery, Value,
};
use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RawContactRecord {
    id: i64,
    account_type: Option<String>,
    account_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct DataRecord {
    id: i64,
    raw_contact_id: i64,
    mimetype: Mimetype,
    value: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    is_primary: bool,
}

impl DataRecord {
    fn to_row(&self) -> Row {
        Row::new()
            .with(Column::Id, self.id)
            .with(Column::RawContactId, self.raw_contact_id)
            .with(Column::ContactId, self.raw_contact_id)
            .with(Column::Mimetype, self.mimetype)
            .with(self.mimetype.value_column(), self.value.as_str())
            .with(Column::Kind, self.kind.clone())
            .with(Column::IsPrimary, self.is_primary)
    }
}

/// Raw contacts plus their attribute rows.
///
/// Contacts are not aggregated across raw contacts: every raw contact is its
/// own contact and shares its id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Tables {
    #[serde(default)]
    last_raw_contact_id: i64,
    #[serde(default)]
    last_data_id: i64,
    #[serde(default)]
    raw_contacts: Vec<RawContactRecord>,
    #[serde(default)]
    data: Vec<DataRecord>,
}

type OpResult = Result<BatchResult, String>;

impl Tables {
    pub(crate) fn raw_contact_count(&self) -> usize {
        self.raw_contacts.len()
    }

    pub(crate) fn data_row_count(&self) -> usize {
        self.data.len()
    }

    fn display_name(&self, raw_contact_id: i64) -> Option<&str> {
        self.data
            .iter()
            .find(|d| d.raw_contact_id == raw_contact_id && d.mimetype == Mimetype::StructuredName)
            .map(|d| d.value.as_str())
    }

    fn rows(&self, collection: Collection) -> Vec<Row> {
        let data_rows = |mimetype: Mimetype| {
            self.data
                .iter()
                .filter(|d| d.mimetype == mimetype)
                .map(DataRecord::to_row)
                .collect::<Vec<Row>>()
        };

        match collection {
            Collection::Contacts => self
                .raw_contacts
                .iter()
                .map(|r| {
                    Row::new()
                        .with(Column::Id, r.id)
                        .with(Column::DisplayName, self.display_name(r.id))
                })
                .collect(),
            Collection::RawContacts => self
                .raw_contacts
                .iter()
                .map(|r| {
                    Row::new()
                        .with(Column::Id, r.id)
                        .with(Column::AccountType, r.account_type.clone())
                        .with(Column::AccountName, r.account_name.clone())
                })
                .collect(),
            Collection::Data => self.data.iter().map(DataRecord::to_row).collect(),
            Collection::Phones => data_rows(Mimetype::Phone),
            Collection::Emails => data_rows(Mimetype::Email),
        }
    }

    fn matching_ids(&self, collection: Collection, selection: Option<&Selection>) -> Vec<i64> {
        self.rows(collection)
            .iter()
            .filter(|row| selection.map_or(true, |s| s.matches(row)))
            .filter_map(|row| row.get_i64(Column::Id))
            .collect()
    }

    pub(crate) fn query(&self, query: &StoreQuery) -> StoreResult<Vec<Row>> {
        let collection = query.collection;
        let known = collection.columns();
        let referenced = query
            .projection
            .iter()
            .copied()
            .chain(query.selection.as_ref().map(|s| s.column))
            .chain(query.sort.map(|s| s.column));
        for column in referenced {
            if !known.contains(&column) {
                return Err(StoreError::InvalidRequest(format!(
                    "{} has no column {}",
                    collection, column
                )));
            }
        }

        let mut rows: Vec<Row> = self
            .rows(collection)
            .into_iter()
            .filter(|row| query.selection.as_ref().map_or(true, |s| s.matches(row)))
            .collect();

        if let Some(sort) = query.sort {
            rows.sort_by(|a, b| {
                let ordering = a.value(sort.column).sort_cmp(b.value(sort.column));
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        if !query.projection.is_empty() {
            rows = rows
                .iter()
                .map(|row| row.project(&query.projection))
                .collect();
        }

        Ok(rows)
    }

    /// Apply every operation in order, stopping at the first failure.
    ///
    /// On error `self` may be partially modified; callers work on a clone.
    pub(crate) fn apply_batch(
        &mut self,
        operations: &[BatchOperation],
    ) -> StoreResult<Vec<BatchResult>> {
        let mut results: Vec<BatchResult> = Vec::with_capacity(operations.len());

        for (index, operation) in operations.iter().enumerate() {
            let values = resolve_values(operation, &results)
                .map_err(|reason| StoreError::Rejected { index, reason })?;

            let result = match operation.kind {
                OperationKind::Insert => self.insert(operation.collection, &values),
                OperationKind::Update => {
                    self.update(operation.collection, operation.selection.as_ref(), &values)
                }
                OperationKind::Delete => {
                    self.delete_matching(operation.collection, operation.selection.as_ref())
                }
            }
            .map_err(|reason| StoreError::Rejected { index, reason })?;

            results.push(result);
        }

        Ok(results)
    }

    fn insert(&mut self, collection: Collection, values: &Row) -> OpResult {
        match collection {
            Collection::RawContacts => {
                check_columns(collection, values, &[Column::AccountType, Column::AccountName])?;
                let account_type = optional_text(values, Column::AccountType)?;
                let account_name = optional_text(values, Column::AccountName)?;

                self.last_raw_contact_id += 1;
                let id = self.last_raw_contact_id;
                self.raw_contacts.push(RawContactRecord {
                    id,
                    account_type,
                    account_name,
                });
                Ok(BatchResult {
                    id: Some(id),
                    count: 1,
                })
            }
            Collection::Data => {
                check_columns(
                    collection,
                    values,
                    &[
                        Column::RawContactId,
                        Column::Mimetype,
                        Column::DisplayName,
                        Column::Number,
                        Column::Address,
                        Column::Kind,
                        Column::IsPrimary,
                    ],
                )?;

                let mimetype = values
                    .get_str(Column::Mimetype)
                    .and_then(Mimetype::parse)
                    .ok_or_else(|| "data row needs a known mimetype".to_string())?;

                for column in [Column::DisplayName, Column::Number, Column::Address] {
                    if column != mimetype.value_column() && values.contains(column) {
                        return Err(format!(
                            "column {} does not apply to {} rows",
                            column,
                            mimetype.as_str()
                        ));
                    }
                }

                let raw_contact_id = values
                    .get_i64(Column::RawContactId)
                    .ok_or_else(|| "data row needs a raw_contact_id".to_string())?;
                if !self.raw_contacts.iter().any(|r| r.id == raw_contact_id) {
                    return Err(format!("raw contact {} does not exist", raw_contact_id));
                }

                let value = values
                    .get_str(mimetype.value_column())
                    .ok_or_else(|| format!("{} is required", mimetype.value_column()))?
                    .to_string();
                let kind = optional_text(values, Column::Kind)?;
                let is_primary = values.get_bool(Column::IsPrimary).unwrap_or(false);

                self.last_data_id += 1;
                let id = self.last_data_id;
                self.data.push(DataRecord {
                    id,
                    raw_contact_id,
                    mimetype,
                    value,
                    kind,
                    is_primary,
                });
                Ok(BatchResult {
                    id: Some(id),
                    count: 1,
                })
            }
            other => Err(format!("{} does not accept inserts", other)),
        }
    }

    fn update(
        &mut self,
        collection: Collection,
        selection: Option<&Selection>,
        values: &Row,
    ) -> OpResult {
        let ids = self.matching_ids(collection, selection);

        match collection {
            Collection::RawContacts => {
                check_columns(collection, values, &[Column::AccountType, Column::AccountName])?;
                let account_type = optional_text(values, Column::AccountType)?;
                let account_name = optional_text(values, Column::AccountName)?;

                let mut count = 0;
                for record in self.raw_contacts.iter_mut().filter(|r| ids.contains(&r.id)) {
                    if values.contains(Column::AccountType) {
                        record.account_type = account_type.clone();
                    }
                    if values.contains(Column::AccountName) {
                        record.account_name = account_name.clone();
                    }
                    count += 1;
                }
                Ok(BatchResult { id: None, count })
            }
            Collection::Data | Collection::Phones | Collection::Emails => {
                check_columns(
                    collection,
                    values,
                    &[
                        Column::DisplayName,
                        Column::Number,
                        Column::Address,
                        Column::Kind,
                        Column::IsPrimary,
                    ],
                )?;
                let kind = optional_text(values, Column::Kind)?;

                let mut count = 0;
                for record in self.data.iter_mut().filter(|d| ids.contains(&d.id)) {
                    if let Some(value) = values.get_str(record.mimetype.value_column()) {
                        record.value = value.to_string();
                    }
                    if values.contains(Column::Kind) {
                        record.kind = kind.clone();
                    }
                    if let Some(is_primary) = values.get_bool(Column::IsPrimary) {
                        record.is_primary = is_primary;
                    }
                    count += 1;
                }
                Ok(BatchResult { id: None, count })
            }
            Collection::Contacts => Err("contacts does not accept updates".to_string()),
        }
    }

    fn delete_matching(
        &mut self,
        collection: Collection,
        selection: Option<&Selection>,
    ) -> OpResult {
        let ids = self.matching_ids(collection, selection);
        let count = ids
            .iter()
            .filter(|id| self.remove(RecordUri::new(collection, **id)))
            .count();
        Ok(BatchResult { id: None, count })
    }

    /// Remove one record. Removing a contact cascades to its attribute rows.
    fn remove(&mut self, uri: RecordUri) -> bool {
        match uri.collection {
            Collection::Contacts | Collection::RawContacts => {
                let before = self.raw_contacts.len();
                self.raw_contacts.retain(|r| r.id != uri.id);
                if self.raw_contacts.len() == before {
                    return false;
                }
                self.data.retain(|d| d.raw_contact_id != uri.id);
                true
            }
            Collection::Data | Collection::Phones | Collection::Emails => {
                let wanted = match uri.collection {
                    Collection::Phones => Some(Mimetype::Phone),
                    Collection::Emails => Some(Mimetype::Email),
                    _ => None,
                };
                let before = self.data.len();
                self.data.retain(|d| {
                    !(d.id == uri.id && wanted.map_or(true, |m| m == d.mimetype))
                });
                self.data.len() != before
            }
        }
    }

    pub(crate) fn delete(&mut self, uri: &RecordUri) -> usize {
        usize::from(self.remove(*uri))
    }
}

fn resolve_values(operation: &BatchOperation, results: &[BatchResult]) -> Result<Row, String> {
    let mut row = Row::new();
    for (column, cell) in &operation.values {
        let value = match cell {
            CellValue::Literal(value) => value.clone(),
            CellValue::BackReference(target) => {
                let result = results.get(*target).ok_or_else(|| {
                    format!("back-reference to operation {} which has not run", target)
                })?;
                let id = result.id.ok_or_else(|| {
                    format!("back-reference to operation {} which produced no id", target)
                })?;
                Value::Integer(id)
            }
        };
        row.set(*column, value);
    }
    Ok(row)
}

fn check_columns(collection: Collection, values: &Row, allowed: &[Column]) -> Result<(), String> {
    match values.columns().find(|c| !allowed.contains(c)) {
        Some(column) => Err(format!("{} cannot be written on {}", column, collection)),
        None => Ok(()),
    }
}

fn optional_text(values: &Row, column: Column) -> Result<Option<String>, String> {
    match values.value(column) {
        Value::Null => Ok(None),
        Value::Text(s) => Ok(Some(s.clone())),
        other => Err(format!("{} must be text, got {:?}", column, other)),
    }
}
