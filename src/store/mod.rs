//! Contacts store interface.
//!
//! The store is the external source of truth. It is modelled on a
//! content-provider style API: typed queries over named collections returning
//! a row cursor, ordered atomic batches whose later operations may refer back
//! to ids generated earlier in the same batch, and deletes by record URI.
//!
//! Two implementations ship with the crate: [`MemoryContactsStore`] (also the
//! fake used in tests) and [`FileContactsStore`], which persists the same
//! tables as a JSON snapshot.

mod file;
mod memory;
mod tables;

pub use file::FileContactsStore;
pub use memory::MemoryContactsStore;

use crate::domain::ContactId;
use crate::error::StoreResult;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// Type label written for phone rows created by this layer.
pub const TYPE_MOBILE: &str = "mobile";

/// Type label written for email rows created by this layer.
pub const TYPE_HOME: &str = "home";

/// The external contacts store.
///
/// All calls are blocking. Implementations must apply a batch atomically:
/// either every operation takes effect or none does.
pub trait ContactsStore: Send + Sync {
    /// Read rows of one collection.
    fn query(&self, query: &StoreQuery) -> StoreResult<Cursor>;

    /// Apply an ordered batch as a single atomic unit.
    fn apply_batch(&self, operations: Vec<BatchOperation>) -> StoreResult<Vec<BatchResult>>;

    /// Delete one record, returning the number of records removed.
    fn delete(&self, uri: &RecordUri) -> StoreResult<usize>;
}

/// Named collections exposed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Aggregated identities: id and display name.
    Contacts,
    /// Identity rows as inserted, with their account association.
    RawContacts,
    /// Attribute rows of every kind.
    Data,
    /// Phone attribute rows.
    Phones,
    /// Email attribute rows.
    Emails,
}

impl Collection {
    /// Columns that may be projected, filtered or sorted on.
    pub fn columns(self) -> &'static [Column] {
        use Column::*;
        match self {
            Self::Contacts => &[Id, DisplayName],
            Self::RawContacts => &[Id, AccountType, AccountName],
            Self::Data => &[
                Id,
                RawContactId,
                ContactId,
                Mimetype,
                DisplayName,
                Number,
                Address,
                Kind,
                IsPrimary,
            ],
            Self::Phones => &[Id, RawContactId, ContactId, Number, Kind, IsPrimary],
            Self::Emails => &[Id, RawContactId, ContactId, Address, Kind, IsPrimary],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contacts => "contacts",
            Self::RawContacts => "raw_contacts",
            Self::Data => "data",
            Self::Phones => "phones",
            Self::Emails => "emails",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column names shared by all collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Id,
    DisplayName,
    ContactId,
    RawContactId,
    Mimetype,
    Number,
    Address,
    /// Type label of an attribute row, such as `mobile` or `home`
    Kind,
    IsPrimary,
    AccountType,
    AccountName,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::DisplayName => "display_name",
            Self::ContactId => "contact_id",
            Self::RawContactId => "raw_contact_id",
            Self::Mimetype => "mimetype",
            Self::Number => "number",
            Self::Address => "address",
            Self::Kind => "type",
            Self::IsPrimary => "is_primary",
            Self::AccountType => "account_type",
            Self::AccountName => "account_name",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of an attribute row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mimetype {
    StructuredName,
    Phone,
    Email,
}

impl Mimetype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StructuredName => "structured_name",
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "structured_name" => Some(Self::StructuredName),
            "phone" => Some(Self::Phone),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    /// The column holding the row's value for this kind.
    pub fn value_column(self) -> Column {
        match self {
            Self::StructuredName => Column::DisplayName,
            Self::Phone => Column::Number,
            Self::Email => Column::Address,
        }
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
    Bool(bool),
}

static NULL: Value = Value::Null;

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Equality for `column = ?` filters. Integers match their decimal text
    /// form and `NULL` matches nothing.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => false,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (a, b) => match (a.as_i64(), b.as_i64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// Sort order: nulls first, then numbers, then text by byte order.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) | Value::Integer(_) => 1,
                Value::Text(_) => 2,
            }
        }

        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.as_bytes().cmp(b.as_bytes()),
            (a, b) if rank(a) == 1 && rank(b) == 1 => {
                let x = a.as_i64().or_else(|| a.as_bool().map(i64::from));
                let y = b.as_i64().or_else(|| b.as_bool().map(i64::from));
                x.cmp(&y)
            }
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<ContactId> for Value {
    fn from(id: ContactId) -> Self {
        Self::Integer(id.get())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Mimetype> for Value {
    fn from(m: Mimetype) -> Self {
        Self::Text(m.as_str().to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

/// One result row, or the resolved values of a batch operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<Column, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: Column, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: Column, value: impl Into<Value>) {
        self.cells.insert(column, value.into());
    }

    /// Cell value; absent columns read as `NULL`.
    pub fn value(&self, column: Column) -> &Value {
        self.cells.get(&column).unwrap_or(&NULL)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.cells.contains_key(&column)
    }

    pub fn get_i64(&self, column: Column) -> Option<i64> {
        self.value(column).as_i64()
    }

    pub fn get_str(&self, column: Column) -> Option<&str> {
        self.value(column).as_str()
    }

    pub fn get_bool(&self, column: Column) -> Option<bool> {
        self.value(column).as_bool()
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.cells.keys().copied()
    }

    /// Keep only the given columns, reading missing ones as `NULL`.
    pub fn project(&self, columns: &[Column]) -> Row {
        Row {
            cells: columns
                .iter()
                .map(|c| (*c, self.value(*c).clone()))
                .collect(),
        }
    }
}

/// A `column = ?` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub column: Column,
    pub arg: Value,
}

impl Selection {
    pub fn eq(column: Column, arg: impl Into<Value>) -> Self {
        Self {
            column,
            arg: arg.into(),
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        row.value(self.column).matches(&self.arg)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ?", self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: Column,
    pub direction: SortDirection,
}

/// A read request against one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    pub collection: Collection,
    /// Columns to return; empty means every column of the collection
    pub projection: Vec<Column>,
    pub selection: Option<Selection>,
    pub sort: Option<SortOrder>,
}

impl StoreQuery {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            projection: Vec::new(),
            selection: None,
            sort: None,
        }
    }

    pub fn project(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.projection = columns.into_iter().collect();
        self
    }

    pub fn filter(mut self, column: Column, arg: impl Into<Value>) -> Self {
        self.selection = Some(Selection::eq(column, arg));
        self
    }

    pub fn order_by(mut self, column: Column, direction: SortDirection) -> Self {
        self.sort = Some(SortOrder { column, direction });
        self
    }
}

/// Forward-only cursor over query results.
#[derive(Debug, Default)]
pub struct Cursor {
    rows: VecDeque<Row>,
}

impl Cursor {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows: rows.into() }
    }

    /// Rows not yet consumed.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Iterator for Cursor {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Insert,
    Update,
    Delete,
}

/// A value written by a batch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Literal(Value),
    /// The id generated by the operation at this index of the same batch
    BackReference(usize),
}

/// One step of an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOperation {
    pub kind: OperationKind,
    pub collection: Collection,
    pub values: Vec<(Column, CellValue)>,
    pub selection: Option<Selection>,
}

impl BatchOperation {
    fn new(kind: OperationKind, collection: Collection) -> Self {
        Self {
            kind,
            collection,
            values: Vec::new(),
            selection: None,
        }
    }

    pub fn insert(collection: Collection) -> Self {
        Self::new(OperationKind::Insert, collection)
    }

    pub fn update(collection: Collection) -> Self {
        Self::new(OperationKind::Update, collection)
    }

    pub fn delete(collection: Collection) -> Self {
        Self::new(OperationKind::Delete, collection)
    }

    pub fn with_value(mut self, column: Column, value: impl Into<Value>) -> Self {
        self.values
            .push((column, CellValue::Literal(value.into())));
        self
    }

    /// Write the id produced by batch operation `index` into `column`.
    pub fn with_back_reference(mut self, column: Column, index: usize) -> Self {
        self.values.push((column, CellValue::BackReference(index)));
        self
    }

    pub fn with_selection(mut self, column: Column, arg: impl Into<Value>) -> Self {
        self.selection = Some(Selection::eq(column, arg));
        self
    }
}

/// Outcome of one applied batch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    /// Id generated by an insert
    pub id: Option<i64>,
    /// Rows affected
    pub count: usize,
}

/// Address of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordUri {
    pub collection: Collection,
    pub id: i64,
}

impl RecordUri {
    pub fn new(collection: Collection, id: i64) -> Self {
        Self { collection, id }
    }

    pub fn contact(id: ContactId) -> Self {
        Self::new(Collection::Contacts, id.get())
    }
}

impl fmt::Display for RecordUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contacts://{}/{}", self.collection, self.id)
    }
}
