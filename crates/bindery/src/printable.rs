//! Values the output dispatcher can render.
//!
//! Row types (anything implementing [`TableRow`], usually through
//! `#[derive(TableRow)]`) print as tables, and so do vectors and slices of
//! them. Any other serializable value can be wrapped in [`Json`]; it prints
//! as JSON or YAML, and as a table synthesized from its JSON form.

use serde::Serialize;
use std::any::{Any, TypeId};
use std::fmt;

use crate::table::{Table, TableRow};

/// Something the output dispatcher can render in every mode.
pub trait Printable {
    fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error>;

    fn to_yaml(&self) -> Result<String, serde_yaml::Error>;

    /// The table form, `None` when the type has no row schema or the
    /// schema has no columns.
    fn table(&self, _filters: &[RowFilter]) -> Option<Table> {
        None
    }
}

/// Wraps any serializable value for printing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);

impl<T: Serialize> Printable for Json<T> {
    fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.0)
    }

    fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.0)
    }
}

impl Printable for serde_json::Value {
    fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        Ok(self.clone())
    }

    fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl<T: TableRow> Printable for T {
    fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    fn table(&self, filters: &[RowFilter]) -> Option<Table> {
        if T::schema().columns().is_empty() {
            return None;
        }
        Some(Table::single(self, filters))
    }
}

impl<T: TableRow> Printable for [T] {
    fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    fn table(&self, filters: &[RowFilter]) -> Option<Table> {
        if T::schema().columns().is_empty() {
            return None;
        }
        Some(Table::from_rows(self, filters))
    }
}

impl<T: TableRow> Printable for Vec<T> {
    fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        self.as_slice().to_json_value()
    }

    fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        self.as_slice().to_yaml()
    }

    fn table(&self, filters: &[RowFilter]) -> Option<Table> {
        self.as_slice().table(filters)
    }
}

type Predicate = dyn Fn(&dyn Any) -> bool + Send + Sync;

/// A predicate over one table row.
///
/// Filters only apply to rows of the type they were written for; rows of
/// any other type pass untouched.
pub struct RowFilter {
    row_type: TypeId,
    predicate: Box<Predicate>,
}

impl RowFilter {
    pub fn accepts(&self, row: &dyn Any) -> bool {
        (self.predicate)(row)
    }

    /// The row type this filter inspects.
    pub fn row_type(&self) -> TypeId {
        self.row_type
    }
}

impl fmt::Debug for RowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowFilter")
            .field("row_type", &self.row_type)
            .finish_non_exhaustive()
    }
}

/// Builds a [`RowFilter`] for rows of type `T`.
///
/// ```rust
/// use bindery::filter;
///
/// let big = filter(|n: &u64| *n > 10);
/// assert!(big.accepts(&20u64));
/// assert!(!big.accepts(&5u64));
/// assert!(big.accepts(&"other type"));
/// ```
pub fn filter<T, F>(predicate: F) -> RowFilter
where
    T: 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    RowFilter {
        row_type: TypeId::of::<T>(),
        predicate: Box::new(move |row: &dyn Any| row.downcast_ref::<T>().map_or(true, &predicate)),
    }
}

/// True when every filter accepts `row`.
pub(crate) fn keep(row: &dyn Any, filters: &[RowFilter]) -> bool {
    filters.iter().all(|filter| filter.accepts(row))
}
