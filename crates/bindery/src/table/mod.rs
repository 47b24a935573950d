//! Table output.
//!
//! A [`Table`] is built either from typed rows ([`TableRow`], with their
//! cached [`RowSchema`]) or, for values without a schema, from the generic
//! JSON form of the value. [`TablePrinter`] lays it out; the
//! [`PrinterCache`] hands out one printer per destination.
//!
//! Layout: a blank line, the header line, a dashed rule, then one line per
//! row. Numeric columns are right aligned. With more than three rows the
//! first header carries the row count, e.g. `Name (5)`.

mod cell;
mod printer;
mod schema;

pub use cell::{group_thousands, Directive, TableCell};
pub use printer::{PrinterCache, TablePrinter};
pub use schema::{Column, RowSchema, TableRow};

use serde_json::Value;
use std::any::{Any, TypeId};

use crate::printable::{keep, RowFilter};

/// Laid-out cell text, ready for printing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    numeric: Vec<bool>,
    rows: Vec<Vec<String>>,
    single: Option<TypeId>,
}

impl Table {
    pub fn new(headers: Vec<String>, numeric: Vec<bool>) -> Self {
        Self {
            headers,
            numeric,
            rows: Vec::new(),
            single: None,
        }
    }

    fn from_schema(schema: &RowSchema) -> Self {
        Self::new(
            schema.headers().map(str::to_string).collect(),
            schema.columns().iter().map(Column::is_numeric).collect(),
        )
    }

    /// A table of one value. Printing it again on the same destination
    /// appends a bare row.
    pub(crate) fn single<T: TableRow>(row: &T, filters: &[RowFilter]) -> Self {
        let mut table = Self::from_schema(T::schema());
        table.single = Some(TypeId::of::<T>());
        if keep(row as &dyn Any, filters) {
            table.rows.push(row.cells());
        }
        table
    }

    pub(crate) fn from_rows<T: TableRow>(rows: &[T], filters: &[RowFilter]) -> Self {
        let mut table = Self::from_schema(T::schema());
        table.rows = rows
            .iter()
            .filter(|row| keep(*row as &dyn Any, filters))
            .map(T::cells)
            .collect();
        table
    }

    /// Synthesizes a table from a JSON document.
    ///
    /// Each array element is a row (a non-array value is a single row).
    /// Object keys become headers in first-seen order, nested objects are
    /// flattened with dotted keys, and bare scalars go under `Value`.
    pub fn from_json(value: &Value) -> Self {
        let items: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            Value::Null => Vec::new(),
            other => vec![other],
        };

        let mut table = Table::default();
        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let mut record = Vec::new();
            flatten(item, "", &mut record);
            for (key, cell) in &record {
                match table.headers.iter().position(|h| h == key) {
                    Some(i) => table.numeric[i] &= cell.numeric,
                    None => {
                        table.headers.push(key.clone());
                        table.numeric.push(cell.numeric);
                    }
                }
            }
            records.push(record);
        }

        table.rows = records
            .into_iter()
            .map(|record| {
                table
                    .headers
                    .iter()
                    .map(|header| {
                        record
                            .iter()
                            .find(|(key, _)| key == header)
                            .map(|(_, cell)| cell.text.clone())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        table
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_numeric(&self, column: usize) -> bool {
        self.numeric.get(column).copied().unwrap_or(false)
    }

    /// The row type, when this table holds a single typed value.
    pub fn single_type(&self) -> Option<TypeId> {
        self.single
    }
}

struct FlatCell {
    text: String,
    numeric: bool,
}

const VALUE_HEADER: &str = "Value";

fn flatten(value: &Value, prefix: &str, acc: &mut Vec<(String, FlatCell)>) {
    let key = if prefix.is_empty() { VALUE_HEADER } else { prefix };
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (k, v) in map {
                let nested = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", prefix, k)
                };
                flatten(v, &nested, acc);
            }
        }
        other => acc.push((key.to_string(), scalar_cell(other))),
    }
}

fn scalar_cell(value: &Value) -> FlatCell {
    let text = match value {
        Value::Null => String::new(),
        Value::Bool(b) => Directive::PLAIN.render(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Directive::PLAIN.render(&i),
            None => match n.as_u64() {
                Some(u) => Directive::PLAIN.render(&u),
                None => Directive::PLAIN.render(&n.as_f64().unwrap_or_default()),
            },
        },
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(|v| !v.is_array() && !v.is_object()) => items
            .iter()
            .map(|v| scalar_cell(v).text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    };
    FlatCell {
        text,
        numeric: value.is_number(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printable::{filter, Printable};
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize, bindery::TableRow)]
    struct Group {
        #[header("Group")]
        name: String,
        #[header("Members", len)]
        members: Vec<String>,
    }

    #[derive(Serialize, bindery::TableRow)]
    struct Untagged {
        name: String,
        size: u32,
    }

    #[test]
    fn typed_rows_keep_accepted_rows() {
        let groups = vec![
            Group {
                name: "g".into(),
                members: Vec::new(),
            },
            Group {
                name: "h".into(),
                members: vec!["ann".into()],
            },
        ];
        let table = Table::from_rows(&groups, &[]);
        assert_eq!(table.headers(), ["Group", "Members"]);
        assert_eq!(table.rows(), [vec!["g", "0"], vec!["h", "1"]]);
        assert!(table.single_type().is_none());

        let named_h = filter(|g: &Group| g.name == "h");
        let table = Table::from_rows(&groups, &[named_h]);
        assert_eq!(table.rows(), [vec!["h", "1"]]);
    }

    #[test]
    fn rows_without_columns_have_no_typed_table() {
        let rows = vec![Untagged {
            name: "a".into(),
            size: 3,
        }];
        assert!(rows.table(&[]).is_none());
        assert!(rows[0].table(&[]).is_none());
    }

    #[test]
    fn json_objects_become_rows() {
        let table = Table::from_json(&json!([
            {"name": "a", "size": 1200, "meta": {"owner": "x"}},
            {"name": "b", "size": 3, "extra": true}
        ]));
        assert_eq!(table.headers(), ["name", "size", "meta.owner", "extra"]);
        assert_eq!(
            table.rows(),
            [
                vec!["a", "1,200", "x", ""],
                vec!["b", "3", "", "Yes"]
            ]
        );
        assert!(table.is_numeric(1));
        assert!(!table.is_numeric(0));
        assert!(table.single_type().is_none());
    }

    #[test]
    fn json_scalars_use_value_header() {
        let table = Table::from_json(&json!(["x", "y"]));
        assert_eq!(table.headers(), ["Value"]);
        assert_eq!(table.rows().len(), 2);

        let table = Table::from_json(&json!(2.5));
        assert_eq!(table.rows(), [vec!["2.50"]]);
        assert!(table.is_numeric(0));
    }

    #[test]
    fn json_scalar_lists_join() {
        let table = Table::from_json(&json!({"tags": ["a", "b"], "empty": {}}));
        assert_eq!(table.headers(), ["tags", "empty"]);
        assert_eq!(table.rows(), [vec!["a, b", "{}"]]);
    }

    #[test]
    fn null_is_empty() {
        let table = Table::from_json(&Value::Null);
        assert!(table.headers().is_empty());
        assert!(table.rows().is_empty());
    }
}
