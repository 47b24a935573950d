//! Row schemas.

use serde::Serialize;

use super::cell::{Directive, TableCell};

/// One table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    header: &'static str,
    directive: Directive,
    numeric: bool,
}

impl Column {
    /// A column for a field of type `F`.
    pub fn new<F: TableCell + ?Sized>(header: &'static str, directive: Directive) -> Self {
        Self {
            header,
            directive,
            numeric: F::NUMERIC || directive.number || directive.len,
        }
    }

    pub fn header(&self) -> &'static str {
        self.header
    }

    pub fn directive(&self) -> &Directive {
        &self.directive
    }

    /// Right aligned when true.
    pub fn is_numeric(&self) -> bool {
        self.numeric
    }
}

/// Columns of a row type, flattened fields already spliced in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSchema {
    columns: Vec<Column>,
}

impl RowSchema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(Column::header)
    }
}

/// A type that prints as one table row.
///
/// Implement it with `#[derive(TableRow)]`:
///
/// ```rust
/// use bindery::TableRow;
/// use serde::Serialize;
///
/// #[derive(Serialize, TableRow)]
/// struct Topic {
///     #[header("Name")]
///     name: String,
///     #[header("Partitions", number)]
///     partitions: u32,
///     #[header("Compacted")]
///     compacted: bool,
///     internal_id: u64,
/// }
///
/// let topic = Topic { name: "logs".into(), partitions: 1200, compacted: true, internal_id: 9 };
/// let headers: Vec<_> = Topic::schema().headers().collect();
/// assert_eq!(headers, ["Name", "Partitions", "Compacted"]);
/// assert_eq!(topic.cells(), ["logs", "1,200", "Yes"]);
/// ```
///
/// The schema is built on first use and cached for the life of the process.
pub trait TableRow: Serialize + 'static {
    fn schema() -> &'static RowSchema;

    fn cells(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_alignment_follows_type_and_directive() {
        assert!(Column::new::<u32>("Size", Directive::PLAIN).is_numeric());
        assert!(!Column::new::<String>("Name", Directive::PLAIN).is_numeric());
        let number = Directive {
            number: true,
            ..Directive::PLAIN
        };
        assert!(Column::new::<String>("Count", number).is_numeric());
        assert!(Column::new::<str>("Count", number).is_numeric());
    }
}
