//! Proc macros for bindery.
//!
//! - [`TableRow`] - Generate a row schema and cell extraction from struct
//!   field annotations.
//!
//! The generated code refers to `::bindery`, so the macro is meant to be
//! used through the re-export `bindery::TableRow`.

mod row;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `bindery::TableRow` (and the handler return traits) for a struct.
///
/// Only fields carrying a `#[header(...)]` attribute become columns, in
/// declaration order. Untagged fields still serialize to JSON and YAML but
/// never reach the table.
///
/// # Field Attributes
///
/// | Attribute | Effect |
/// |-----------|--------|
/// | `#[header("Name")]` | Column titled `Name` |
/// | `#[header("Size", number)]` | Grouped number, right aligned; text fields are parsed |
/// | `#[header("Tags", len)]` | Collection length instead of its elements |
/// | `#[header("Owner", alt = "-")]` | Shown when the cell would be empty |
/// | `#[header(flatten)]` | Splice the columns of a nested `TableRow` |
///
/// # Example
///
/// ```ignore
/// use bindery::TableRow;
/// use serde::Serialize;
///
/// #[derive(Serialize, TableRow)]
/// struct Topic {
///     #[header("Name")]
///     name: String,
///     #[header("Partitions", number)]
///     partitions: u32,
///     #[header("Replicas", len)]
///     replicas: Vec<u32>,
///     internal: bool,
/// }
/// ```
///
/// # Compile-Time Errors
///
/// - Enums, tuple structs and unit structs
/// - Generic structs
/// - Unknown header options
#[proc_macro_derive(TableRow, attributes(header))]
pub fn table_row_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    row::table_row_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
