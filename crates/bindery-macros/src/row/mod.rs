//! The `TableRow` derive.

mod attrs;
mod derive;

pub use derive::table_row_derive_impl;
