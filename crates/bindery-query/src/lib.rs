//! Query expressions over `serde_json` values.
//!
//! The language is a practical subset of JMESPath, enough to trim and reshape
//! the structured output of a command before it is printed:
//!
//! ```rust
//! use bindery_query::{search, Query};
//! use serde_json::json;
//!
//! let data = json!([
//!     {"name": "alpha", "size": 12},
//!     {"name": "beta", "size": 3},
//! ]);
//!
//! assert_eq!(search("[0].name", &data).unwrap(), json!("alpha"));
//!
//! let big = Query::compile("[?size > `10`].name").unwrap();
//! assert_eq!(big.search(&data).unwrap(), json!(["alpha"]));
//! ```
//!
//! # Supported syntax
//!
//! | Form | Example |
//! |------|---------|
//! | Field, quoted field | `name`, `"first name"` |
//! | Sub-expression | `owner.login` |
//! | Index, negative index | `[0]`, `[-1]` |
//! | Slice | `[1:3]`, `[::-1]` |
//! | List / object projection | `items[*].name`, `labels.*` |
//! | Flatten | `groups[]` |
//! | Filter | `[?active && size > limit]` |
//! | Multi-select | `[name, size]`, `{n: name}` |
//! | Pipe | `items[*].name \| [0]` |
//! | Literals | `` `{"a": 1}` ``, `'raw'`, `@` |
//! | Functions | `length(@)`, `sort(names)`, `join(', ', tags)` |
//!
//! Built-in functions: `length`, `keys`, `values`, `contains`,
//! `starts_with`, `ends_with`, `to_string`, `to_number`, `type`, `sort`,
//! `reverse`, `max`, `min`, `sum`, `avg`, `join`, `not_null`.
//!
//! Expression references (`&expr`) and the `*_by` functions are not
//! supported.

mod ast;
mod error;
mod functions;
mod interpreter;
mod lexer;
mod op;
mod parser;
mod query;
mod value;

pub use ast::Ast;
pub use error::{QueryError, Result};
pub use op::Op;
pub use query::{search, Query};
pub use value::{is_truthy, type_name};
