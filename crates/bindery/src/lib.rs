//! Bind plain handler functions to clap options, and print what they return.
//!
//! A handler is any function whose parameters are option values, the
//! [`CommandContext`] or the positional [`Args`], and whose output is
//! nothing, text, a printable object, or a `Result` of those. The adapter
//! works out which parameter each set option belongs to, calls the
//! handler, and routes its outputs: errors propagate unchanged, text goes
//! to the informational printer, objects go to the structured output
//! dispatcher (table, JSON or YAML, with an optional query).
//!
//! # Pipeline
//!
//! 1. [`classify`] turns a [`HandlerShape`] and the number of set options
//!    into a [`Descriptor`]. Type wins over position: a context or `Args`
//!    parameter reserves its slot regardless of the option count.
//! 2. [`bind`] fills a [`Frame`] from the set options, in declaration
//!    order, collecting every problem into one [`ShapeError`].
//! 3. [`invoke`] calls the handler and dispatches its outputs.
//!
//! # Example
//!
//! ```rust
//! use bindery::{Command, Destination, OptionSpec, TableRow};
//! use serde::Serialize;
//!
//! #[derive(Serialize, TableRow)]
//! struct Topic {
//!     #[header("Name")]
//!     name: String,
//!     #[header("Partitions", number)]
//!     partitions: u32,
//! }
//!
//! let list = Command::new("list")
//!     .option(OptionSpec::of::<String>("prefix"))
//!     .printing_objects()
//!     .action(|prefix: String| -> anyhow::Result<Vec<Topic>> {
//!         Ok(vec![Topic { name: format!("{}-events", prefix), partitions: 12 }])
//!     });
//!
//! let (dest, captured) = Destination::capture();
//! list.execute(["list", "--prefix", "app", "-o", "json", "--no-pretty"], dest)?;
//! assert_eq!(captured.contents(), "[{\"name\":\"app-events\",\"partitions\":12}]\n");
//! # Ok::<(), bindery::ActionError>(())
//! ```

extern crate self as bindery;

mod action;
mod bind;
pub mod checks;
mod command;
mod context;
mod descriptor;
mod error;
pub mod flags;
pub mod info;
mod invoke;
mod option;
mod output;
mod printable;
mod render;
mod shape;
pub mod table;
mod value;

pub use action::{Action, Args, FromSlot, IntoAction, IntoReturns, ReturnValue, Returned};
pub use bind::{bind, Frame, Slot};
pub use command::{App, Command};
pub use context::{CommandContext, Extensions};
pub use descriptor::{classify, Descriptor, FirstReturn};
pub use error::{ActionError, BindingIssue, CodedError, RenderError, ShapeError, UsageError};
pub use flags::OutputSettings;
pub use invoke::invoke;
pub use option::{
    FloatWidth, IntWidth, IpMask, IpNet, Kind, LiveOptions, OptionSet, OptionSpec, OptionType,
    Options,
};
pub use output::{Captured, Destination, OutputMode};
pub use printable::{filter, Json, Printable, RowFilter};
pub use render::{OutputDispatcher, RenderOptions};
pub use shape::{HandlerShape, ParamKind, ReturnKind};
pub use table::{Directive, PrinterCache, RowSchema, TableCell, TableRow};
pub use value::{extract, Value};

/// `#[derive(TableRow)]`: see [`TableRow`].
pub use bindery_macros::TableRow;

#[doc(hidden)]
pub mod __private {
    pub use crate::action::{value_kinds, value_returns};
    pub use once_cell::sync::Lazy;
}
