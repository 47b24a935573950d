//! The command context.
//!
//! [`CommandContext`] is what a handler receives when its first parameter
//! asks for it. It names the running command, carries the resolved output
//! settings and destination, and exposes application state.
//!
//! # App state
//!
//! Long-lived resources (clients, configuration) go into an [`Extensions`]
//! map when the application is built and are shared, read-only, by every
//! execution:
//!
//! ```rust
//! use bindery::{CommandContext, Extensions};
//! use std::sync::Arc;
//!
//! struct Config { broker: String }
//!
//! let mut state = Extensions::new();
//! state.insert(Config { broker: "localhost:9092".into() });
//!
//! let ctx = CommandContext::default().with_app_state(Arc::new(state));
//! let config = ctx.app_state.get_required::<Config>()?;
//! assert_eq!(config.broker, "localhost:9092");
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Shared mutable state needs interior mutability (`Mutex`, atomics).

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RenderError;
use crate::flags::OutputSettings;
use crate::output::Destination;
use crate::printable::{Printable, RowFilter};
use crate::render::{OutputDispatcher, RenderOptions};
use crate::table::PrinterCache;

/// Type-keyed container for application state.
#[derive(Default)]
pub struct Extensions {
    map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, val: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(val))
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    /// Like [`get`](Self::get), but a missing value is an error.
    pub fn get_required<T: 'static>(&self) -> Result<&T, anyhow::Error> {
        self.get::<T>().ok_or_else(|| {
            anyhow::anyhow!(
                "app state missing: type {} not found in context",
                std::any::type_name::<T>()
            )
        })
    }

    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

/// Context of one command execution.
///
/// Cloning is cheap: the destination, printer cache and app state are
/// shared.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// The command path being executed, e.g. `["topics", "list"]`.
    pub command_path: Vec<String>,

    /// Output settings resolved from the standard flags.
    pub output: OutputSettings,

    pub app_state: Arc<Extensions>,

    destination: Destination,
    printers: Arc<PrinterCache>,
}

impl CommandContext {
    pub fn new(command_path: Vec<String>, destination: Destination) -> Self {
        Self {
            command_path,
            output: OutputSettings::default(),
            app_state: Arc::new(Extensions::new()),
            destination,
            printers: Arc::new(PrinterCache::new()),
        }
    }

    pub fn with_output(mut self, output: OutputSettings) -> Self {
        self.output = output;
        self
    }

    pub fn with_app_state(mut self, app_state: Arc<Extensions>) -> Self {
        self.app_state = app_state;
        self
    }

    /// Shares a printer cache, e.g. across the commands of one application.
    pub fn with_printers(mut self, printers: Arc<PrinterCache>) -> Self {
        self.printers = printers;
        self
    }

    /// The last element of the command path.
    pub fn command_name(&self) -> &str {
        self.command_path.last().map(String::as_str).unwrap_or("")
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn printers(&self) -> &Arc<PrinterCache> {
        &self.printers
    }

    /// Prints `value` in the selected output mode.
    pub fn print_object<P: Printable + ?Sized>(&self, value: &P) -> Result<(), RenderError> {
        self.print_object_filtered(value, &[])
    }

    /// Prints `value`, keeping only table rows every filter accepts.
    ///
    /// Filters apply to table output only.
    pub fn print_object_filtered<P: Printable + ?Sized>(
        &self,
        value: &P,
        filters: &[RowFilter],
    ) -> Result<(), RenderError> {
        let options = RenderOptions {
            mode: self.output.mode,
            pretty: self.output.pretty,
            query: &self.output.query,
            filters,
            header: self.output.header_style(),
        };
        OutputDispatcher::new(&self.printers).render(&self.destination, value, &options)
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new(Vec::new(), Destination::stdout())
    }
}
