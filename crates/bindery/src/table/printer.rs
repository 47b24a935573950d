//! Table layout and the per-destination printer cache.

use console::Style;
use parking_lot::{Mutex, RwLock};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use super::Table;
use crate::output::Destination;

const GAP: &str = "  ";

/// Row count above which the first header is annotated.
const ANNOTATE_AFTER: usize = 3;

/// Prints tables to one destination.
///
/// Remembers the column widths of every single-value row type it printed,
/// so that printing another value of that type appends a bare row.
#[derive(Debug, Default)]
pub struct TablePrinter {
    seen: Mutex<HashMap<TypeId, Vec<usize>>>,
}

impl TablePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether headers were already printed for single values of `row_type`.
    pub fn has_printed(&self, row_type: TypeId) -> bool {
        self.seen.lock().contains_key(&row_type)
    }

    pub fn print(&self, out: &mut dyn Write, table: &Table, header: &Style) -> io::Result<()> {
        let mut seen = self.seen.lock();

        if let Some(row_type) = table.single_type() {
            if let Some(widths) = seen.get(&row_type) {
                for row in table.rows() {
                    writeln!(out, "{}", line(table, row, widths))?;
                }
                return Ok(());
            }
            if table.rows().is_empty() {
                return Ok(());
            }
        }

        let mut headers = table.headers().to_vec();
        let count = table.rows().len();
        if count > ANNOTATE_AFTER {
            if let Some(first) = headers.first_mut() {
                *first = format!("{} ({})", first, count);
            }
        }

        let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        for row in table.rows() {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        writeln!(out)?;
        let header_line = line(table, &headers, &widths);
        writeln!(out, "{}", header.apply_to(header_line))?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "{}", rule.join(GAP))?;
        for row in table.rows() {
            writeln!(out, "{}", line(table, row, &widths))?;
        }

        if let Some(row_type) = table.single_type() {
            seen.insert(row_type, widths);
        }
        Ok(())
    }
}

fn line(table: &Table, cells: &[String], widths: &[usize]) -> String {
    let mut out = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push_str(GAP);
        }
        let width = widths.get(i).copied().unwrap_or(0);
        let fill = " ".repeat(width.saturating_sub(cell.width()));
        if table.is_numeric(i) {
            out.push_str(&fill);
            out.push_str(cell);
        } else {
            out.push_str(cell);
            out.push_str(&fill);
        }
    }
    out.truncate(out.trim_end().len());
    out
}

/// One [`TablePrinter`] per destination.
///
/// Lookups take the shared lock; only the first use of a destination
/// takes the exclusive one. Entries hold a clone of their destination so
/// its identity is never reused while cached.
#[derive(Default)]
pub struct PrinterCache {
    printers: RwLock<HashMap<usize, (Destination, Arc<TablePrinter>)>>,
}

impl PrinterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn printer_for(&self, destination: &Destination) -> Arc<TablePrinter> {
        let id = destination.id();
        if let Some((_, printer)) = self.printers.read().get(&id) {
            return Arc::clone(printer);
        }

        let mut printers = self.printers.write();
        let (_, printer) = printers.entry(id).or_insert_with(|| {
            debug!(destination = id, "new table printer");
            (destination.clone(), Arc::new(TablePrinter::new()))
        });
        Arc::clone(printer)
    }

    pub fn len(&self) -> usize {
        self.printers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.printers.read().is_empty()
    }
}

impl fmt::Debug for PrinterCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrinterCache")
            .field("printers", &self.len())
            .finish()
    }
}
