//! The structured output dispatcher.
//!
//! [`OutputDispatcher::render`] prints one [`Printable`] value to a
//! destination in the selected [`OutputMode`]:
//!
//! - **JSON**: the value's JSON form, filtered by the query when one is
//!   given, pretty printed with two-space indentation unless disabled.
//! - **YAML**: the value serialized directly. Queries do not apply.
//! - **Table**: the typed table when the value has a row schema, otherwise
//!   a table synthesized from its (queried) JSON form.

use console::Style;
use tracing::{debug, trace};

use crate::error::RenderError;
use crate::output::{Destination, OutputMode};
use crate::printable::{Printable, RowFilter};
use crate::table::{PrinterCache, Table};

/// Per-call rendering options.
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    pub mode: OutputMode,
    pub pretty: bool,
    pub query: &'a str,
    pub filters: &'a [RowFilter],
    pub header: Style,
}

/// Renders values, taking table printers from a shared cache.
#[derive(Debug, Clone, Copy)]
pub struct OutputDispatcher<'a> {
    printers: &'a PrinterCache,
}

impl<'a> OutputDispatcher<'a> {
    pub fn new(printers: &'a PrinterCache) -> Self {
        Self { printers }
    }

    pub fn render<P: Printable + ?Sized>(
        &self,
        destination: &Destination,
        value: &P,
        options: &RenderOptions<'_>,
    ) -> Result<(), RenderError> {
        debug!(mode = %options.mode, query = options.query, "rendering");
        match options.mode {
            OutputMode::Json => {
                let text = json(value, options.pretty, options.query)?;
                destination.write_all(text.as_bytes())?;
            }
            OutputMode::Yaml => {
                let text = value.to_yaml()?;
                destination.write_all(text.as_bytes())?;
            }
            OutputMode::Table => {
                let table = match value.table(options.filters) {
                    Some(table) => table,
                    None => {
                        trace!("no row schema, synthesizing table from JSON");
                        Table::from_json(&queried(value, options.query)?)
                    }
                };
                let printer = self.printers.printer_for(destination);
                destination.with_writer(|out| printer.print(out, &table, &options.header))?;
            }
        }
        Ok(())
    }
}

/// The value's JSON form with the query applied.
///
/// Empty queries, and empty collections, leave the document untouched.
fn queried<P: Printable + ?Sized>(value: &P, query: &str) -> Result<serde_json::Value, RenderError> {
    let doc = value.to_json_value()?;
    if query.trim().is_empty() || is_empty_collection(&doc) {
        return Ok(doc);
    }
    trace!(query, "applying query");
    Ok(bindery_query::search(query, &doc)?)
}

fn is_empty_collection(doc: &serde_json::Value) -> bool {
    match doc {
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// JSON text for `value`, newline terminated.
pub fn json<P: Printable + ?Sized>(value: &P, pretty: bool, query: &str) -> Result<String, RenderError> {
    let doc = queried(value, query)?;
    let mut text = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    text = unescape_html(&text);
    text.push('\n');
    Ok(text)
}

/// Reverses the `\u003c`, `\u003e` and `\u0026` escapes, leaving
/// escaped backslashes alone.
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let replacement = if tail.starts_with("\\u003c") {
            Some('<')
        } else if tail.starts_with("\\u003e") {
            Some('>')
        } else if tail.starts_with("\\u0026") {
            Some('&')
        } else {
            None
        };
        match replacement {
            Some(ch) => {
                out.push(ch);
                rest = &tail[6..];
            }
            None => {
                // Copy the backslash and whatever it escapes verbatim.
                let escaped = tail[1..].chars().next().map_or(0, char::len_utf8);
                out.push_str(&tail[..1 + escaped]);
                rest = &tail[1 + escaped..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printable::Json;
    use serde_json::json;

    fn options(mode: OutputMode, query: &str) -> RenderOptions<'_> {
        RenderOptions {
            mode,
            pretty: false,
            query,
            filters: &[],
            header: Style::new(),
        }
    }

    fn render(value: &dyn Printable, opts: &RenderOptions<'_>) -> String {
        let cache = PrinterCache::new();
        let (dest, captured) = Destination::capture();
        OutputDispatcher::new(&cache).render(&dest, value, opts).unwrap();
        captured.contents()
    }

    #[test]
    fn json_query_selects_first_element() {
        let doc = json!([{"name": "a"}, {"name": "b"}]);
        assert_eq!(render(&doc, &options(OutputMode::Json, "[0]")), "{\"name\":\"a\"}\n");
        assert_eq!(
            render(&doc, &options(OutputMode::Json, "")),
            "[{\"name\":\"a\"},{\"name\":\"b\"}]\n"
        );
    }

    #[test]
    fn json_pretty_uses_two_spaces() {
        let mut opts = options(OutputMode::Json, "");
        opts.pretty = true;
        assert_eq!(render(&Json(json!({"a": 1})), &opts), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn query_skipped_for_empty_collection() {
        let doc = json!([]);
        assert_eq!(render(&doc, &options(OutputMode::Json, "[0].name")), "[]\n");
    }

    #[test]
    fn query_errors_propagate() {
        let cache = PrinterCache::new();
        let (dest, captured) = Destination::capture();
        let err = OutputDispatcher::new(&cache)
            .render(&dest, &json!([1]), &options(OutputMode::Json, "[?"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Query(_)));
        assert_eq!(captured.contents(), "");
    }

    #[test]
    fn yaml_ignores_query() {
        let out = render(&json!({"a": 1}), &options(OutputMode::Yaml, "b"));
        assert_eq!(out, "a: 1\n");
    }

    #[test]
    fn table_without_schema_uses_json_form() {
        let out = render(
            &json!([{"name": "a"}, {"name": "b"}]),
            &options(OutputMode::Table, "[1]"),
        );
        assert_eq!(out, "\nname\n----\nb\n");
    }

    #[test]
    fn unescape_restores_html_characters() {
        assert_eq!(unescape_html(r#""\u003cb\u003e \u0026""#), r#""<b> &""#);
        assert_eq!(unescape_html(r#""\\u003c""#), r#""\\u003c""#);
        assert_eq!(unescape_html(r#""a\"b""#), r#""a\"b""#);
    }
}
