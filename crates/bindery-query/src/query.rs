//! Compiled query expressions.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::ast::Ast;
use crate::error::{QueryError, Result};
use crate::interpreter::interpret;
use crate::parser::parse;

/// A compiled query expression.
///
/// Compile once with [`Query::compile`] and evaluate against any number of
/// documents with [`Query::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    source: String,
    ast: Ast,
}

impl Query {
    /// Compiles an expression, reporting syntax errors, unknown functions
    /// and wrong argument counts up front.
    pub fn compile(expr: &str) -> Result<Self> {
        Ok(Self {
            source: expr.to_string(),
            ast: parse(expr)?,
        })
    }

    /// Evaluates the expression against `data`.
    ///
    /// Missing fields and out-of-range indexes produce `null` rather than
    /// errors; only function type mismatches fail at this stage.
    pub fn search(&self, data: &Value) -> Result<Value> {
        interpret(&self.ast, data)
    }

    /// The expression this query was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The parsed expression tree.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Query::compile(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Compiles and evaluates `expr` in one step.
pub fn search(expr: &str, data: &Value) -> Result<Value> {
    Query::compile(expr)?.search(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compile_keeps_source() {
        let query: Query = "items[0]".parse().unwrap();
        assert_eq!(query.as_str(), "items[0]");
        assert_eq!(query.to_string(), "items[0]");
    }

    #[test]
    fn search_index_on_array() {
        let data = json!([{"name": "a"}, {"name": "b"}]);
        assert_eq!(search("[0]", &data).unwrap(), json!({"name": "a"}));
    }

    #[test]
    fn search_reuses_compiled_query() {
        let query = Query::compile("name").unwrap();
        assert_eq!(query.search(&json!({"name": "x"})).unwrap(), json!("x"));
        assert_eq!(query.search(&json!({"name": "y"})).unwrap(), json!("y"));
    }
}
