//! Expression tree produced by the parser.

use serde_json::Value;

use crate::op::Op;

/// A compiled query expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// `@`, the current node.
    Identity,
    /// Field lookup on an object.
    Field(String),
    /// Array index, negative values count from the end.
    Index(i64),
    /// Array slice `[start:stop:step]`.
    Slice {
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    },
    /// Literal value from a backtick literal, raw string or bare number.
    Literal(Value),
    /// `lhs.rhs`: evaluate `rhs` against the result of `lhs`.
    Subexpr(Box<Ast>, Box<Ast>),
    /// List projection: `rhs` applied to every element of the `lhs` array.
    Projection(Box<Ast>, Box<Ast>),
    /// Object projection: `rhs` applied to every value of the `lhs` object.
    ObjectProjection(Box<Ast>, Box<Ast>),
    /// Flattens one level of nested arrays.
    Flatten(Box<Ast>),
    /// Filter projection: keep `lhs` elements where `cond` is truthy.
    Filter {
        lhs: Box<Ast>,
        cond: Box<Ast>,
        rhs: Box<Ast>,
    },
    Comparison(Op, Box<Ast>, Box<Ast>),
    And(Box<Ast>, Box<Ast>),
    Or(Box<Ast>, Box<Ast>),
    Not(Box<Ast>),
    /// `[a, b]`
    MultiList(Vec<Ast>),
    /// `{k: a, j: b}`
    MultiHash(Vec<(String, Ast)>),
    /// `lhs | rhs`, stops any projection on the left.
    Pipe(Box<Ast>, Box<Ast>),
    Function(String, Vec<Ast>),
}
