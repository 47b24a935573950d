//! Comparison operators for filter expressions.
//!
//! The [`Op`] enum defines the comparators usable inside `[? ... ]` filters
//! and anywhere else an expression is expected.

use serde_json::Value;
use std::cmp::Ordering;

use crate::value::{compare_numbers, json_eq};

/// Comparison operator.
///
/// - **Universal**: `Eq`, `Ne` - work on all JSON types
/// - **Ordering**: `Gt`, `Gte`, `Lt`, `Lte` - numbers only, anything else
///   compares to `null`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

impl Op {
    /// Returns `true` if this operator needs an ordering between its operands.
    pub fn is_ordering(self) -> bool {
        matches!(self, Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }

    /// Evaluates a comparison given an ordering result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
        }
    }

    /// Applies the comparator to two JSON values.
    ///
    /// Equality works across all types. Ordering comparisons between
    /// non-numbers yield `null`, which filters treat as false.
    pub fn apply(self, left: &Value, right: &Value) -> Value {
        match self {
            Op::Eq => Value::Bool(json_eq(left, right)),
            Op::Ne => Value::Bool(!json_eq(left, right)),
            _ => match (left, right) {
                (Value::Number(a), Value::Number(b)) => compare_numbers(a, b)
                    .map(|ordering| Value::Bool(self.eval_ordering(ordering)))
                    .unwrap_or(Value::Null),
                _ => Value::Null,
            },
        }
    }

    /// Returns the source form of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn op_eval_ordering() {
        assert!(Op::Eq.eval_ordering(Ordering::Equal));
        assert!(!Op::Eq.eval_ordering(Ordering::Less));

        assert!(Op::Ne.eval_ordering(Ordering::Less));
        assert!(!Op::Ne.eval_ordering(Ordering::Equal));

        assert!(Op::Gt.eval_ordering(Ordering::Greater));
        assert!(!Op::Gt.eval_ordering(Ordering::Equal));

        assert!(Op::Gte.eval_ordering(Ordering::Equal));
        assert!(Op::Gte.eval_ordering(Ordering::Greater));
        assert!(!Op::Gte.eval_ordering(Ordering::Less));

        assert!(Op::Lt.eval_ordering(Ordering::Less));
        assert!(Op::Lte.eval_ordering(Ordering::Equal));
        assert!(!Op::Lte.eval_ordering(Ordering::Greater));
    }

    #[test]
    fn op_apply_equality_across_types() {
        assert_eq!(Op::Eq.apply(&json!("a"), &json!("a")), json!(true));
        assert_eq!(Op::Eq.apply(&json!(1), &json!(1.0)), json!(true));
        assert_eq!(Op::Ne.apply(&json!([1]), &json!([2])), json!(true));
        assert_eq!(Op::Eq.apply(&json!(null), &json!(null)), json!(true));
    }

    #[test]
    fn op_apply_ordering_requires_numbers() {
        assert_eq!(Op::Gt.apply(&json!(3), &json!(2)), json!(true));
        assert_eq!(Op::Lte.apply(&json!(-1), &json!(2.5)), json!(true));
        assert_eq!(Op::Lt.apply(&json!("a"), &json!("b")), Value::Null);
    }

    #[test]
    fn op_display() {
        assert_eq!(Op::Gte.to_string(), ">=");
        assert!(Op::Lt.is_ordering());
        assert!(!Op::Ne.is_ordering());
    }
}
