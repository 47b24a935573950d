//! Built-in functions.

use serde_json::Value;
use std::cmp::Ordering;

use crate::error::{QueryError, Result};
use crate::value::{compare_numbers, json_eq, number_from_f64, type_name};

enum Arity {
    Exact(usize),
    AtLeast(usize),
}

fn arity(name: &str) -> Option<Arity> {
    let arity = match name {
        "length" | "keys" | "values" | "to_string" | "to_number" | "type" | "sort"
        | "reverse" | "max" | "min" | "sum" | "avg" => Arity::Exact(1),
        "contains" | "starts_with" | "ends_with" | "join" => Arity::Exact(2),
        "not_null" => Arity::AtLeast(1),
        _ => return None,
    };
    Some(arity)
}

/// Validates a call against the known function table.
pub(crate) fn check_call(name: &str, actual: usize) -> Result<()> {
    let ok = match arity(name) {
        None => return Err(QueryError::UnknownFunction(name.to_string())),
        Some(Arity::Exact(n)) => n == actual,
        Some(Arity::AtLeast(n)) => actual >= n,
    };
    if ok {
        return Ok(());
    }
    let expected = match arity(name) {
        Some(Arity::Exact(n)) | Some(Arity::AtLeast(n)) => n,
        None => 0,
    };
    Err(QueryError::InvalidArity {
        name: name.to_string(),
        expected,
        actual,
    })
}

fn invalid(name: &str, expected: &'static str, actual: &Value) -> QueryError {
    QueryError::InvalidType {
        name: name.to_string(),
        expected,
        actual: type_name(actual),
    }
}

/// Calls a built-in function with already-evaluated arguments.
pub(crate) fn call(name: &str, args: &[Value]) -> Result<Value> {
    check_call(name, args.len())?;
    let first = &args[0];
    match name {
        "length" => match first {
            Value::String(s) => Ok(Value::from(s.chars().count())),
            Value::Array(a) => Ok(Value::from(a.len())),
            Value::Object(o) => Ok(Value::from(o.len())),
            other => Err(invalid(name, "string, array or object", other)),
        },
        "keys" => match first {
            Value::Object(o) => Ok(Value::Array(
                o.keys().map(|k| Value::String(k.clone())).collect(),
            )),
            other => Err(invalid(name, "object", other)),
        },
        "values" => match first {
            Value::Object(o) => Ok(Value::Array(o.values().cloned().collect())),
            other => Err(invalid(name, "object", other)),
        },
        "contains" => match (first, &args[1]) {
            (Value::Array(items), needle) => {
                Ok(Value::Bool(items.iter().any(|item| json_eq(item, needle))))
            }
            (Value::String(hay), Value::String(needle)) => {
                Ok(Value::Bool(hay.contains(needle.as_str())))
            }
            (Value::String(_), other) => Err(invalid(name, "string", other)),
            (other, _) => Err(invalid(name, "array or string", other)),
        },
        "starts_with" | "ends_with" => match (first, &args[1]) {
            (Value::String(s), Value::String(affix)) => Ok(Value::Bool(if name == "starts_with" {
                s.starts_with(affix.as_str())
            } else {
                s.ends_with(affix.as_str())
            })),
            (Value::String(_), other) | (other, _) => Err(invalid(name, "string", other)),
        },
        "to_string" => match first {
            Value::String(_) => Ok(first.clone()),
            other => Ok(Value::String(other.to_string())),
        },
        "to_number" => match first {
            Value::Number(_) => Ok(first.clone()),
            Value::String(s) => Ok(s
                .trim()
                .parse::<f64>()
                .map(number_from_f64)
                .unwrap_or(Value::Null)),
            _ => Ok(Value::Null),
        },
        "type" => Ok(Value::String(type_name(first).to_string())),
        "sort" => {
            let mut items = homogeneous(name, first)?;
            items.sort_by(compare_sortable);
            Ok(Value::Array(items))
        }
        "reverse" => match first {
            Value::Array(a) => Ok(Value::Array(a.iter().rev().cloned().collect())),
            Value::String(s) => Ok(Value::String(s.chars().rev().collect())),
            other => Err(invalid(name, "array or string", other)),
        },
        "max" | "min" => {
            let items = homogeneous(name, first)?;
            let picked = if name == "max" {
                items.into_iter().max_by(compare_sortable)
            } else {
                items.into_iter().min_by(compare_sortable)
            };
            Ok(picked.unwrap_or(Value::Null))
        }
        "sum" | "avg" => {
            let numbers = numbers(name, first)?;
            let total: f64 = numbers.iter().sum();
            if name == "sum" {
                Ok(number_from_f64(total))
            } else if numbers.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(number_from_f64(total / numbers.len() as f64))
            }
        }
        "join" => {
            let glue = match first {
                Value::String(s) => s,
                other => return Err(invalid(name, "string", other)),
            };
            let parts = match &args[1] {
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s.as_str()),
                        other => Err(invalid(name, "array of strings", other)),
                    })
                    .collect::<Result<Vec<_>>>()?,
                other => return Err(invalid(name, "array of strings", other)),
            };
            Ok(Value::String(parts.join(glue)))
        }
        "not_null" => Ok(args
            .iter()
            .find(|v| !v.is_null())
            .cloned()
            .unwrap_or(Value::Null)),
        _ => Err(QueryError::UnknownFunction(name.to_string())),
    }
}

/// Array whose elements are all numbers or all strings.
fn homogeneous(name: &str, value: &Value) -> Result<Vec<Value>> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(invalid(name, "array of numbers or strings", other)),
    };
    let all_numbers = items.iter().all(Value::is_number);
    let all_strings = items.iter().all(Value::is_string);
    if !(all_numbers || all_strings) {
        let offender = items
            .iter()
            .find(|v| !v.is_number() && !v.is_string())
            .or_else(|| items.first())
            .unwrap_or(value);
        return Err(invalid(name, "array of numbers or strings", offender));
    }
    Ok(items.clone())
}

fn numbers(name: &str, value: &Value) -> Result<Vec<f64>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_f64()
                    .ok_or_else(|| invalid(name, "array of numbers", item))
            })
            .collect(),
        other => Err(invalid(name, "array of numbers", other)),
    }
}

fn compare_sortable(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y).unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn length_of_each_type() {
        assert_eq!(call("length", &[json!("héllo")]).unwrap(), json!(5));
        assert_eq!(call("length", &[json!([1, 2])]).unwrap(), json!(2));
        assert_eq!(call("length", &[json!({"a": 1})]).unwrap(), json!(1));
        assert!(matches!(
            call("length", &[json!(3)]),
            Err(QueryError::InvalidType { actual: "number", .. })
        ));
    }

    #[test]
    fn contains_and_affixes() {
        assert_eq!(call("contains", &[json!([1, 2]), json!(2.0)]).unwrap(), json!(true));
        assert_eq!(call("contains", &[json!("abc"), json!("bc")]).unwrap(), json!(true));
        assert_eq!(call("starts_with", &[json!("abc"), json!("ab")]).unwrap(), json!(true));
        assert_eq!(call("ends_with", &[json!("abc"), json!("ab")]).unwrap(), json!(false));
    }

    #[test]
    fn aggregates() {
        assert_eq!(call("sum", &[json!([1, 2, 3])]).unwrap(), json!(6));
        assert_eq!(call("avg", &[json!([1, 2])]).unwrap(), json!(1.5));
        assert_eq!(call("avg", &[json!([])]).unwrap(), Value::Null);
        assert_eq!(call("max", &[json!([3, 9, 1])]).unwrap(), json!(9));
        assert_eq!(call("min", &[json!(["b", "a"])]).unwrap(), json!("a"));
        assert_eq!(call("max", &[json!([])]).unwrap(), Value::Null);
        assert!(call("max", &[json!([1, "a"])]).is_err());
    }

    #[test]
    fn sort_reverse_join() {
        assert_eq!(call("sort", &[json!([3, 1, 2])]).unwrap(), json!([1, 2, 3]));
        assert_eq!(call("reverse", &[json!("abc")]).unwrap(), json!("cba"));
        assert_eq!(
            call("join", &[json!(", "), json!(["a", "b"])]).unwrap(),
            json!("a, b")
        );
        assert!(call("join", &[json!(","), json!([1])]).is_err());
    }

    #[test]
    fn conversions() {
        assert_eq!(call("to_string", &[json!([1])]).unwrap(), json!("[1]"));
        assert_eq!(call("to_number", &[json!("42")]).unwrap(), json!(42));
        assert_eq!(call("to_number", &[json!("x")]).unwrap(), Value::Null);
        assert_eq!(call("type", &[json!(true)]).unwrap(), json!("boolean"));
        assert_eq!(
            call("not_null", &[Value::Null, json!("x")]).unwrap(),
            json!("x")
        );
    }

    #[test]
    fn check_call_reports_problems() {
        assert!(check_call("keys", 1).is_ok());
        assert!(check_call("not_null", 3).is_ok());
        assert_eq!(
            check_call("keys", 2),
            Err(QueryError::InvalidArity {
                name: "keys".into(),
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(
            check_call("nope", 0),
            Err(QueryError::UnknownFunction("nope".into()))
        );
    }
}
