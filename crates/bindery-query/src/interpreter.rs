//! Tree-walking evaluator for compiled expressions.

use serde_json::{Map, Value};

use crate::ast::Ast;
use crate::error::Result;
use crate::functions;
use crate::value::is_truthy;

/// Evaluates `node` against `data`.
pub(crate) fn interpret(node: &Ast, data: &Value) -> Result<Value> {
    match node {
        Ast::Identity => Ok(data.clone()),
        Ast::Field(name) => Ok(data
            .as_object()
            .and_then(|object| object.get(name))
            .cloned()
            .unwrap_or(Value::Null)),
        Ast::Index(index) => Ok(match data {
            Value::Array(items) => resolve_index(items.len(), *index)
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or(Value::Null),
            _ => Value::Null,
        }),
        Ast::Slice { start, stop, step } => Ok(match data {
            Value::Array(items) => Value::Array(slice(items, *start, *stop, *step)),
            _ => Value::Null,
        }),
        Ast::Literal(value) => Ok(value.clone()),
        Ast::Subexpr(lhs, rhs) => {
            let left = interpret(lhs, data)?;
            interpret(rhs, &left)
        }
        Ast::Projection(lhs, rhs) => match interpret(lhs, data)? {
            Value::Array(items) => project(items.iter(), rhs),
            _ => Ok(Value::Null),
        },
        Ast::ObjectProjection(lhs, rhs) => match interpret(lhs, data)? {
            Value::Object(object) => project(object.values(), rhs),
            _ => Ok(Value::Null),
        },
        Ast::Flatten(inner) => Ok(match interpret(inner, data)? {
            Value::Array(items) => {
                let mut flat = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Array(nested) => flat.extend(nested),
                        other => flat.push(other),
                    }
                }
                Value::Array(flat)
            }
            _ => Value::Null,
        }),
        Ast::Filter { lhs, cond, rhs } => match interpret(lhs, data)? {
            Value::Array(items) => {
                let mut kept = Vec::new();
                for item in &items {
                    if is_truthy(&interpret(cond, item)?) {
                        kept.push(item);
                    }
                }
                project(kept.into_iter(), rhs)
            }
            _ => Ok(Value::Null),
        },
        Ast::Comparison(op, lhs, rhs) => {
            let left = interpret(lhs, data)?;
            let right = interpret(rhs, data)?;
            Ok(op.apply(&left, &right))
        }
        Ast::And(lhs, rhs) => {
            let left = interpret(lhs, data)?;
            if is_truthy(&left) {
                interpret(rhs, data)
            } else {
                Ok(left)
            }
        }
        Ast::Or(lhs, rhs) => {
            let left = interpret(lhs, data)?;
            if is_truthy(&left) {
                Ok(left)
            } else {
                interpret(rhs, data)
            }
        }
        Ast::Not(inner) => Ok(Value::Bool(!is_truthy(&interpret(inner, data)?))),
        Ast::MultiList(items) => {
            if data.is_null() {
                return Ok(Value::Null);
            }
            items
                .iter()
                .map(|item| interpret(item, data))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
        Ast::MultiHash(entries) => {
            if data.is_null() {
                return Ok(Value::Null);
            }
            let mut object = Map::new();
            for (key, expr) in entries {
                object.insert(key.clone(), interpret(expr, data)?);
            }
            Ok(Value::Object(object))
        }
        Ast::Pipe(lhs, rhs) => {
            let left = interpret(lhs, data)?;
            interpret(rhs, &left)
        }
        Ast::Function(name, args) => {
            let values = args
                .iter()
                .map(|arg| interpret(arg, data))
                .collect::<Result<Vec<_>>>()?;
            functions::call(name, &values)
        }
    }
}

/// Applies `rhs` to every element, dropping `null` results.
fn project<'a>(items: impl Iterator<Item = &'a Value>, rhs: &Ast) -> Result<Value> {
    let mut out = Vec::new();
    for item in items {
        let value = interpret(rhs, item)?;
        if !value.is_null() {
            out.push(value);
        }
    }
    Ok(Value::Array(out))
}

fn resolve_index(len: usize, index: i64) -> Option<usize> {
    if index >= 0 {
        Some(index as usize)
    } else {
        let back = index.unsigned_abs() as usize;
        len.checked_sub(back)
    }
}

fn slice(items: &[Value], start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Vec<Value> {
    let len = items.len() as i64;
    let step = step.unwrap_or(1);
    let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
    let bound = |value: Option<i64>, default: i64| match value {
        None => default,
        Some(v) => {
            let v = if v < 0 { v + len } else { v };
            v.clamp(lower, upper)
        }
    };
    let (mut i, stop) = if step < 0 {
        (bound(start, upper), bound(stop, lower))
    } else {
        (bound(start, lower), bound(stop, upper))
    };

    let mut out = Vec::new();
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        if let Some(item) = items.get(i as usize) {
            out.push(item.clone());
        }
        i += step;
    }
    out
}
