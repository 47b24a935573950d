//! Handler shapes: what a handler takes and what it returns.

use std::fmt;

use crate::option::Kind;

/// The kind of one handler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// The [`CommandContext`](crate::CommandContext).
    Context,
    /// Positional arguments ([`Args`](crate::Args)).
    Args,
    /// A value bound from an option of this kind.
    Value(Kind),
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Context => f.write_str("context"),
            ParamKind::Args => f.write_str("positional arguments"),
            ParamKind::Value(kind) => kind.fmt(f),
        }
    }
}

/// The kind of one handler output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    Error,
    Text,
    /// Anything printed through the output dispatcher.
    Object,
}

impl fmt::Display for ReturnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReturnKind::Error => "error",
            ReturnKind::Text => "text",
            ReturnKind::Object => "object",
        })
    }
}

/// Parameter and output kinds of a handler, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerShape {
    pub params: Vec<ParamKind>,
    pub returns: Vec<ReturnKind>,
}

impl HandlerShape {
    pub fn new(params: Vec<ParamKind>, returns: Vec<ReturnKind>) -> Self {
        Self { params, returns }
    }
}
