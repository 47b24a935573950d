//! Error types.
//!
//! - [`ShapeError`]: a handler's signature cannot be reconciled with the
//!   declared options (classification or binding).
//! - [`RenderError`]: serialization, query or I/O failure while printing.
//! - [`ActionError`]: anything that ends a command execution, including the
//!   handler's own error, kept intact for downcasting.

use std::fmt;
use thiserror::Error;

use crate::option::Kind;
use crate::shape::{ParamKind, ReturnKind};

/// One problem found while binding options to handler parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingIssue {
    /// The option's kind does not match the parameter at `slot`.
    KindMismatch {
        slot: usize,
        expected: ParamKind,
        flag: String,
        actual: Kind,
    },
    /// The option is set but its value could not be read as its kind.
    Unreadable { slot: usize, flag: String, kind: Kind },
    /// The option is set but every parameter is already taken.
    NoParameter { flag: String },
    /// No set option was left for the parameter at `slot`.
    Unbound { slot: usize, expected: ParamKind },
}

impl fmt::Display for BindingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingIssue::KindMismatch {
                slot,
                expected,
                flag,
                actual,
            } => write!(
                f,
                "parameter {} expects {} but flag \"{}\" is {}",
                slot, expected, flag, actual
            ),
            BindingIssue::Unreadable { slot, flag, kind } => write!(
                f,
                "parameter {}: flag \"{}\" has no readable {} value",
                slot, flag, kind
            ),
            BindingIssue::NoParameter { flag } => {
                write!(f, "flag \"{}\" is set but no parameter is left for it", flag)
            }
            BindingIssue::Unbound { slot, expected } => {
                write!(f, "parameter {} ({}) has no flag to bind", slot, expected)
            }
        }
    }
}

fn join_issues(issues: &[BindingIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A handler shape that cannot be bound to its options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// Parameter count differs from the number of set options and no
    /// context or positional parameter explains the difference.
    #[error("handler expects {actual} parameter(s) but {expected} flag(s) are set")]
    ParamCount { expected: usize, actual: usize },

    #[error("handler has too many outputs: {0}, at most 2 are supported")]
    TooManyReturns(usize),

    #[error("second handler output must be an error, found {0}")]
    SecondReturnNotError(ReturnKind),

    /// Every binding problem, collected in one pass.
    #[error("cannot bind flags: {}", join_issues(.0))]
    Binding(Vec<BindingIssue>),

    /// A frame slot held something other than what the parameter needs.
    #[error("frame slot {slot} does not hold a {expected} value")]
    SlotType { slot: usize, expected: ParamKind },
}

impl ShapeError {
    /// Binding issues, if this is a [`ShapeError::Binding`].
    pub fn issues(&self) -> &[BindingIssue] {
        match self {
            ShapeError::Binding(issues) => issues,
            _ => &[],
        }
    }
}

/// Errors raised while printing a result.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("query failed: {0}")]
    Query(#[from] bindery_query::QueryError),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A usage problem detected before the handler runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct UsageError(pub String);

/// A handler error tagged with a numeric code.
///
/// An [`App`](crate::App) with a friendly message registered for the code
/// reports that message instead of this error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CodedError {
    code: i32,
    message: String,
}

impl CodedError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

/// Everything that can end a command execution.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// The handler's own error, unchanged.
    #[error(transparent)]
    Handler(anyhow::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Parse(#[from] clap::Error),
}

impl ActionError {
    /// The handler's error, if the handler is what failed.
    pub fn handler_error(&self) -> Option<&anyhow::Error> {
        match self {
            ActionError::Handler(err) => Some(err),
            _ => None,
        }
    }

    /// Consumes self and returns the handler's error, if any.
    pub fn into_handler_error(self) -> Option<anyhow::Error> {
        match self {
            ActionError::Handler(err) => Some(err),
            _ => None,
        }
    }
}
