//! Handler classification.
//!
//! [`classify`] looks at a [`HandlerShape`] and the number of options the
//! user actually set, and decides which parameter slots are reserved for
//! the context and positional arguments and how the outputs are read.
//! The result is a plain [`Descriptor`] so it can be tested without
//! running anything.
//!
//! Type wins over position: a first parameter of the context type is the
//! context slot even when the parameter count happens to equal the number
//! of set options.

use tracing::trace;

use crate::error::ShapeError;
use crate::shape::{HandlerShape, ParamKind, ReturnKind};

/// How the first handler output is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FirstReturn {
    #[default]
    None,
    Error,
    Text,
    Object,
}

/// Classification of one handler shape against one option count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Descriptor {
    pub first_param_is_context: bool,
    pub first_param_is_positional: bool,
    pub last_param_is_positional: bool,
    pub no_params: bool,
    pub first_return: FirstReturn,
    pub second_return_is_error: bool,
    pub no_returns: bool,
}

impl Descriptor {
    /// Returns true if any slot is reserved for context or positionals.
    pub fn has_reserved_slots(&self) -> bool {
        self.first_param_is_context || self.first_param_is_positional || self.last_param_is_positional
    }
}

/// Classifies `shape` given how many options are currently set.
pub fn classify(shape: &HandlerShape, set_count: usize) -> Result<Descriptor, ShapeError> {
    let mut desc = Descriptor::default();

    match shape.params.as_slice() {
        [] => desc.no_params = true,
        params => {
            match params[0] {
                ParamKind::Context => desc.first_param_is_context = true,
                ParamKind::Args => desc.first_param_is_positional = true,
                ParamKind::Value(_) => {}
            }
            if params[params.len() - 1] == ParamKind::Args {
                desc.last_param_is_positional = true;
            }

            if !desc.has_reserved_slots() && params.len() != set_count {
                return Err(ShapeError::ParamCount {
                    expected: set_count,
                    actual: params.len(),
                });
            }
        }
    }

    match shape.returns.as_slice() {
        [] => desc.no_returns = true,
        returns if returns.len() > 2 => return Err(ShapeError::TooManyReturns(returns.len())),
        returns => {
            desc.first_return = match returns[0] {
                ReturnKind::Error => FirstReturn::Error,
                ReturnKind::Text => FirstReturn::Text,
                ReturnKind::Object => FirstReturn::Object,
            };
            if let Some(&second) = returns.get(1) {
                if second != ReturnKind::Error {
                    return Err(ShapeError::SecondReturnNotError(second));
                }
                desc.second_return_is_error = true;
            }
        }
    }

    trace!(?shape, set_count, ?desc, "classified handler");
    Ok(desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{IntWidth, Kind};

    const TEXT: ParamKind = ParamKind::Value(Kind::Text);
    const INT: ParamKind = ParamKind::Value(Kind::Int(IntWidth::W32));

    fn shape(params: &[ParamKind], returns: &[ReturnKind]) -> HandlerShape {
        HandlerShape::new(params.to_vec(), returns.to_vec())
    }

    #[test]
    fn equal_counts_bind_one_to_one() {
        let desc = classify(&shape(&[TEXT, INT], &[]), 2).unwrap();
        assert!(!desc.has_reserved_slots());
        assert!(!desc.no_params);
        assert!(desc.no_returns);
    }

    #[test]
    fn zero_params_ignores_option_count() {
        let desc = classify(&shape(&[], &[ReturnKind::Error]), 3).unwrap();
        assert!(desc.no_params);
        assert_eq!(desc.first_return, FirstReturn::Error);
    }

    #[test]
    fn context_type_wins_over_count() {
        let desc = classify(&shape(&[ParamKind::Context, TEXT], &[]), 2).unwrap();
        assert!(desc.first_param_is_context);
        assert!(!desc.first_param_is_positional);
    }

    #[test]
    fn positional_first_and_last() {
        let desc = classify(&shape(&[ParamKind::Args, TEXT], &[]), 1).unwrap();
        assert!(desc.first_param_is_positional);
        assert!(!desc.last_param_is_positional);

        let desc = classify(&shape(&[ParamKind::Context, TEXT, ParamKind::Args], &[]), 1).unwrap();
        assert!(desc.first_param_is_context);
        assert!(desc.last_param_is_positional);
    }

    #[test]
    fn single_positional_sets_both_flags() {
        let desc = classify(&shape(&[ParamKind::Args], &[]), 0).unwrap();
        assert!(desc.first_param_is_positional);
        assert!(desc.last_param_is_positional);
    }

    #[test]
    fn count_mismatch_without_reserved_slot() {
        assert_eq!(
            classify(&shape(&[TEXT, INT], &[]), 1),
            Err(ShapeError::ParamCount {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn return_shapes() {
        let desc = classify(&shape(&[], &[ReturnKind::Object, ReturnKind::Error]), 0).unwrap();
        assert_eq!(desc.first_return, FirstReturn::Object);
        assert!(desc.second_return_is_error);

        let desc = classify(&shape(&[], &[ReturnKind::Text]), 0).unwrap();
        assert_eq!(desc.first_return, FirstReturn::Text);
        assert!(!desc.second_return_is_error);
    }

    #[test]
    fn too_many_returns() {
        let returns = [ReturnKind::Text, ReturnKind::Error, ReturnKind::Error];
        assert_eq!(
            classify(&shape(&[], &returns), 0),
            Err(ShapeError::TooManyReturns(3))
        );
    }

    #[test]
    fn second_return_must_be_error() {
        let returns = [ReturnKind::Object, ReturnKind::Text];
        assert_eq!(
            classify(&shape(&[], &returns), 0),
            Err(ShapeError::SecondReturnNotError(ReturnKind::Text))
        );
    }
}
