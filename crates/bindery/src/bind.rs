//! Argument binding.
//!
//! [`bind`] turns a [`Descriptor`] and the live options into a [`Frame`]:
//! one [`Slot`] per handler parameter. Set options are visited in
//! declaration order and fill the unreserved slots left to right. Every
//! problem is collected before failing, so a misconfigured command reports
//! all of its issues at once.

use tracing::{debug, trace};

use crate::action::Args;
use crate::context::CommandContext;
use crate::descriptor::Descriptor;
use crate::error::{BindingIssue, ShapeError};
use crate::option::OptionSet;
use crate::shape::{HandlerShape, ParamKind};
use crate::value::Value;

/// One parameter position of an invocation frame.
#[derive(Debug, Clone)]
pub enum Slot {
    /// Reserved for the context or positionals, filled at call time.
    Reserved(ParamKind),
    Value(Value),
    Context(CommandContext),
    Args(Args),
}

/// Values for one handler call, in parameter order.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    slots: Vec<Slot>,
}

impl Frame {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<Slot> {
        self.slots
    }

    /// Writes the live context and positional arguments into the slots
    /// the descriptor reserved for them.
    pub fn fill_call_slots(&mut self, desc: &Descriptor, ctx: &CommandContext, args: &[String]) {
        let last = self.slots.len().saturating_sub(1);
        if let Some(first) = self.slots.first_mut() {
            if desc.first_param_is_context {
                *first = Slot::Context(ctx.clone());
            } else if desc.first_param_is_positional {
                *first = Slot::Args(Args::from(args));
            }
        }
        if desc.last_param_is_positional && !(last == 0 && desc.first_param_is_positional) {
            if let Some(slot) = self.slots.get_mut(last) {
                *slot = Slot::Args(Args::from(args));
            }
        }
    }
}

/// Builds the frame for `shape` from the options that are currently set.
pub fn bind(
    desc: &Descriptor,
    shape: &HandlerShape,
    options: &dyn OptionSet,
) -> Result<Frame, ShapeError> {
    if desc.no_params {
        return Ok(Frame::default());
    }

    let params = &shape.params;
    let mut slots: Vec<Option<Slot>> = params.iter().map(|_| None).collect();
    if desc.first_param_is_context {
        slots[0] = Some(Slot::Reserved(ParamKind::Context));
    } else if desc.first_param_is_positional {
        slots[0] = Some(Slot::Reserved(ParamKind::Args));
    }
    if desc.last_param_is_positional {
        let last = slots.len() - 1;
        slots[last] = Some(Slot::Reserved(ParamKind::Args));
    }

    let mut issues = Vec::new();
    let mut next = 0;
    for spec in options.declared() {
        if !options.is_set(spec.name()) {
            continue;
        }
        while next < slots.len() && slots[next].is_some() {
            next += 1;
        }
        if next >= slots.len() {
            issues.push(BindingIssue::NoParameter {
                flag: spec.name().to_string(),
            });
            continue;
        }

        let expected = params[next];
        let slot = match expected {
            ParamKind::Value(kind) if kind == spec.kind() => {
                let value = options.value(spec.name());
                if value.is_invalid() {
                    issues.push(BindingIssue::Unreadable {
                        slot: next,
                        flag: spec.name().to_string(),
                        kind,
                    });
                }
                value
            }
            _ => {
                issues.push(BindingIssue::KindMismatch {
                    slot: next,
                    expected,
                    flag: spec.name().to_string(),
                    actual: spec.kind(),
                });
                Value::Invalid
            }
        };
        trace!(flag = spec.name(), slot = next, "bound flag");
        slots[next] = Some(Slot::Value(slot));
        next += 1;
    }

    for (index, slot) in slots.iter().enumerate() {
        if slot.is_none() {
            issues.push(BindingIssue::Unbound {
                slot: index,
                expected: params[index],
            });
        }
    }

    if !issues.is_empty() {
        debug!(count = issues.len(), "binding failed");
        return Err(ShapeError::Binding(issues));
    }

    Ok(Frame::new(slots.into_iter().flatten().collect()))
}
