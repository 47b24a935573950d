//! Handler adapters.
//!
//! Any `Fn` whose parameters implement [`FromSlot`] and whose output
//! implements [`IntoReturns`] converts into an [`Action`]. The conversion
//! records the [`HandlerShape`] up front, so a command can be classified and
//! bound before the handler ever runs.
//!
//! ```rust
//! use bindery::{Action, Args, CommandContext};
//!
//! let greet = Action::new(|name: String, args: Args| format!("{} {}", name, args.join(" ")));
//! assert_eq!(greet.shape().params.len(), 2);
//!
//! let ping = Action::new(|_ctx: CommandContext| -> anyhow::Result<()> { Ok(()) });
//! assert_eq!(ping.shape().returns.len(), 1);
//! ```

use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::ops::Deref;
use std::sync::Arc;

use tracing::debug;

use crate::bind::{bind, Frame, Slot};
use crate::context::CommandContext;
use crate::descriptor::classify;
use crate::error::{ActionError, ShapeError};
use crate::invoke::invoke;
use crate::option::{FloatWidth, IntWidth, IpMask, IpNet, Kind, OptionSet, OptionType};
use crate::printable::{Json, Printable};
use crate::shape::{HandlerShape, ParamKind, ReturnKind};
use crate::table::TableRow;
use crate::value::Value;

/// Positional arguments left after option parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(Vec<String>);

impl Args {
    pub fn new(args: Vec<String>) -> Self {
        Self(args)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Args {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<&[String]> for Args {
    fn from(args: &[String]) -> Self {
        Self(args.to_vec())
    }
}

impl From<Vec<String>> for Args {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

/// A handler parameter type.
pub trait FromSlot: Sized {
    fn param_kind() -> ParamKind;

    /// Takes the value out of a frame slot, `None` if it holds something else.
    fn from_slot(slot: Slot) -> Option<Self>;
}

impl FromSlot for CommandContext {
    fn param_kind() -> ParamKind {
        ParamKind::Context
    }

    fn from_slot(slot: Slot) -> Option<Self> {
        match slot {
            Slot::Context(ctx) => Some(ctx),
            _ => None,
        }
    }
}

impl FromSlot for Args {
    fn param_kind() -> ParamKind {
        ParamKind::Args
    }

    fn from_slot(slot: Slot) -> Option<Self> {
        match slot {
            Slot::Args(args) => Some(args),
            _ => None,
        }
    }
}

macro_rules! option_types {
    ($($ty:ty => $kind:expr, $variant:ident;)*) => {
        $(
            impl OptionType for $ty {
                const KIND: Kind = $kind;
            }

            impl FromSlot for $ty {
                fn param_kind() -> ParamKind {
                    ParamKind::Value($kind)
                }

                fn from_slot(slot: Slot) -> Option<Self> {
                    match slot {
                        Slot::Value(Value::$variant(v)) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

option_types! {
    String => Kind::Text, Text;
    bool => Kind::Bool, Bool;
    i8 => Kind::Int(IntWidth::W8), I8;
    i16 => Kind::Int(IntWidth::W16), I16;
    i32 => Kind::Int(IntWidth::W32), I32;
    i64 => Kind::Int(IntWidth::W64), I64;
    u8 => Kind::Uint(IntWidth::W8), U8;
    u16 => Kind::Uint(IntWidth::W16), U16;
    u32 => Kind::Uint(IntWidth::W32), U32;
    u64 => Kind::Uint(IntWidth::W64), U64;
    f32 => Kind::Float(FloatWidth::W32), F32;
    f64 => Kind::Float(FloatWidth::W64), F64;
    Vec<String> => Kind::TextList, TextList;
    Vec<i64> => Kind::IntList, IntList;
    Vec<u64> => Kind::UintList, UintList;
    Vec<bool> => Kind::BoolList, BoolList;
    IpAddr => Kind::Ip, Ip;
    IpMask => Kind::IpMask, IpMask;
    IpNet => Kind::IpNet, IpNet;
}

/// One produced handler output.
pub enum Returned {
    Error(Option<anyhow::Error>),
    Text(Option<String>),
    Object(Option<Box<dyn Printable>>),
}

impl Returned {
    /// The nil output of `kind`.
    pub fn nil(kind: ReturnKind) -> Self {
        match kind {
            ReturnKind::Error => Returned::Error(None),
            ReturnKind::Text => Returned::Text(None),
            ReturnKind::Object => Returned::Object(None),
        }
    }

    pub fn object<P: Printable + 'static>(value: P) -> Self {
        Returned::Object(Some(Box::new(value)))
    }

    pub fn kind(&self) -> ReturnKind {
        match self {
            Returned::Error(_) => ReturnKind::Error,
            Returned::Text(_) => ReturnKind::Text,
            Returned::Object(_) => ReturnKind::Object,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(
            self,
            Returned::Error(None) | Returned::Text(None) | Returned::Object(None)
        )
    }
}

impl fmt::Debug for Returned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Returned::Error(err) => f.debug_tuple("Error").field(err).finish(),
            Returned::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Returned::Object(obj) => f
                .debug_tuple("Object")
                .field(&obj.as_ref().map(|_| ".."))
                .finish(),
        }
    }
}

/// A single handler output value.
///
/// `KIND` is `None` for `()`, which produces no output slot at all.
pub trait ReturnValue {
    const KIND: Option<ReturnKind>;

    fn into_returned(self) -> Option<Returned>;
}

impl ReturnValue for () {
    const KIND: Option<ReturnKind> = None;

    fn into_returned(self) -> Option<Returned> {
        None
    }
}

impl ReturnValue for String {
    const KIND: Option<ReturnKind> = Some(ReturnKind::Text);

    fn into_returned(self) -> Option<Returned> {
        Some(Returned::Text(Some(self)))
    }
}

impl<T: ReturnValue> ReturnValue for Option<T> {
    const KIND: Option<ReturnKind> = T::KIND;

    fn into_returned(self) -> Option<Returned> {
        match self {
            Some(value) => value.into_returned(),
            None => T::KIND.map(Returned::nil),
        }
    }
}

impl<T: TableRow> ReturnValue for Vec<T> {
    const KIND: Option<ReturnKind> = Some(ReturnKind::Object);

    fn into_returned(self) -> Option<Returned> {
        Some(Returned::object(self))
    }
}

impl ReturnValue for serde_json::Value {
    const KIND: Option<ReturnKind> = Some(ReturnKind::Object);

    fn into_returned(self) -> Option<Returned> {
        Some(Returned::object(self))
    }
}

impl<T: Serialize + 'static> ReturnValue for Json<T> {
    const KIND: Option<ReturnKind> = Some(ReturnKind::Object);

    fn into_returned(self) -> Option<Returned> {
        Some(Returned::object(self))
    }
}

/// Everything a handler returns, as ordered output slots.
pub trait IntoReturns {
    fn return_kinds() -> Vec<ReturnKind>;

    fn into_returns(self) -> Vec<Returned>;
}

#[doc(hidden)]
pub fn value_kinds<T: ReturnValue>() -> Vec<ReturnKind> {
    T::KIND.into_iter().collect()
}

#[doc(hidden)]
pub fn value_returns<T: ReturnValue>(value: T) -> Vec<Returned> {
    value.into_returned().into_iter().collect()
}

macro_rules! single_returns {
    ($(impl $([$($gen:tt)*])? for $ty:ty;)*) => {
        $(
            impl $(<$($gen)*>)? IntoReturns for $ty {
                fn return_kinds() -> Vec<ReturnKind> {
                    value_kinds::<Self>()
                }

                fn into_returns(self) -> Vec<Returned> {
                    value_returns(self)
                }
            }
        )*
    };
}

single_returns! {
    impl for ();
    impl for String;
    impl for serde_json::Value;
    impl [T: ReturnValue] for Option<T>;
    impl [T: TableRow] for Vec<T>;
    impl [T: Serialize + 'static] for Json<T>;
}

impl<T, E> IntoReturns for Result<T, E>
where
    T: ReturnValue,
    E: Into<anyhow::Error>,
{
    fn return_kinds() -> Vec<ReturnKind> {
        let mut kinds = value_kinds::<T>();
        kinds.push(ReturnKind::Error);
        kinds
    }

    fn into_returns(self) -> Vec<Returned> {
        let (first, error) = match self {
            Ok(value) => (value.into_returned(), None),
            Err(err) => (T::KIND.map(Returned::nil), Some(err.into())),
        };
        first
            .into_iter()
            .chain(std::iter::once(Returned::Error(error)))
            .collect()
    }
}

type Invoker = dyn Fn(Vec<Slot>) -> Result<Vec<Returned>, ShapeError> + Send + Sync;

/// A type-erased handler together with its shape.
#[derive(Clone)]
pub struct Action {
    shape: HandlerShape,
    handler: Arc<Invoker>,
}

impl Action {
    /// Wraps any supported handler function.
    pub fn new<M>(handler: impl IntoAction<M>) -> Self {
        handler.into_action()
    }

    /// Builds an action from an explicit shape and a raw slot invoker.
    pub fn from_shape<F>(shape: HandlerShape, handler: F) -> Self
    where
        F: Fn(Vec<Slot>) -> Result<Vec<Returned>, ShapeError> + Send + Sync + 'static,
    {
        Self {
            shape,
            handler: Arc::new(handler),
        }
    }

    pub fn shape(&self) -> &HandlerShape {
        &self.shape
    }

    /// Calls the handler with a filled frame.
    pub fn call(&self, frame: Frame) -> Result<Vec<Returned>, ShapeError> {
        (self.handler)(frame.into_slots())
    }

    /// Classifies, binds, and invokes the handler against live options.
    pub fn run(
        &self,
        ctx: &CommandContext,
        options: &dyn OptionSet,
        args: &[String],
    ) -> Result<(), ActionError> {
        let desc = classify(&self.shape, options.set_count())?;
        let mut frame = bind(&desc, &self.shape, options)?;
        frame.fill_call_slots(&desc, ctx, args);
        debug!(command = ctx.command_name(), slots = frame.len(), "invoking handler");
        invoke(self, frame, &desc, ctx)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Conversion into an [`Action`]. `M` only disambiguates the blanket impls.
pub trait IntoAction<M> {
    fn into_action(self) -> Action;
}

impl IntoAction<Action> for Action {
    fn into_action(self) -> Action {
        self
    }
}

fn take<T: FromSlot>(
    slots: &mut std::vec::IntoIter<Slot>,
    index: &mut usize,
) -> Result<T, ShapeError> {
    let slot = *index;
    *index += 1;
    slots
        .next()
        .and_then(T::from_slot)
        .ok_or(ShapeError::SlotType {
            slot,
            expected: T::param_kind(),
        })
}

macro_rules! into_action {
    ($($param:ident),*) => {
        impl<F, R, $($param,)*> IntoAction<fn($($param,)*) -> R> for F
        where
            F: Fn($($param),*) -> R + Send + Sync + 'static,
            R: IntoReturns,
            $($param: FromSlot,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_action(self) -> Action {
                let shape = HandlerShape::new(
                    vec![$($param::param_kind()),*],
                    R::return_kinds(),
                );
                let handler = self;
                Action::from_shape(shape, move |slots: Vec<Slot>| {
                    let mut slots = slots.into_iter();
                    let mut index = 0;
                    $(let $param = take::<$param>(&mut slots, &mut index)?;)*
                    Ok(handler($($param),*).into_returns())
                })
            }
        }
    };
}

into_action!();
into_action!(A1);
into_action!(A1, A2);
into_action!(A1, A2, A3);
into_action!(A1, A2, A3, A4);
into_action!(A1, A2, A3, A4, A5);
into_action!(A1, A2, A3, A4, A5, A6);
into_action!(A1, A2, A3, A4, A5, A6, A7);
into_action!(A1, A2, A3, A4, A5, A6, A7, A8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_is_recorded_from_signature() {
        let action = Action::new(|_ctx: CommandContext, _n: u16, _args: Args| {});
        assert_eq!(
            action.shape(),
            &HandlerShape::new(
                vec![
                    ParamKind::Context,
                    ParamKind::Value(Kind::Uint(IntWidth::W16)),
                    ParamKind::Args
                ],
                vec![]
            )
        );
    }

    #[test]
    fn result_outputs_keep_positions() {
        let kinds = <Result<String, anyhow::Error>>::return_kinds();
        assert_eq!(kinds, vec![ReturnKind::Text, ReturnKind::Error]);

        let kinds = <Result<(), std::io::Error>>::return_kinds();
        assert_eq!(kinds, vec![ReturnKind::Error]);

        let failed: Result<String, anyhow::Error> = Err(anyhow::anyhow!("boom"));
        let returns = failed.into_returns();
        assert_eq!(returns.len(), 2);
        assert!(matches!(returns[0], Returned::Text(None)));
        assert!(matches!(&returns[1], Returned::Error(Some(e)) if e.to_string() == "boom"));
    }

    #[test]
    fn option_output_is_nil_not_error() {
        let returns = None::<String>.into_returns();
        assert_eq!(returns.len(), 1);
        assert!(returns[0].is_nil());
        assert_eq!(returns[0].kind(), ReturnKind::Text);
    }

    #[test]
    fn call_converts_slots() {
        let action = Action::new(|name: String, count: i32| format!("{}{}", name, count));
        let frame = Frame::new(vec![
            Slot::Value(Value::Text("x".into())),
            Slot::Value(Value::I32(2)),
        ]);
        let returns = action.call(frame).unwrap();
        assert!(matches!(&returns[0], Returned::Text(Some(s)) if s == "x2"));
    }

    #[test]
    fn call_rejects_wrong_slot() {
        let action = Action::new(|_count: i32| {});
        let frame = Frame::new(vec![Slot::Value(Value::Text("x".into()))]);
        assert_eq!(
            action.call(frame).unwrap_err(),
            ShapeError::SlotType {
                slot: 0,
                expected: ParamKind::Value(Kind::Int(IntWidth::W32))
            }
        );
    }

    #[test]
    fn args_deref_to_slice() {
        let args = Args::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.join(","), "a,b");
    }
}
