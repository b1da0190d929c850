//! The builtin-function registry.
//!
//! Each builtin is a variant of [`Builtins`]; the name users write is the
//! strum serialization, so registry lookup is `Builtins::from_str`. A variant
//! reports its arity range through [`Builtins::arity`] and is invoked through
//! [`Builtins::call`], which receives the evaluator so higher-order builtins
//! can call closures back. The evaluator never inspects builtin internals.

mod arith;
mod collections;
mod compare;
mod convert;
mod echo;
mod filter;
mod fold;
mod map;
mod os;
mod result;
mod set_path;
mod sh;

use strum::{Display, EnumString, IntoStaticStr};

use crate::{
    error::{RunResult, SolError},
    eval::Evaluator,
    io::PrintWriter,
    tracer::EvalTracer,
    value::Value,
};

/// Enumerates every registered builtin.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and
/// `Into<&'static str>` implementations. Word-named builtins serialize to
/// snake case (`UnwrapOr` -> "unwrap_or"); operator symbols carry explicit
/// serializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Builtins {
    Echo,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
    Map,
    Filter,
    Fold,
    Set,
    Len,
    Keys,
    Values,
    ToString,
    ToNumber,
    Ok,
    Err,
    UnwrapOr,
    UnwrapOrExit,
    Succeeded,
    Failed,
    Sh,
    Getenv,
    Exit,
}

impl Builtins {
    /// The declared arity range `[lo, hi]`; `None` means unbounded.
    ///
    /// Application with fewer than `lo` arguments produces a Partial; more
    /// than `hi` is an arity error.
    #[must_use]
    pub fn arity(self) -> (usize, Option<usize>) {
        match self {
            Self::Echo => (1, None),
            Self::Add => (2, None),
            Self::Sub | Self::Mul | Self::Div | Self::Mod | Self::Eq | Self::Lt | Self::Gt => (2, Some(2)),
            Self::Map | Self::Filter => (2, Some(2)),
            Self::Fold => (2, Some(3)),
            Self::Set => (3, Some(3)),
            Self::Len
            | Self::Keys
            | Self::Values
            | Self::ToString
            | Self::ToNumber
            | Self::Ok
            | Self::Err
            | Self::Succeeded
            | Self::Failed
            | Self::Sh
            | Self::Getenv => (1, Some(1)),
            Self::UnwrapOr | Self::UnwrapOrExit => (2, Some(2)),
            Self::Exit => (0, Some(1)),
        }
    }

    /// Whether this builtin is an operator symbol, eligible for the
    /// operator-in-argument-position dispatch (`x == 1`).
    #[must_use]
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod | Self::Eq | Self::Lt | Self::Gt
        )
    }

    /// Invokes the builtin with already-evaluated arguments.
    ///
    /// The caller has checked the arity range against [`Builtins::arity`].
    /// `line` is the application's source line, used for error locations.
    pub(crate) fn call<P: PrintWriter, T: EvalTracer>(
        self,
        args: Vec<Value>,
        line: usize,
        ev: &mut Evaluator<'_, P, T>,
    ) -> RunResult<Value> {
        match self {
            Self::Echo => echo::builtin_echo(args, ev.print),
            Self::Add => arith::builtin_add(args, line),
            Self::Sub | Self::Mul | Self::Div | Self::Mod => arith::builtin_binary(self, args, line),
            Self::Eq | Self::Lt | Self::Gt => compare::builtin_compare(self, args, line),
            Self::Map => map::builtin_map(args, line, ev),
            Self::Filter => filter::builtin_filter(args, line, ev),
            Self::Fold => fold::builtin_fold(args, line, ev),
            Self::Set => set_path::builtin_set(args, line),
            Self::Len => collections::builtin_len(args, line),
            Self::Keys => collections::builtin_keys(args, line),
            Self::Values => collections::builtin_values(args, line),
            Self::ToString => convert::builtin_to_string(args),
            Self::ToNumber => convert::builtin_to_number(args),
            Self::Ok => result::builtin_ok(args),
            Self::Err => result::builtin_err(args),
            Self::UnwrapOr => result::builtin_unwrap_or(args, line),
            Self::UnwrapOrExit => result::builtin_unwrap_or_exit(args),
            Self::Succeeded => result::builtin_succeeded(args, line),
            Self::Failed => result::builtin_failed(args, line),
            Self::Sh => sh::builtin_sh(args, line),
            Self::Getenv => os::builtin_getenv(args, line),
            Self::Exit => os::builtin_exit(args, line),
        }
    }
}

/// Unpacks exactly one argument. The arity check has already run.
fn one_arg(args: Vec<Value>) -> Value {
    let mut args = args.into_iter();
    args.next().expect("arity check ensures one argument")
}

/// Unpacks exactly two arguments. The arity check has already run.
fn two_args(args: Vec<Value>) -> (Value, Value) {
    let mut args = args.into_iter();
    let first = args.next().expect("arity check ensures two arguments");
    let second = args.next().expect("arity check ensures two arguments");
    (first, second)
}

/// Unpacks exactly three arguments. The arity check has already run.
fn three_args(args: Vec<Value>) -> (Value, Value, Value) {
    let mut args = args.into_iter();
    let first = args.next().expect("arity check ensures three arguments");
    let second = args.next().expect("arity check ensures three arguments");
    let third = args.next().expect("arity check ensures three arguments");
    (first, second, third)
}

/// Splits a two-argument call into its callable and array, accepting either
/// order so `map f arr` and `arr |> map f` both work.
fn callable_and_array(
    name: &str,
    args: Vec<Value>,
    line: usize,
) -> RunResult<(Value, std::rc::Rc<Vec<Value>>)> {
    let (first, second) = two_args(args);
    match (first, second) {
        (callable, Value::Array(items)) if callable.is_callable() => Ok((callable, items)),
        (Value::Array(items), callable) if callable.is_callable() => Ok((callable, items)),
        (first, second) => Err(SolError::type_error(
            format!(
                "{name} expects a function and an array, got {} and {}",
                first.type_name(),
                second.type_name()
            ),
            line,
        )
        .into()),
    }
}
