//! The `fold` builtin.

use std::rc::Rc;

use crate::{
    error::{RunResult, SolError},
    eval::Evaluator,
    io::PrintWriter,
    tracer::EvalTracer,
    value::Value,
};

/// Left fold: `fold f arr init` computes `f (f (f init x1) x2) ...`.
///
/// With two arguments the array's first element seeds the accumulator.
/// Arguments are located by kind (exactly one callable, and the first array
/// among the rest is the subject), so `fold + 0 arr`, `fold + arr 0`, and
/// `arr |> fold + 0` all mean the same thing.
pub(super) fn builtin_fold<P: PrintWriter, T: EvalTracer>(
    args: Vec<Value>,
    line: usize,
    ev: &mut Evaluator<'_, P, T>,
) -> RunResult<Value> {
    let (callable, items, init) = split_fold_args(args, line)?;

    let mut iter = items.iter();
    let mut acc = match init {
        Some(seed) => seed,
        None => match iter.next() {
            Some(first) => first.clone(),
            None => {
                return Err(SolError::type_error("fold of an empty array needs an initial value", line).into());
            }
        },
    };
    for item in iter {
        acc = ev.apply(callable.clone(), vec![acc, item.clone()], line)?;
    }
    Ok(acc)
}

fn split_fold_args(args: Vec<Value>, line: usize) -> RunResult<(Value, Rc<Vec<Value>>, Option<Value>)> {
    let mut callable = None;
    let mut array = None;
    let mut init = None;
    for value in args {
        if callable.is_none() && value.is_callable() {
            callable = Some(value);
        } else if array.is_none() && matches!(value, Value::Array(_)) {
            let Value::Array(items) = value else { unreachable!() };
            array = Some(items);
        } else if init.is_none() {
            init = Some(value);
        } else {
            return Err(fold_args_error(line));
        }
    }
    match (callable, array) {
        (Some(callable), Some(array)) => Ok((callable, array, init)),
        _ => Err(fold_args_error(line)),
    }
}

fn fold_args_error(line: usize) -> crate::error::RunError {
    SolError::type_error("fold expects a function, an array, and an optional initial value", line).into()
}
