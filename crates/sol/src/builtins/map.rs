//! The `map` builtin.

use std::rc::Rc;

use crate::{error::RunResult, eval::Evaluator, io::PrintWriter, tracer::EvalTracer, value::Value};

/// Applies a callable to each element of an array, returning a new array of
/// the same length with elements in the original order.
///
/// The callable and the array may come in either argument order, which keeps
/// `map f arr` and `arr |> map f` equivalent.
pub(super) fn builtin_map<P: PrintWriter, T: EvalTracer>(
    args: Vec<Value>,
    line: usize,
    ev: &mut Evaluator<'_, P, T>,
) -> RunResult<Value> {
    let (callable, items) = super::callable_and_array("map", args, line)?;
    let mut out = Vec::with_capacity(items.len());
    for item in items.iter() {
        out.push(ev.apply(callable.clone(), vec![item.clone()], line)?);
    }
    Ok(Value::Array(Rc::new(out)))
}
