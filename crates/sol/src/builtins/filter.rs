//! The `filter` builtin.

use std::rc::Rc;

use crate::{error::RunResult, eval::Evaluator, io::PrintWriter, tracer::EvalTracer, value::Value};

/// Keeps the elements for which the predicate returns a truthy value,
/// preserving order.
///
/// As with `map`, the callable and the array may come in either argument
/// order.
pub(super) fn builtin_filter<P: PrintWriter, T: EvalTracer>(
    args: Vec<Value>,
    line: usize,
    ev: &mut Evaluator<'_, P, T>,
) -> RunResult<Value> {
    let (predicate, items) = super::callable_and_array("filter", args, line)?;
    let mut out = Vec::new();
    for item in items.iter() {
        if ev.apply(predicate.clone(), vec![item.clone()], line)?.is_truthy() {
            out.push(item.clone());
        }
    }
    Ok(Value::Array(Rc::new(out)))
}
