//! Container helpers: `len`, `keys`, `values`.

use std::rc::Rc;

use crate::{
    error::{RunResult, SolError},
    value::Value,
};

/// Length of a string (in characters), array, or dict.
pub(super) fn builtin_len(args: Vec<Value>, line: usize) -> RunResult<Value> {
    let value = super::one_arg(args);
    let len = match &value {
        Value::Str(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Dict(entries) => entries.len(),
        other => {
            return Err(SolError::type_error(format!("len expects a string, array, or dict, got {}", other.type_name()), line).into());
        }
    };
    Ok(Value::Int(len as i64))
}

/// A dict's keys as an array of strings, in insertion order.
pub(super) fn builtin_keys(args: Vec<Value>, line: usize) -> RunResult<Value> {
    match super::one_arg(args) {
        Value::Dict(entries) => Ok(Value::Array(Rc::new(entries.keys().map(Value::str).collect()))),
        other => Err(SolError::type_error(format!("keys expects a dict, got {}", other.type_name()), line).into()),
    }
}

/// A dict's values as an array, in insertion order.
pub(super) fn builtin_values(args: Vec<Value>, line: usize) -> RunResult<Value> {
    match super::one_arg(args) {
        Value::Dict(entries) => Ok(Value::Array(Rc::new(entries.values().cloned().collect()))),
        other => Err(SolError::type_error(format!("values expects a dict, got {}", other.type_name()), line).into()),
    }
}
