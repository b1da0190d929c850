//! Conversions: `to_string` and `to_number`.

use crate::{
    error::RunResult,
    value::{SolResult, Value},
};

/// Renders any value to its display string.
pub(super) fn builtin_to_string(args: Vec<Value>) -> RunResult<Value> {
    Ok(Value::str(super::one_arg(args).render()))
}

/// Converts a value to a number: numbers pass through, strings are parsed
/// (integer first, then float). Anything unconvertible yields an `err`
/// Result rather than an evaluator error, so scripts can test with `failed`.
pub(super) fn builtin_to_number(args: Vec<Value>) -> RunResult<Value> {
    let value = super::one_arg(args);
    match &value {
        Value::Int(_) | Value::Float(_) => Ok(value),
        Value::Str(text) => {
            let trimmed = text.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                Ok(Value::Int(int))
            } else if let Ok(float) = trimmed.parse::<f64>() {
                Ok(Value::Float(float))
            } else {
                Ok(SolResult::err(Value::str(format!("'{trimmed}' is not a number"))))
            }
        }
        other => Ok(SolResult::err(Value::str(format!(
            "cannot convert {} to a number",
            other.type_name()
        )))),
    }
}
