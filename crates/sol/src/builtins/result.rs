//! Result constructors and consumers: `ok`, `err`, `unwrap_or`,
//! `unwrap_or_exit`, `succeeded`, `failed`.
//!
//! Results are inert values: piping an `err` through `|>` does not
//! short-circuit, so these builtins are the only way user code reacts to
//! failure.

use crate::{
    error::{RunError, RunResult, SolError},
    value::{SolResult, Value},
};

pub(super) fn builtin_ok(args: Vec<Value>) -> RunResult<Value> {
    Ok(SolResult::ok(super::one_arg(args)))
}

pub(super) fn builtin_err(args: Vec<Value>) -> RunResult<Value> {
    Ok(SolResult::err(super::one_arg(args)))
}

/// `unwrap_or r default` returns `r.value` when `r` succeeded, else `default`.
pub(super) fn builtin_unwrap_or(args: Vec<Value>, line: usize) -> RunResult<Value> {
    let (result, default) = super::two_args(args);
    let result = expect_result("unwrap_or", &result, line)?;
    if result.success {
        Ok(result.value.clone())
    } else {
        Ok(default)
    }
}

/// `unwrap_or_exit r msg` returns `r.value` when `r` succeeded; otherwise it
/// prints `msg` to stderr and halts the process with exit code 1. The message
/// is the second positional argument, so `r |> unwrap_or_exit "msg"` reads
/// naturally.
pub(super) fn builtin_unwrap_or_exit(args: Vec<Value>) -> RunResult<Value> {
    let (result, message) = super::two_args(args);
    match &result {
        Value::Result(r) if r.success => Ok(r.value.clone()),
        _ => {
            eprintln!("{}", message.render());
            Err(RunError::Exit(1))
        }
    }
}

pub(super) fn builtin_succeeded(args: Vec<Value>, line: usize) -> RunResult<Value> {
    let value = super::one_arg(args);
    Ok(Value::Bool(expect_result("succeeded", &value, line)?.success))
}

pub(super) fn builtin_failed(args: Vec<Value>, line: usize) -> RunResult<Value> {
    let value = super::one_arg(args);
    Ok(Value::Bool(!expect_result("failed", &value, line)?.success))
}

fn expect_result<'v>(name: &str, value: &'v Value, line: usize) -> RunResult<&'v SolResult> {
    match value {
        Value::Result(result) => Ok(result),
        other => Err(SolError::type_error(
            format!("{name} expects a result, got {}", other.type_name()),
            line,
        )
        .into()),
    }
}
