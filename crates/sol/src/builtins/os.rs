//! Process and environment builtins: `getenv` and `exit`.

use crate::{
    error::{RunError, RunResult, SolError},
    value::{SolResult, Value},
};

/// Reads an environment variable, yielding `ok(value)` or an `err` Result
/// when the variable is unset or not valid unicode.
pub(super) fn builtin_getenv(args: Vec<Value>, line: usize) -> RunResult<Value> {
    let name = match super::one_arg(args) {
        Value::Str(name) => name,
        other => {
            return Err(SolError::type_error(
                format!("getenv expects a variable name string, got {}", other.type_name()),
                line,
            )
            .into());
        }
    };
    match std::env::var(name.as_ref()) {
        Ok(value) => Ok(SolResult::ok(Value::str(value))),
        Err(_) => Ok(SolResult::err(Value::str(format!("{name} is not set")))),
    }
}

/// Halts the process with the given exit code (default 0).
///
/// The halt propagates as [`RunError::Exit`]; the driver flushes stdout and
/// terminates, which keeps the library itself free of `process::exit`.
pub(super) fn builtin_exit(args: Vec<Value>, line: usize) -> RunResult<Value> {
    let code = match args.into_iter().next() {
        None => 0,
        Some(Value::Int(code)) => i32::try_from(code).unwrap_or(1),
        Some(other) => {
            return Err(SolError::type_error(
                format!("exit expects an integer code, got {}", other.type_name()),
                line,
            )
            .into());
        }
    };
    Err(RunError::Exit(code))
}
