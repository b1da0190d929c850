//! The `sh` builtin: run a shell command, yielding a Result.

use std::process::Command;

use crate::{
    error::{RunResult, SolError},
    value::{SolResult, Value},
};

/// Runs the command through `sh -c`, blocking until it finishes.
///
/// Exit status 0 yields `ok(stdout)`; a non-zero status yields `err` with
/// the command's stderr (or a status message when stderr is empty); failing
/// to spawn at all also yields `err`. The evaluator imposes no timeout.
pub(super) fn builtin_sh(args: Vec<Value>, line: usize) -> RunResult<Value> {
    let command = match super::one_arg(args) {
        Value::Str(command) => command,
        other => {
            return Err(SolError::type_error(
                format!("sh expects a command string, got {}", other.type_name()),
                line,
            )
            .into());
        }
    };

    match Command::new("sh").arg("-c").arg(command.as_ref()).output() {
        Ok(output) if output.status.success() => Ok(SolResult::ok(Value::str(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))),
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                match output.status.code() {
                    Some(code) => format!("command exited with status {code}"),
                    None => "command was terminated by a signal".to_owned(),
                }
            } else {
                stderr.into_owned()
            };
            Ok(SolResult::err(Value::str(message)))
        }
        Err(error) => Ok(SolResult::err(Value::str(format!("failed to run command: {error}")))),
    }
}
