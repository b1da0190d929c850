//! The `set` builtin: persistent update through a `|`-separated path.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    error::{RunResult, SolError},
    value::Value,
};

/// `set container path value` returns a new container with the leaf at
/// `path` replaced. Missing dict keys along the path are created as nested
/// dicts; array positions must already exist (1-based, `IndexError`
/// otherwise). The original container is untouched.
pub(super) fn builtin_set(args: Vec<Value>, line: usize) -> RunResult<Value> {
    let (container, path, value) = super::three_args(args);
    let Value::Str(path) = path else {
        return Err(SolError::type_error(
            format!("set expects a '|'-separated path string, got {}", path.type_name()),
            line,
        )
        .into());
    };
    if path.is_empty() {
        return Err(SolError::type_error("set path must not be empty", line).into());
    }
    let segments: Vec<&str> = path.split('|').collect();
    set_in(&container, &segments, value, line)
}

fn set_in(container: &Value, segments: &[&str], value: Value, line: usize) -> RunResult<Value> {
    let (head, rest) = segments.split_first().expect("caller ensures a non-empty path");
    match container {
        Value::Dict(entries) => {
            let child = if rest.is_empty() {
                value
            } else {
                // missing intermediate keys materialize as empty dicts
                let existing = entries
                    .get(*head)
                    .cloned()
                    .unwrap_or_else(|| Value::Dict(Rc::new(IndexMap::new())));
                set_in(&existing, rest, value, line)?
            };
            let mut updated = (**entries).clone();
            updated.insert((*head).to_owned(), child);
            Ok(Value::Dict(Rc::new(updated)))
        }
        Value::Array(items) => {
            let index: i64 = head.parse().map_err(|_| {
                SolError::index_error(format!("array index must be a positive integer, got '{head}'"), line)
            })?;
            if index < 1 || index as usize > items.len() {
                return Err(SolError::index_error(
                    format!("array index {index} out of range (length {})", items.len()),
                    line,
                )
                .into());
            }
            let slot = index as usize - 1;
            let child = if rest.is_empty() {
                value
            } else {
                set_in(&items[slot], rest, value, line)?
            };
            let mut updated = (**items).clone();
            updated[slot] = child;
            Ok(Value::Array(Rc::new(updated)))
        }
        other => Err(SolError::type_error(
            format!("cannot set a path on {}", other.type_name()),
            line,
        )
        .into()),
    }
}
