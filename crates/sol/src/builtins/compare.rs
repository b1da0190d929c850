//! Comparison operators `==`, `<`, and `>`.
//!
//! `==` is structural equality over any two values. The ordering operators
//! read section-style: `> a b` tests `b > a` ("greater than a"), so the
//! partial `(> 5)` is the predicate "greater than 5". Orderings are defined
//! for numbers and for strings (lexicographic).

use super::Builtins;
use crate::{
    error::{RunResult, SolError},
    value::Value,
};

pub(super) fn builtin_compare(op: Builtins, args: Vec<Value>, line: usize) -> RunResult<Value> {
    let (first, second) = super::two_args(args);
    let result = match op {
        Builtins::Eq => first == second,
        Builtins::Lt => ordered(&second, &first, "<", line)? == std::cmp::Ordering::Less,
        Builtins::Gt => ordered(&second, &first, ">", line)? == std::cmp::Ordering::Greater,
        other => unreachable!("builtin_compare dispatched with non-comparison operator {other}"),
    };
    Ok(Value::Bool(result))
}

fn ordered(left: &Value, right: &Value, op: &str, line: usize) -> RunResult<std::cmp::Ordering> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Int(a), Value::Float(b)) => total(*a as f64, *b),
        (Value::Float(a), Value::Int(b)) => total(*a, *b as f64),
        (Value::Float(a), Value::Float(b)) => total(*a, *b),
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        (a, b) => {
            return Err(SolError::type_error(
                format!("'{op}' cannot compare {} with {}", a.type_name(), b.type_name()),
                line,
            )
            .into());
        }
    };
    Ok(ordering)
}

fn total(a: f64, b: f64) -> std::cmp::Ordering {
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}
