//! Arithmetic operators: variadic `+` and the binary `- * / %`.
//!
//! Integers are preserved when every operand is an integer (`/` truncates);
//! any float operand promotes the whole operation. Integer overflow promotes
//! the result to float rather than wrapping.

use std::rc::Rc;

use super::Builtins;
use crate::{
    error::{RunResult, SolError},
    value::Value,
};

/// `+` with two or more arguments: numeric sum, string concatenation when
/// every operand is a string, array concatenation when every operand is an
/// array.
pub(super) fn builtin_add(args: Vec<Value>, line: usize) -> RunResult<Value> {
    if args.iter().all(|value| matches!(value, Value::Str(_))) {
        let mut out = String::new();
        for value in &args {
            if let Value::Str(s) = value {
                out.push_str(s);
            }
        }
        return Ok(Value::str(out));
    }
    if args.iter().all(|value| matches!(value, Value::Array(_))) {
        let mut out = Vec::new();
        for value in &args {
            if let Value::Array(items) = value {
                out.extend(items.iter().cloned());
            }
        }
        return Ok(Value::Array(Rc::new(out)));
    }

    let mut acc = args[0].clone();
    for value in &args[1..] {
        acc = match pair(&acc, value, "+", line)? {
            Nums::Ints(a, b) => a
                .checked_add(b)
                .map_or_else(|| Value::Float(a as f64 + b as f64), Value::Int),
            Nums::Floats(a, b) => Value::Float(a + b),
        };
    }
    Ok(acc)
}

/// The binary arithmetic operators `- * / %`.
pub(super) fn builtin_binary(op: Builtins, args: Vec<Value>, line: usize) -> RunResult<Value> {
    let (left, right) = super::two_args(args);
    let nums = pair(&left, &right, &op.to_string(), line)?;
    let value = match op {
        Builtins::Sub => match nums {
            Nums::Ints(a, b) => a
                .checked_sub(b)
                .map_or_else(|| Value::Float(a as f64 - b as f64), Value::Int),
            Nums::Floats(a, b) => Value::Float(a - b),
        },
        Builtins::Mul => match nums {
            Nums::Ints(a, b) => a
                .checked_mul(b)
                .map_or_else(|| Value::Float(a as f64 * b as f64), Value::Int),
            Nums::Floats(a, b) => Value::Float(a * b),
        },
        Builtins::Div => match nums {
            Nums::Ints(a, b) => {
                if b == 0 {
                    return Err(SolError::divide_by_zero(line).into());
                }
                Value::Int(a / b)
            }
            Nums::Floats(a, b) => {
                if b == 0.0 {
                    return Err(SolError::divide_by_zero(line).into());
                }
                Value::Float(a / b)
            }
        },
        Builtins::Mod => match nums {
            Nums::Ints(a, b) => {
                if b == 0 {
                    return Err(SolError::divide_by_zero(line).into());
                }
                Value::Int(a % b)
            }
            Nums::Floats(a, b) => {
                if b == 0.0 {
                    return Err(SolError::divide_by_zero(line).into());
                }
                Value::Float(a % b)
            }
        },
        other => unreachable!("builtin_binary dispatched with non-arithmetic operator {other}"),
    };
    Ok(value)
}

enum Nums {
    Ints(i64, i64),
    Floats(f64, f64),
}

fn pair(left: &Value, right: &Value, op: &str, line: usize) -> RunResult<Nums> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Nums::Ints(*a, *b)),
        (Value::Int(a), Value::Float(b)) => Ok(Nums::Floats(*a as f64, *b)),
        (Value::Float(a), Value::Int(b)) => Ok(Nums::Floats(*a, *b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Nums::Floats(*a, *b)),
        (bad, _) if !matches!(bad, Value::Int(_) | Value::Float(_)) => Err(SolError::type_error(
            format!("'{op}' expects numbers, got {}", bad.type_name()),
            line,
        )
        .into()),
        (_, bad) => Err(SolError::type_error(
            format!("'{op}' expects numbers, got {}", bad.type_name()),
            line,
        )
        .into()),
    }
}
