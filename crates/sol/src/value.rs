use std::{fmt::Write as _, rc::Rc};

use indexmap::IndexMap;

use crate::{builtins::Builtins, expressions::ExprLoc, namespace::ScopeRef};

/// Primary value type representing Sol data at runtime.
///
/// Small immediate values are stored inline; compound values share their
/// payload behind `Rc`, which makes `Clone` cheap and keeps the language's
/// values logically immutable: `set` and friends build new containers
/// instead of mutating in place.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a meaningful result.
    Null,
    Bool(bool),
    /// Integers are preserved as long as every operand of an arithmetic
    /// operation is an integer; otherwise values promote to `Float`.
    Int(i64),
    Float(f64),
    /// Both surface string forms (interpolated and plain) evaluate to this.
    Str(Rc<str>),
    /// Ordered sequence, externally 1-indexed.
    Array(Rc<Vec<Value>>),
    /// String-keyed mapping; iteration follows insertion order.
    Dict(Rc<IndexMap<String, Value>>),
    /// A user-defined function with its captured defining scope.
    Closure(Rc<Closure>),
    /// A registry builtin.
    Builtin(Builtins),
    /// A callable with an accumulated argument prefix, awaiting more.
    Partial(Rc<Partial>),
    /// Outcome of a fallible operation: `ok(v)` or `err(e)`.
    Result(Rc<SolResult>),
}

/// A user-defined function.
///
/// The defining scope is captured by reference, so bindings added to that
/// scope after definition are visible to the closure. This is what lets
/// top-level functions call helpers defined on later lines.
#[derive(Debug)]
pub struct Closure {
    /// The binding name, used for rendering and tracing. Anonymous closures
    /// do not exist in the surface syntax, but the name stays optional so
    /// synthesized closures render sensibly.
    pub(crate) name: Option<String>,
    pub(crate) params: Vec<String>,
    pub(crate) body: ExprLoc,
    pub(crate) scope: ScopeRef,
}

/// A callable plus pre-applied arguments.
///
/// Produced whenever a callable receives fewer arguments than its minimum
/// arity. Application prepends the stored prefix and re-dispatches, so a
/// saturated partial behaves exactly like the direct call.
#[derive(Debug)]
pub struct Partial {
    pub(crate) callable: Value,
    pub(crate) args: Vec<Value>,
}

impl Partial {
    /// The name of the underlying callable, for rendering and tracing.
    pub(crate) fn callable_name(&self) -> String {
        match &self.callable {
            Value::Builtin(builtin) => builtin.to_string(),
            Value::Closure(closure) => closure.name.clone().unwrap_or_else(|| "<fn>".to_owned()),
            Value::Partial(partial) => partial.callable_name(),
            other => other.type_name().to_owned(),
        }
    }
}

/// The payload of a `Result` value: `{success, value, error}`.
#[derive(Debug)]
pub struct SolResult {
    pub success: bool,
    pub value: Value,
    pub error: Value,
}

impl SolResult {
    /// Builds `ok(value)`.
    pub fn ok(value: Value) -> Value {
        Value::Result(Rc::new(Self {
            success: true,
            value,
            error: Value::Null,
        }))
    }

    /// Builds `err(error)`.
    pub fn err(error: Value) -> Value {
        Value::Result(Rc::new(Self {
            success: false,
            value: Value::Null,
            error,
        }))
    }
}

impl Value {
    /// Convenience constructor for string values.
    pub fn str(text: impl AsRef<str>) -> Self {
        Self::Str(Rc::from(text.as_ref()))
    }

    /// Convenience constructor for array values.
    pub fn array(items: Vec<Self>) -> Self {
        Self::Array(Rc::new(items))
    }

    /// Sol's truthiness rule: `false`, `null`, `0`, the empty string, the
    /// empty array, the empty dict, and any `err` Result are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Array(items) => !items.is_empty(),
            Self::Dict(entries) => !entries.is_empty(),
            Self::Result(result) => result.success,
            Self::Closure(_) | Self::Builtin(_) | Self::Partial(_) => true,
        }
    }

    /// Whether application of this value dispatches a call.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Closure(_) | Self::Builtin(_) | Self::Partial(_))
    }

    /// A short noun for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "a bool",
            Self::Int(_) | Self::Float(_) => "a number",
            Self::Str(_) => "a string",
            Self::Array(_) => "an array",
            Self::Dict(_) => "a dict",
            Self::Closure(_) => "a function",
            Self::Builtin(_) => "a builtin",
            Self::Partial(_) => "a partial application",
            Self::Result(_) => "a result",
        }
    }

    /// The display rendering used by `echo`, string interpolation, and the
    /// interactive echo of bare expressions: strings render bare, everything
    /// else as in [`Value::render_repr`].
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Str(s) => out.push_str(s),
            other => other.repr_fmt(&mut out),
        }
        out
    }

    /// The canonical bracketed rendering: like [`Value::render`], but strings
    /// are single-quoted. Used for values nested inside arrays and dicts.
    #[must_use]
    pub fn render_repr(&self) -> String {
        let mut out = String::new();
        self.repr_fmt(&mut out);
        out
    }

    fn repr_fmt(&self, out: &mut String) {
        match self {
            Self::Null => out.push_str("null"),
            Self::Bool(true) => out.push_str("true"),
            Self::Bool(false) => out.push_str("false"),
            Self::Int(i) => {
                let _ = write!(out, "{i}");
            }
            Self::Float(f) => out.push_str(ryu::Buffer::new().format(*f)),
            Self::Str(s) => {
                let _ = write!(out, "'{s}'");
            }
            Self::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.repr_fmt(out);
                }
                out.push(']');
            }
            Self::Dict(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{key}: ");
                    value.repr_fmt(out);
                }
                out.push('}');
            }
            Self::Closure(closure) => {
                out.push_str("<fn");
                for param in &closure.params {
                    let _ = write!(out, " {param}");
                }
                out.push('>');
            }
            Self::Builtin(builtin) => {
                let _ = write!(out, "<builtin {builtin}>");
            }
            Self::Partial(partial) => {
                let _ = write!(out, "<partial {}>", partial.callable_name());
            }
            Self::Result(result) => {
                if result.success {
                    out.push_str("ok(");
                    result.value.repr_fmt(out);
                } else {
                    out.push_str("err(");
                    result.error.repr_fmt(out);
                }
                out.push(')');
            }
        }
    }
}

/// Structural equality with numeric promotion: `1 == 1.0` holds, containers
/// compare elementwise (dicts by key set, insertion order ignored), callables
/// compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Dict(a), Self::Dict(b)) => a == b,
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Closure(a), Self::Closure(b)) => Rc::ptr_eq(a, b),
            (Self::Partial(a), Self::Partial(b)) => Rc::ptr_eq(a, b),
            (Self::Result(a), Self::Result(b)) => {
                a.success == b.success && a.value == b.value && a.error == b.error
            }
            _ => false,
        }
    }
}
