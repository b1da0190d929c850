//! The tree-walking evaluator.
//!
//! `Evaluator` walks expressions against a scope chain, performing
//! application, partial application, pipeline splicing, string interpolation,
//! and path access. It is parameterized over the print writer and tracer so
//! production runs with [`NoopTracer`](crate::tracer::NoopTracer) compile the
//! trace hooks away entirely.

use std::{rc::Rc, str::FromStr};

use indexmap::IndexMap;

use crate::{
    builtins::Builtins,
    error::{RunResult, SolError},
    expressions::{Expr, ExprLoc, Literal, Node, PathSegment},
    fstring::{FStringPart, SlotSegment},
    io::PrintWriter,
    namespace::{Namespace, ScopeRef},
    tracer::EvalTracer,
    value::{Closure, Partial, Value},
};

pub(crate) struct Evaluator<'a, P: PrintWriter, T: EvalTracer> {
    pub(crate) print: &'a mut P,
    tracer: &'a mut T,
    call_depth: usize,
}

impl<'a, P: PrintWriter, T: EvalTracer> Evaluator<'a, P, T> {
    pub fn new(print: &'a mut P, tracer: &'a mut T) -> Self {
        Self {
            print,
            tracer,
            call_depth: 0,
        }
    }

    /// Evaluates statements in order against `scope`, returning the value of
    /// the last bare expression statement (`Null` if there was none).
    pub fn run_statements(&mut self, nodes: &[Node], scope: &ScopeRef) -> RunResult<Value> {
        let mut last = Value::Null;
        for node in nodes {
            match node {
                Node::Assign {
                    name,
                    params,
                    value,
                    line,
                } => {
                    self.tracer.on_statement(*line);
                    let bound = if params.is_empty() {
                        self.eval(value, scope)?
                    } else {
                        Value::Closure(Rc::new(Closure {
                            name: Some(name.clone()),
                            params: params.clone(),
                            body: value.clone(),
                            scope: scope.clone(),
                        }))
                    };
                    Namespace::assign(scope, name.clone(), bound);
                    last = Value::Null;
                }
                Node::Expr(expr) => {
                    self.tracer.on_statement(expr.line);
                    last = self.eval(expr, scope)?;
                }
            }
        }
        Ok(last)
    }

    pub fn eval(&mut self, expr: &ExprLoc, scope: &ScopeRef) -> RunResult<Value> {
        let line = expr.line;
        match &expr.expr {
            Expr::Literal(literal) => Ok(match literal {
                Literal::Null => Value::Null,
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Int(i) => Value::Int(*i),
                Literal::Float(f) => Value::Float(*f),
                Literal::Str(s) => Value::str(s),
            }),
            Expr::FString(parts) => self.render_template(parts, scope, line),
            Expr::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item, scope)?);
                }
                Ok(Value::Array(Rc::new(values)))
            }
            Expr::Dict(entries) => {
                let mut map = IndexMap::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), self.eval(value, scope)?);
                }
                Ok(Value::Dict(Rc::new(map)))
            }
            Expr::Name(name) => self.lookup_name(name, scope, line),
            Expr::Builtin(builtin) => Ok(Value::Builtin(*builtin)),
            Expr::Apply { callee, args } => {
                let callable = self.eval(callee, scope)?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg, scope)?);
                }
                self.apply(callable, values, line)
            }
            Expr::Pipe { left, right } => {
                let piped = self.eval(left, scope)?;
                // splice the piped value in as the first argument of the
                // right-hand application
                match &right.expr {
                    Expr::Apply { callee, args } => {
                        let callable = self.eval(callee, scope)?;
                        let mut values = Vec::with_capacity(args.len() + 1);
                        values.push(piped);
                        for arg in args {
                            values.push(self.eval(arg, scope)?);
                        }
                        self.apply(callable, values, line)
                    }
                    _ => {
                        let callable = self.eval(right, scope)?;
                        self.apply(callable, vec![piped], line)
                    }
                }
            }
            Expr::If { test, then, orelse } => {
                let chosen = if self.eval(test, scope)?.is_truthy() { then } else { orelse };
                self.eval(chosen, scope)
            }
            Expr::Path { base, segments } => {
                let mut current = self.lookup_name(base, scope, line)?;
                for segment in segments {
                    current = match segment {
                        PathSegment::Key(key) => step_key(&current, key, line)?,
                        PathSegment::Index(index) => step_index(&current, *index, line)?,
                        PathSegment::Dynamic(inner) => {
                            let component = self.eval(inner, scope)?;
                            step_dynamic(&current, &component, line)?
                        }
                    };
                }
                Ok(current)
            }
        }
    }

    fn lookup_name(&self, name: &str, scope: &ScopeRef, line: usize) -> RunResult<Value> {
        if let Some(value) = Namespace::lookup(scope, name) {
            return Ok(value);
        }
        if let Ok(builtin) = Builtins::from_str(name) {
            return Ok(Value::Builtin(builtin));
        }
        Err(SolError::name_error(name, line).into())
    }

    /// Applies a callable to evaluated arguments, implementing the full
    /// dispatch rule: saturation, partial application, currying through
    /// returned values, partial prefix re-dispatch, and the infix rescue for
    /// operators in argument position (what makes `x == 1` work).
    pub fn apply(&mut self, callable: Value, args: Vec<Value>, line: usize) -> RunResult<Value> {
        if args.is_empty() {
            // zero-argument application of any value is the value itself
            return Ok(callable);
        }
        match callable {
            Value::Closure(closure) => self.call_closure(&closure, args, line),
            Value::Builtin(builtin) => self.call_builtin(builtin, args, line),
            Value::Partial(partial) => {
                let mut combined = partial.args.clone();
                combined.extend(args);
                self.apply(partial.callable.clone(), combined, line)
            }
            other => self.apply_non_callable(other, args, line),
        }
    }

    /// `value op rest...` re-dispatches through the operator when the first
    /// argument is an operator builtin; anything else is a type error.
    ///
    /// The ordering comparisons are section-style (`> a b` tests `b > a`), so
    /// for them the left value goes in second position: `x > 5` becomes
    /// `> 5 x`, which tests `x > 5`.
    fn apply_non_callable(&mut self, value: Value, mut args: Vec<Value>, line: usize) -> RunResult<Value> {
        match args.first() {
            Some(&Value::Builtin(builtin)) if builtin.is_operator() => {
                args.remove(0);
                let pair = if args.is_empty() {
                    vec![value]
                } else {
                    let operand = args.remove(0);
                    if matches!(builtin, Builtins::Lt | Builtins::Gt) {
                        vec![operand, value]
                    } else {
                        vec![value, operand]
                    }
                };
                let result = self.apply(Value::Builtin(builtin), pair, line)?;
                if args.is_empty() {
                    Ok(result)
                } else {
                    // remaining atoms chain onto the result, so `a + b + c`
                    // folds left
                    self.apply(result, args, line)
                }
            }
            _ => Err(SolError::type_error(format!("{} is not callable", value.type_name()), line).into()),
        }
    }

    fn call_closure(&mut self, closure: &Rc<Closure>, mut args: Vec<Value>, line: usize) -> RunResult<Value> {
        let wanted = closure.params.len();
        if args.len() < wanted {
            return Ok(Value::Partial(Rc::new(Partial {
                callable: Value::Closure(closure.clone()),
                args,
            })));
        }
        let extra = args.split_off(wanted);
        let frame = Namespace::child_of(&closure.scope);
        for (param, value) in closure.params.iter().zip(args) {
            Namespace::assign(&frame, param.clone(), value);
        }

        let name = closure.name.as_deref().unwrap_or("<fn>");
        self.call_depth += 1;
        self.tracer.on_call(name, wanted, self.call_depth);
        let result = self.eval(&closure.body, &frame);
        self.tracer.on_return(name, self.call_depth);
        self.call_depth -= 1;

        let value = result?;
        if extra.is_empty() {
            Ok(value)
        } else {
            // extra arguments curry through the returned value
            self.apply(value, extra, line)
        }
    }

    fn call_builtin(&mut self, builtin: Builtins, args: Vec<Value>, line: usize) -> RunResult<Value> {
        let (lo, hi) = builtin.arity();
        if args.len() < lo {
            return Ok(Value::Partial(Rc::new(Partial {
                callable: Value::Builtin(builtin),
                args,
            })));
        }
        if let Some(hi) = hi {
            if args.len() > hi {
                return Err(SolError::arity_error(
                    format!("{builtin} takes at most {hi} arguments, got {}", args.len()),
                    line,
                )
                .into());
            }
        }

        let name: &'static str = builtin.into();
        self.call_depth += 1;
        self.tracer.on_call(name, args.len(), self.call_depth);
        let result = builtin.call(args, line, self);
        self.tracer.on_return(name, self.call_depth);
        self.call_depth -= 1;
        result
    }

    /// Renders an interpolated template: literal fragments pass through, each
    /// slot looks up its variable, walks its path, and renders the display
    /// form. An unbound slot renders itself verbatim, braces included.
    fn render_template(&mut self, parts: &[FStringPart], scope: &ScopeRef, line: usize) -> RunResult<Value> {
        let mut out = String::new();
        for part in parts {
            match part {
                FStringPart::Literal(text) => out.push_str(text),
                FStringPart::Slot(slot) => match Namespace::lookup(scope, &slot.name) {
                    None => out.push_str(&slot.raw),
                    Some(mut value) => {
                        for segment in &slot.segments {
                            value = match segment {
                                SlotSegment::Key(key) => step_key(&value, key, line)?,
                                SlotSegment::Index(index) => step_index(&value, *index, line)?,
                            };
                        }
                        out.push_str(&value.render());
                    }
                },
            }
        }
        Ok(Value::str(out))
    }
}

/// One path step with a literal identifier component.
fn step_key(value: &Value, key: &str, line: usize) -> RunResult<Value> {
    match value {
        Value::Dict(entries) => entries
            .get(key)
            .cloned()
            .ok_or_else(|| SolError::key_error(key, line).into()),
        Value::Array(_) => Err(SolError::index_error(
            format!("array index must be a positive integer, got '{key}'"),
            line,
        )
        .into()),
        other => Err(path_type_error(other, line)),
    }
}

/// One path step with a number component: 1-based index on arrays, coerced
/// decimal key on dicts.
fn step_index(value: &Value, index: i64, line: usize) -> RunResult<Value> {
    match value {
        Value::Array(items) => {
            if index < 1 || index as usize > items.len() {
                return Err(SolError::index_error(
                    format!("array index {index} out of range (length {})", items.len()),
                    line,
                )
                .into());
            }
            Ok(items[index as usize - 1].clone())
        }
        Value::Dict(entries) => {
            let key = index.to_string();
            entries
                .get(key.as_str())
                .cloned()
                .ok_or_else(|| SolError::key_error(&key, line).into())
        }
        other => Err(path_type_error(other, line)),
    }
}

/// One path step with a runtime-evaluated component: integers select array
/// indices, everything else is rendered and used as a dict key.
fn step_dynamic(value: &Value, component: &Value, line: usize) -> RunResult<Value> {
    match component {
        Value::Int(index) => step_index(value, *index, line),
        other => step_key(value, &other.render(), line),
    }
}

fn path_type_error(value: &Value, line: usize) -> crate::error::RunError {
    SolError::type_error(format!("cannot access a path on {}", value.type_name()), line).into()
}
