//! Persistent interactive session support.
//!
//! `Session` keeps the global scope alive across `execute()` calls so
//! interactive statements can share variables and functions. The driver pairs
//! it with [`statement_complete`] to decide when accumulated input forms a
//! dispatchable statement.

use crate::{
    error::{RunError, RunResult},
    eval::Evaluator,
    io::PrintWriter,
    namespace::{Namespace, ScopeRef},
    parse::parse_source,
    tracer::EvalTracer,
    value::Value,
};

/// A persistent session that executes source against an accumulated scope.
///
/// Each `execute()` call parses and evaluates a snippet (one or more
/// statements) while preserving all prior bindings. Evaluator errors abort
/// the current snippet only; the scope keeps every binding made by the
/// statements that already ran.
pub struct Session {
    globals: ScopeRef,
    script_name: String,
}

impl Session {
    #[must_use]
    pub fn new(script_name: impl Into<String>) -> Self {
        Self {
            globals: Namespace::global(),
            script_name: script_name.into(),
        }
    }

    /// The name used to identify this session's source (e.g. `<stdin>`).
    #[must_use]
    pub fn script_name(&self) -> &str {
        self.script_name.as_str()
    }

    /// Parses and evaluates every statement in `source` against the
    /// persistent scope, returning the last bare-expression value (`Null` if
    /// the snippet ends with an assignment).
    pub fn execute<P: PrintWriter, T: EvalTracer>(
        &mut self,
        source: &str,
        print: &mut P,
        tracer: &mut T,
    ) -> RunResult<Value> {
        let nodes = parse_source(source).map_err(RunError::from)?;
        Evaluator::new(print, tracer).run_statements(&nodes, &self.globals)
    }

    /// Looks up a binding in the global scope, for host inspection.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        Namespace::lookup(&self.globals, name)
    }

    /// Names bound in the global scope, in no particular order.
    #[must_use]
    pub fn list_variables(&self) -> Vec<String> {
        Namespace::local_names(&self.globals)
    }
}

/// Reports whether accumulated line-mode input ends a statement: its last
/// significant character is a `.` outside both string forms and at bracket
/// depth zero. Comments are skipped; incomplete strings and open brackets
/// keep the reader collecting lines.
#[must_use]
pub fn statement_complete(source: &str) -> bool {
    #[derive(PartialEq)]
    enum Mode {
        Normal,
        Single,
        Double,
    }

    let mut mode = Mode::Normal;
    let mut depth = 0usize;
    let mut ends_with_period = false;
    let mut chars = source.chars().peekable();

    while let Some(ch) = chars.next() {
        match mode {
            Mode::Single | Mode::Double => match ch {
                '\\' => {
                    chars.next();
                }
                '\'' if mode == Mode::Single => mode = Mode::Normal,
                '"' if mode == Mode::Double => mode = Mode::Normal,
                _ => {}
            },
            Mode::Normal => match ch {
                '#' => {
                    while chars.peek().is_some_and(|c| *c != '\n') {
                        chars.next();
                    }
                }
                '\'' => {
                    mode = Mode::Single;
                    ends_with_period = false;
                }
                '"' => {
                    mode = Mode::Double;
                    ends_with_period = false;
                }
                '(' | '[' | '{' => {
                    depth += 1;
                    ends_with_period = false;
                }
                ')' | ']' | '}' => {
                    depth = depth.saturating_sub(1);
                    ends_with_period = false;
                }
                '.' if depth == 0 => ends_with_period = true,
                c if c.is_whitespace() => {}
                _ => ends_with_period = false,
            },
        }
    }
    mode == Mode::Normal && depth == 0 && ends_with_period
}
