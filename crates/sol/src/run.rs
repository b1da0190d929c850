//! One-shot execution of a whole source file.

use crate::{
    error::{RunResult, SolError},
    eval::Evaluator,
    expressions::Node,
    io::PrintWriter,
    namespace::Namespace,
    tracer::EvalTracer,
    value::Value,
};

/// Parses a source file up front and evaluates its statements in order.
///
/// Construction fails on lex/parse errors, so file mode can report syntax
/// problems before any statement runs.
pub struct Runner {
    nodes: Vec<Node>,
}

impl Runner {
    pub fn new(source: &str) -> Result<Self, SolError> {
        let nodes = crate::parse::parse_source(source)?;
        Ok(Self { nodes })
    }

    /// Evaluates every statement against a fresh global scope, returning the
    /// last bare-expression value.
    pub fn run<P: PrintWriter, T: EvalTracer>(&self, print: &mut P, tracer: &mut T) -> RunResult<Value> {
        let globals = Namespace::global();
        Evaluator::new(print, tracer).run_statements(&self.nodes, &globals)
    }
}
