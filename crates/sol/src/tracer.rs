//! Evaluator tracing infrastructure.
//!
//! Provides a trait-based tracing system for the tree walker with zero-cost
//! abstraction: when using [`NoopTracer`], all trace methods compile away
//! entirely via monomorphization.
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost no-op (production default) |
//! | [`StderrTracer`] | Human-readable execution log to stderr (`--debug`) |

/// Trait for evaluator tracing.
///
/// All methods have default no-op implementations, so [`NoopTracer`] requires
/// zero lines of code and compiles to zero instructions. The evaluator carries
/// the tracer as a type parameter `T: EvalTracer`, so the compiler can inline
/// and eliminate no-op calls at compile time.
pub trait EvalTracer {
    /// Called once before each statement is evaluated.
    #[inline]
    fn on_statement(&mut self, _line: usize) {}

    /// Called when a closure or builtin call begins.
    ///
    /// `depth` is the number of active calls including this one.
    #[inline]
    fn on_call(&mut self, _name: &str, _arg_count: usize, _depth: usize) {}

    /// Called when a closure or builtin call returns, successfully or not.
    #[inline]
    fn on_return(&mut self, _name: &str, _depth: usize) {}
}

/// Zero-cost tracer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl EvalTracer for NoopTracer {}

/// Tracer that logs statements and call dispatch to stderr.
///
/// Selected by the driver's `--debug` flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrTracer;

impl StderrTracer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EvalTracer for StderrTracer {
    fn on_statement(&mut self, line: usize) {
        eprintln!("[sol] statement at line {line}");
    }

    fn on_call(&mut self, name: &str, arg_count: usize, depth: usize) {
        eprintln!("[sol] {:width$}call {name}/{arg_count}", "", width = depth * 2);
    }

    fn on_return(&mut self, name: &str, depth: usize) {
        eprintln!("[sol] {:width$}return {name}", "", width = depth * 2);
    }
}
