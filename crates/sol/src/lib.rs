#![doc = include_str!("../../../README.md")]

mod builtins;
mod error;
mod eval;
mod expressions;
mod fstring;
mod io;
mod lexer;
mod namespace;
mod parse;
mod repl;
mod run;
mod tracer;
mod value;

pub use crate::{
    builtins::Builtins,
    error::{ErrorKind, RunError, RunResult, SolError},
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint},
    repl::{Session, statement_complete},
    run::Runner,
    tracer::{EvalTracer, NoopTracer, StderrTracer},
    value::{Closure, Partial, SolResult, Value},
};
