use std::fmt;

use strum::{Display, EnumString, IntoStaticStr};

/// Result type alias for operations that can produce a runtime error.
pub type RunResult<T> = Result<T, RunError>;

/// Error categories raised by the lexer, parser, and evaluator.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and `Into<&'static str>`
/// implementations. The string representation matches the variant name exactly
/// (e.g., `NameError` -> "NameError").
///
/// These are fatal in file mode and recoverable in line mode; they are never
/// visible to Sol code. User-visible fallibility goes through `Result` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum ErrorKind {
    /// A free name resolved neither in the scope chain nor in the builtin registry.
    NameError,
    /// A value was used where its kind does not fit (not callable, not a number, ...).
    TypeError,
    /// A callable received more arguments than its declared arity permits.
    ArityError,
    /// A dict lookup on a missing key.
    KeyError,
    /// An array lookup outside `1..=len`, or a non-integer array index.
    IndexError,
    /// Division or remainder with a zero right-hand side.
    DivideByZero,
    /// The lexer rejected the source text.
    LexError,
    /// The parser rejected the token stream.
    ParseError,
}

/// An error with its category, human-readable message, and 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
}

impl SolError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
        }
    }

    pub fn name_error(name: &str, line: usize) -> Self {
        Self::new(ErrorKind::NameError, format!("name '{name}' is not defined"), line)
    }

    pub fn type_error(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::TypeError, message, line)
    }

    pub fn arity_error(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::ArityError, message, line)
    }

    pub fn key_error(key: &str, line: usize) -> Self {
        Self::new(ErrorKind::KeyError, format!("key '{key}' not found"), line)
    }

    pub fn index_error(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::IndexError, message, line)
    }

    pub fn divide_by_zero(line: usize) -> Self {
        Self::new(ErrorKind::DivideByZero, "division by zero", line)
    }

    pub fn lex_error(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::LexError, message, line)
    }

    pub fn parse_error(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::ParseError, message, line)
    }
}

impl fmt::Display for SolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (line {})", self.kind, self.message, self.line)
    }
}

impl std::error::Error for SolError {}

/// Outcome of evaluation that is not a plain value.
///
/// Keeping process termination separate from errors lets the library stay
/// side-effect free: `exit` and `unwrap_or_exit` return `Exit` and only the
/// driver turns it into `process::exit` after flushing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// A lexer, parser, or evaluator failure.
    Error(SolError),
    /// An explicit halt requested by `exit` or `unwrap_or_exit`, with exit code.
    Exit(i32),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(error) => write!(f, "{error}"),
            Self::Exit(code) => write!(f, "exit with code {code}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<SolError> for RunError {
    fn from(error: SolError) -> Self {
        Self::Error(error)
    }
}
