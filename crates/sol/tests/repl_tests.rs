//! Tests for `Session`, the persistent interactive session type that keeps
//! the global scope alive across `execute()` calls.

use pretty_assertions::assert_eq;
use sol::{Builtins, CollectStringPrint, ErrorKind, NoPrint, NoopTracer, RunError, Session, Value};

fn execute(session: &mut Session, source: &str) -> Result<Value, RunError> {
    session.execute(source, &mut NoPrint, &mut NoopTracer)
}

// =============================================================================
// 1. Session creation
// =============================================================================

/// A fresh session carries the script name it was created with.
#[test]
fn create_session_with_script_name() {
    let session = Session::new("<stdin>");
    assert_eq!(session.script_name(), "<stdin>");
}

/// A fresh session starts with no variables defined.
#[test]
fn fresh_session_has_empty_scope() {
    let session = Session::new("<stdin>");
    let vars = session.list_variables();
    assert!(vars.is_empty(), "fresh session should have no variables, got: {vars:?}");
}

// =============================================================================
// 2. Basic execute
// =============================================================================

/// An assignment statement returns Null, not the assigned value.
#[test]
fn assignment_returns_null() {
    let mut session = Session::new("<stdin>");
    let result = execute(&mut session, "x = 42.").unwrap();
    assert_eq!(result, Value::Null);
}

/// A bare expression statement returns its value.
#[test]
fn expression_returns_value() {
    let mut session = Session::new("<stdin>");
    let result = execute(&mut session, "+ 1 2.").unwrap();
    assert_eq!(result, Value::Int(3));
}

/// A bare builtin name is a value, not a call.
#[test]
fn bare_builtin_name_is_a_value() {
    let mut session = Session::new("<stdin>");
    let result = execute(&mut session, "echo.").unwrap();
    assert_eq!(result, Value::Builtin(Builtins::Echo));
}

// =============================================================================
// 3. Persistence across statements
// =============================================================================

/// Variables defined in one execute() call persist to the next.
#[test]
fn variable_persists_across_calls() {
    let mut session = Session::new("<stdin>");
    execute(&mut session, "a = 10.").unwrap();
    execute(&mut session, "b = 20.").unwrap();
    let result = execute(&mut session, "+ a b.").unwrap();
    assert_eq!(result, Value::Int(30));
}

/// A function defined in one call can be called in a later one.
#[test]
fn function_defined_then_called() {
    let mut session = Session::new("<stdin>");
    execute(&mut session, "double n = * n 2.").unwrap();
    let result = execute(&mut session, "double 21.").unwrap();
    assert_eq!(result, Value::Int(42));
}

/// A function can call a helper defined on a later line, because closures
/// capture their defining scope by reference.
#[test]
fn helper_defined_after_use_site() {
    let mut session = Session::new("<stdin>");
    execute(&mut session, "f x = helper x.").unwrap();
    execute(&mut session, "helper y = * y 10.").unwrap();
    let result = execute(&mut session, "f 3.").unwrap();
    assert_eq!(result, Value::Int(30));
}

/// Host inspection: lookup and list_variables see session bindings.
#[test]
fn host_can_inspect_bindings() {
    let mut session = Session::new("<stdin>");
    execute(&mut session, "x = 1. y = 2.").unwrap();
    assert_eq!(session.lookup("x"), Some(Value::Int(1)));
    assert_eq!(session.lookup("zzz"), None);
    let mut vars = session.list_variables();
    vars.sort();
    assert_eq!(vars, vec!["x".to_owned(), "y".to_owned()]);
}

/// User bindings shadow builtins; the registry is only a fallback.
#[test]
fn user_bindings_shadow_builtins() {
    let mut session = Session::new("<stdin>");
    execute(&mut session, "map = 5.").unwrap();
    let result = execute(&mut session, "map.").unwrap();
    assert_eq!(result, Value::Int(5));
}

// =============================================================================
// 4. Error recovery
// =============================================================================

/// An evaluator error aborts the statement but not the session; bindings
/// made before the failure survive.
#[test]
fn errors_do_not_poison_the_session() {
    let mut session = Session::new("<stdin>");
    let result = execute(&mut session, "x = 10. 1 / 0.");
    match result {
        Err(RunError::Error(error)) => assert_eq!(error.kind, ErrorKind::DivideByZero),
        other => panic!("expected DivideByZero, got {other:?}"),
    }
    let result = execute(&mut session, "+ x 5.").unwrap();
    assert_eq!(result, Value::Int(15));
}

/// A parse error leaves the scope untouched.
#[test]
fn parse_errors_leave_scope_untouched() {
    let mut session = Session::new("<stdin>");
    execute(&mut session, "x = 1.").unwrap();
    let result = execute(&mut session, "y = .");
    assert!(matches!(result, Err(RunError::Error(error)) if error.kind == ErrorKind::ParseError));
    assert_eq!(session.lookup("x"), Some(Value::Int(1)));
    assert_eq!(session.lookup("y"), None);
}

// =============================================================================
// 5. Echo output flows through the session's print writer
// =============================================================================

#[test]
fn echo_writes_through_the_print_writer() {
    let mut session = Session::new("<stdin>");
    let mut print = CollectStringPrint::new();
    let result = session.execute("echo 'hi' 42.", &mut print, &mut NoopTracer).unwrap();
    assert_eq!(result, Value::Null, "echo returns null");
    assert_eq!(print.output(), "hi 42\n");
}
