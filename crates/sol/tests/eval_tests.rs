//! End-to-end evaluation tests for the Sol interpreter.
//!
//! Each test runs a snippet through a fresh `Session` with a collecting
//! print writer, then checks the returned value, the echo output, or the
//! error kind.

use pretty_assertions::assert_eq;
use sol::{CollectStringPrint, ErrorKind, NoopTracer, RunError, Session, Value};

/// Runs a snippet in a fresh session, returning the outcome and echo output.
fn run(source: &str) -> (Result<Value, RunError>, String) {
    let mut session = Session::new("<test>");
    let mut print = CollectStringPrint::new();
    let result = session.execute(source, &mut print, &mut NoopTracer);
    (result, print.into_output())
}

/// Runs a snippet that must succeed, returning its value and echo output.
fn run_ok(source: &str) -> (Value, String) {
    let (result, output) = run(source);
    match result {
        Ok(value) => (value, output),
        Err(error) => panic!("script failed: {error}\nsource: {source}"),
    }
}

/// Runs a snippet that must fail with an evaluator error, returning its kind.
fn run_err(source: &str) -> ErrorKind {
    let (result, _) = run(source);
    match result {
        Err(RunError::Error(error)) => error.kind,
        Err(RunError::Exit(code)) => panic!("script exited with {code} instead of failing: {source}"),
        Ok(value) => panic!("script succeeded with {} instead of failing: {source}", value.render_repr()),
    }
}

// =============================================================================
// 1. The core scenarios
// =============================================================================

/// `map` with a partially applied operator over an array literal.
#[test]
fn map_with_partial_over_array() {
    let (_, output) = run_ok("myarray = [1, 2, 3]. res = map (+ 1) myarray. echo res.");
    assert_eq!(output, "[2, 3, 4]\n");
}

/// A two-parameter function defined by assignment and called in prefix form.
#[test]
fn closure_definition_and_call() {
    let (_, output) = run_ok("f a b = * a b. echo (f 2 3).");
    assert_eq!(output, "6\n");
}

/// A pipeline chain: double, keep the large ones, sum.
#[test]
fn pipeline_chain() {
    let (_, output) = run_ok("nums = [1, 2, 3, 4, 5]. sum = nums |> map (* 2) |> filter (> 5) |> fold + 0. echo sum.");
    assert_eq!(output, "24\n");
}

/// Double quotes interpolate; single quotes do not.
#[test]
fn interpolated_and_plain_strings() {
    let (_, output) = run_ok("name = \"World\". echo \"Hello, {name}!\".");
    assert_eq!(output, "Hello, World!\n");

    let (_, output) = run_ok("name = \"World\". echo 'Hello, {name}!'.");
    assert_eq!(output, "Hello, {name}!\n");
}

/// `if` is an expression and composes with `==`.
#[test]
fn if_expression_value() {
    let (_, output) = run_ok("x = 1. y = if x == 1 then \"yes\" else \"no\". echo y.");
    assert_eq!(output, "yes\n");
}

/// Path access on dicts and 1-based arrays, including a variable-key hole.
#[test]
fn path_access_with_dynamic_key() {
    let (_, output) = run_ok("d = {\"x\": [1, 2]}. echo d|x|1.");
    assert_eq!(output, "1\n");

    let (_, output) = run_ok("d = {\"x\": [1, 2]}. k = \"x\". echo d|(k)|2.");
    assert_eq!(output, "2\n");
}

// =============================================================================
// 2. Application, partials, and currying
// =============================================================================

/// An under-applied builtin produces a Partial that saturates later.
#[test]
fn builtin_partial_saturates() {
    let (_, output) = run_ok("p = - 5. echo (p 2).");
    assert_eq!(output, "3\n");
}

/// Every application shape summing to the closure's arity gives the same
/// result as one saturated call.
#[test]
fn closure_application_shapes_agree() {
    let (_, output) = run_ok(
        "add3 a b c = + a (+ b c). \
         echo (add3 1 2 3). \
         echo ((add3 1) 2 3). \
         echo (((add3 1) 2) 3). \
         echo ((add3 1 2) 3).",
    );
    assert_eq!(output, "6\n6\n6\n6\n");
}

/// Extra arguments beyond a closure's arity apply to its returned value.
#[test]
fn over_application_curries_through_returned_value() {
    let (value, _) = run_ok("make a = + a. make 2 3.");
    assert_eq!(value, Value::Int(5));
}

/// Applying a bound name with no arguments yields the bound value.
#[test]
fn bare_value_statement() {
    let (value, _) = run_ok("x = 41. x.");
    assert_eq!(value, Value::Int(41));
}

/// Operators in argument position dispatch infix: `x == 1`, `x - 2`.
#[test]
fn operator_in_argument_position() {
    let (value, _) = run_ok("x = 7. x == 7.");
    assert_eq!(value, Value::Bool(true));

    let (value, _) = run_ok("x = 7. x - 2.");
    assert_eq!(value, Value::Int(5));

    let (value, _) = run_ok("1 + 2 + 3.");
    assert_eq!(value, Value::Int(6));
}

/// Infix ordering comparisons agree with their section reading: `x > 5`
/// and `(> 5) x` both test x against 5.
#[test]
fn comparisons_infix_and_section_agree() {
    let (value, _) = run_ok("x = 7. x > 5.");
    assert_eq!(value, Value::Bool(true));

    let (value, _) = run_ok("x = 7. x < 5.");
    assert_eq!(value, Value::Bool(false));

    let (_, output) = run_ok("big = filter (> 5) [3, 9, 4, 12]. echo big.");
    assert_eq!(output, "[9, 12]\n");
}

/// Applying a non-callable to plain arguments is a TypeError.
#[test]
fn non_callable_application_fails() {
    assert_eq!(run_err("x = 1. x 2."), ErrorKind::TypeError);
}

/// More arguments than a builtin's upper arity is an ArityError.
#[test]
fn excess_arguments_fail() {
    assert_eq!(run_err("- 1 2 3."), ErrorKind::ArityError);
}

// =============================================================================
// 3. Arithmetic
// =============================================================================

/// Integers stay integers; any float operand promotes.
#[test]
fn integer_preservation_and_promotion() {
    let (value, _) = run_ok("/ 7 2.");
    assert_eq!(value, Value::Int(3));

    let (value, _) = run_ok("/ 7 2.0.");
    assert_eq!(value, Value::Float(3.5));

    let (value, _) = run_ok("+ 1 2 3 4.");
    assert_eq!(value, Value::Int(10));
}

/// `+` concatenates when every operand is a string, or every operand is an
/// array.
#[test]
fn plus_concatenates_strings_and_arrays() {
    let (value, _) = run_ok("+ 'foo' 'bar'.");
    assert_eq!(value, Value::str("foobar"));

    let (_, output) = run_ok("echo (+ [1] [2, 3]).");
    assert_eq!(output, "[1, 2, 3]\n");
}

/// Division and remainder by zero fail with DivideByZero for both kinds of
/// number.
#[test]
fn divide_by_zero_fails() {
    assert_eq!(run_err("1 / 0."), ErrorKind::DivideByZero);
    assert_eq!(run_err("1 % 0."), ErrorKind::DivideByZero);
    assert_eq!(run_err("/ 1.0 0.0."), ErrorKind::DivideByZero);
}

// =============================================================================
// 4. If expressions and truthiness
// =============================================================================

fn branch(source: &str) -> String {
    let (value, _) = run_ok(source);
    match value {
        Value::Str(s) => s.to_string(),
        other => panic!("expected a string branch result, got {}", other.render_repr()),
    }
}

/// The falsy values: false, null, 0, empty string, empty array, empty dict,
/// and err results.
#[test]
fn falsy_values_choose_the_else_branch() {
    for falsy in ["false", "null", "0", "0.0", "''", "[]", "{}", "err 'boom'"] {
        assert_eq!(
            branch(&format!("if {falsy} then 'T' else 'F'.")),
            "F",
            "{falsy} should be falsy"
        );
    }
}

/// Everything else is truthy.
#[test]
fn truthy_values_choose_the_then_branch() {
    for truthy in ["true", "1", "-1", "0.5", "'x'", "[0]", "{k: 0}", "ok 0"] {
        assert_eq!(
            branch(&format!("if {truthy} then 'T' else 'F'.")),
            "T",
            "{truthy} should be truthy"
        );
    }
}

/// Exactly one branch runs, witnessed by echo side effects.
#[test]
fn only_the_chosen_branch_evaluates() {
    let (_, output) = run_ok("x = if true then echo 'then' else echo 'else'.");
    assert_eq!(output, "then\n");

    let (_, output) = run_ok("x = if false then echo 'then' else echo 'else'.");
    assert_eq!(output, "else\n");
}

/// Pipelines nest inside if branches: the then-branch owns `a |> b`.
#[test]
fn pipeline_inside_if_branch() {
    let (value, _) = run_ok("y = if true then [1, 2] |> fold + 0 else 0. y.");
    assert_eq!(value, Value::Int(3));
}

// =============================================================================
// 5. Paths and set
// =============================================================================

/// Arrays are 1-indexed; 0 and past-the-end both fail IndexError.
#[test]
fn array_index_bounds() {
    let (value, _) = run_ok("a = [10, 20, 30]. a|1.");
    assert_eq!(value, Value::Int(10));

    assert_eq!(run_err("a = [10, 20, 30]. a|0."), ErrorKind::IndexError);
    assert_eq!(run_err("a = [10, 20, 30]. a|4."), ErrorKind::IndexError);
}

/// Missing dict keys fail KeyError; unknown names fail NameError.
#[test]
fn missing_lookups_fail() {
    assert_eq!(run_err("d = {x: 1}. d|y."), ErrorKind::KeyError);
    assert_eq!(run_err("echo missing_name."), ErrorKind::NameError);
}

/// Numeric-looking dict keys are compared by their canonical decimal form.
#[test]
fn numeric_dict_keys_coerce() {
    let (_, output) = run_ok("d = {1: 'one'}. echo d|1.");
    assert_eq!(output, "one\n");
}

/// A dynamic path component evaluating to an integer selects an array index.
#[test]
fn dynamic_numeric_component_indexes_arrays() {
    let (value, _) = run_ok("a = [10, 20]. i = 2. a|(i).");
    assert_eq!(value, Value::Int(20));
}

/// `set` writes through a path, creating missing dict keys, and never
/// mutates the original container.
#[test]
fn set_round_trip_and_immutability() {
    let (value, _) = run_ok("d = {}. d' = set d 'k' 5. d'|k.");
    assert_eq!(value, Value::Int(5));

    let (value, _) = run_ok("d = {}. d' = set d 'k' 5. d2 = set d' 'k' 6. d2|k.");
    assert_eq!(value, Value::Int(6));

    let (value, _) = run_ok("e = set {} 'a|b' 1. e|a|b.");
    assert_eq!(value, Value::Int(1));

    let (_, output) = run_ok("d = {k: 1}. d' = set d 'k' 2. echo d|k d'|k.");
    assert_eq!(output, "1 2\n");
}

/// `set` on arrays replaces existing 1-based positions but never extends.
#[test]
fn set_array_positions() {
    let (_, output) = run_ok("a = [1, 2]. a' = set a '2' 9. echo a'.");
    assert_eq!(output, "[1, 9]\n");

    assert_eq!(run_err("a = [1]. set a '2' 9."), ErrorKind::IndexError);
}

// =============================================================================
// 6. Results
// =============================================================================

/// The unwrap laws: ok passes its value through, err yields the default.
#[test]
fn unwrap_or_laws() {
    let (value, _) = run_ok("unwrap_or (ok 1) 9.");
    assert_eq!(value, Value::Int(1));

    let (value, _) = run_ok("unwrap_or (err 'e') 9.");
    assert_eq!(value, Value::Int(9));
}

/// succeeded and failed report a Result's status as a Bool.
#[test]
fn succeeded_and_failed() {
    let (value, _) = run_ok("succeeded (ok 1).");
    assert_eq!(value, Value::Bool(true));

    let (value, _) = run_ok("failed (err 'e').");
    assert_eq!(value, Value::Bool(true));

    assert_eq!(run_err("succeeded 5."), ErrorKind::TypeError);
}

/// Results render as their status/value pair.
#[test]
fn result_rendering() {
    let (_, output) = run_ok("echo (ok 5) (err 'bad').");
    assert_eq!(output, "ok(5) err('bad')\n");
}

/// Piping an err does not short-circuit; the consumer decides.
#[test]
fn err_pipes_inertly() {
    let (value, _) = run_ok("err 'x' |> unwrap_or 9.");
    assert_eq!(value, Value::Int(9));
}

/// unwrap_or_exit returns the value on success and halts with code 1 on err.
#[test]
fn unwrap_or_exit_behavior() {
    let (value, _) = run_ok("unwrap_or_exit (ok 5) 'msg'.");
    assert_eq!(value, Value::Int(5));

    let (result, _) = run("unwrap_or_exit (err 'bad') 'msg'.");
    assert_eq!(result, Err(RunError::Exit(1)));
}

/// exit halts with the given code.
#[test]
fn exit_halts_with_code() {
    let (result, _) = run("exit 3.");
    assert_eq!(result, Err(RunError::Exit(3)));
}

// =============================================================================
// 7. Interpolation details
// =============================================================================

/// Slots follow |-paths, and unbound slots render themselves verbatim.
#[test]
fn interpolation_paths_and_unbound_slots() {
    let (_, output) = run_ok("d = {name: 'sol'}. echo \"hi {d|name}\".");
    assert_eq!(output, "hi sol\n");

    let (_, output) = run_ok("echo \"hi {nobody}\".");
    assert_eq!(output, "hi {nobody}\n");
}

/// Rendered slot values use the display form.
#[test]
fn interpolation_renders_display_forms() {
    let (_, output) = run_ok("n = 4. items = [1, 'a']. echo \"n={n} items={items}\".");
    assert_eq!(output, "n=4 items=[1, 'a']\n");
}

// =============================================================================
// 8. Functions and scoping
// =============================================================================

/// Closures see bindings added to their defining scope after definition,
/// so mutually recursive top-level functions need no forward declarations.
#[test]
fn late_binding_supports_mutual_recursion() {
    let (value, _) = run_ok(
        "even n = if n == 0 then true else odd (- n 1). \
         odd n = if n == 0 then false else even (- n 1). \
         even 10.",
    );
    assert_eq!(value, Value::Bool(true));
}

/// Parameters shadow outer bindings without disturbing them.
#[test]
fn parameters_shadow_outer_scope() {
    let (_, output) = run_ok("x = 'outer'. f x = echo x. f 'inner'. echo x.");
    assert_eq!(output, "inner\nouter\n");
}

// =============================================================================
// 9. Conversions and container helpers
// =============================================================================

#[test]
fn to_number_parses_or_errs() {
    let (value, _) = run_ok("+ (to_number '3') 4.");
    assert_eq!(value, Value::Int(7));

    let (value, _) = run_ok("to_number '2.5'.");
    assert_eq!(value, Value::Float(2.5));

    let (value, _) = run_ok("failed (to_number 'abc').");
    assert_eq!(value, Value::Bool(true));
}

#[test]
fn to_string_renders() {
    let (value, _) = run_ok("to_string 42.");
    assert_eq!(value, Value::str("42"));
}

#[test]
fn container_helpers() {
    let (value, _) = run_ok("len 'abc'.");
    assert_eq!(value, Value::Int(3));

    let (value, _) = run_ok("len [1, 2].");
    assert_eq!(value, Value::Int(2));

    let (value, _) = run_ok("keys {a: 1, b: 2}.");
    assert_eq!(value, Value::array(vec![Value::str("a"), Value::str("b")]));

    let (value, _) = run_ok("values {a: 1, b: 2}.");
    assert_eq!(value, Value::array(vec![Value::Int(1), Value::Int(2)]));
}

// =============================================================================
// 10. fold details
// =============================================================================

/// fold seeds from the first element when no initial value is given.
#[test]
fn fold_without_init_seeds_from_first_element() {
    let (value, _) = run_ok("fold + [1, 2, 3].");
    assert_eq!(value, Value::Int(6));
}

/// fold over an empty array returns the init, and fails without one.
#[test]
fn fold_empty_array() {
    let (value, _) = run_ok("fold + [] 42.");
    assert_eq!(value, Value::Int(42));

    assert_eq!(run_err("fold + []."), ErrorKind::TypeError);
}

/// map preserves length and order; filter preserves order.
#[test]
fn map_and_filter_preserve_order() {
    let (_, output) = run_ok("echo (map (* 10) [3, 1, 2]).");
    assert_eq!(output, "[30, 10, 20]\n");

    let (_, output) = run_ok("echo (filter (> 1) [3, 1, 2]).");
    assert_eq!(output, "[3, 2]\n");
}

// =============================================================================
// 11. Shell and environment builtins
// =============================================================================

#[test]
fn sh_captures_stdout_as_ok() {
    let (value, _) = run_ok("unwrap_or (sh 'echo hi') 'fallback'.");
    assert_eq!(value, Value::str("hi\n"));
}

#[test]
fn sh_failure_is_an_err_result() {
    let (value, _) = run_ok("failed (sh 'exit 3').");
    assert_eq!(value, Value::Bool(true));
}

// =============================================================================
// 12. File-mode runner
// =============================================================================

/// Runner parses a whole source up front and evaluates it against a fresh
/// scope, the same path file mode takes.
#[test]
fn runner_runs_a_whole_source() {
    let runner = sol::Runner::new("greet name = \"Hello, {name}!\". echo (greet 'Sol').").unwrap();
    let mut print = CollectStringPrint::new();
    let value = runner.run(&mut print, &mut NoopTracer).unwrap();
    assert_eq!(value, Value::Null, "echo is the last statement and returns null");
    assert_eq!(print.into_output(), "Hello, Sol!\n");
}

#[test]
fn getenv_yields_results() {
    let (value, _) = run_ok("succeeded (getenv 'PATH').");
    assert_eq!(value, Value::Bool(true));

    let (value, _) = run_ok("failed (getenv 'SOL_SURELY_UNSET_4821').");
    assert_eq!(value, Value::Bool(true));
}
