//! Integration tests for the Monkey tree-walking evaluator.
//!
//! Tests key evaluator features:
//! - integer, boolean and string expressions
//! - conditionals and `return`
//! - `let` bindings, closures and recursion
//! - runtime errors as values
//! - arrays, indexing and builtins
//! - equality rules and the call-depth guard

use monkey_eval::{evaluate, new_env, Env, Evaluator, Object};
use monkey_lexer::lex;
use monkey_parser::parse;
use monkey_types::ast::Program;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Parse Monkey source into a Program (panics on parse errors).
fn program(source: &str) -> Program {
    let result = parse(lex(source));
    if result.errors.has_errors() {
        panic!(
            "parse errors in {source:?}:\n{}",
            result
                .errors
                .iter()
                .map(|e| format!("  [{}] {}", e.code, e.message))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
    result.program
}

/// Evaluate in a fresh environment.
fn run(source: &str) -> Object {
    evaluate(&program(source), &new_env())
}

/// Evaluate and return the runtime error message (panics on success).
fn error_message(source: &str) -> String {
    match run(source) {
        Object::Error(message) => message,
        other => panic!("expected error from {source:?}, got {other:?}"),
    }
}

fn ints(values: &[i64]) -> Object {
    Object::array(values.iter().copied().map(Object::Integer).collect())
}

fn assert_cases(cases: &[(&str, Object)]) {
    for (source, expected) in cases {
        assert_eq!(&run(source), expected, "source: {source}");
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Integers & booleans
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_integer_expressions() {
    let cases = [
        ("5", 5),
        ("10", 10),
        ("-5", -5),
        ("-10", -10),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("-50 + 100 + -50", 0),
        ("5 * 2 + 10", 20),
        ("5 + 2 * 10", 25),
        ("20 + 2 * -10", 0),
        ("50 / 2 * 2 + 10", 60),
        ("2 * (5 + 10)", 30),
        ("3 * 3 * 3 + 10", 37),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ("7 / 2", 3),
        ("-7 / 2", -3),
    ];
    for (source, expected) in cases {
        assert_eq!(run(source), Object::Integer(expected), "source: {source}");
    }
}

#[test]
fn test_integer_arithmetic_wraps() {
    assert_eq!(run("9223372036854775807 + 1"), Object::Integer(i64::MIN));
    assert_eq!(
        run("let min = -9223372036854775807 - 1; min / -1"),
        Object::Integer(i64::MIN)
    );
    assert_eq!(
        run("let min = -9223372036854775807 - 1; -min"),
        Object::Integer(i64::MIN)
    );
    assert_eq!(
        run("4611686018427387904 * 4"),
        Object::Integer(0)
    );
}

#[test]
fn test_boolean_expressions() {
    let cases = [
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 < 1", false),
        ("1 > 1", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("1 == 2", false),
        ("1 != 2", true),
        ("true == true", true),
        ("false == false", true),
        ("true == false", false),
        ("true != false", true),
        ("false != true", true),
        ("(1 < 2) == true", true),
        ("(1 < 2) == false", false),
        ("(1 > 2) == true", false),
        ("(1 > 2) == false", true),
    ];
    for (source, expected) in cases {
        assert_eq!(run(source), Object::Boolean(expected), "source: {source}");
    }
}

#[test]
fn test_bang_operator() {
    let cases = [
        ("!true", false),
        ("!false", true),
        ("!5", false),
        ("!0", false),
        ("!!true", true),
        ("!!false", false),
        ("!!5", true),
        ("!\"\"", false),
        ("!if (false) { 1 }", true),
    ];
    for (source, expected) in cases {
        assert_eq!(run(source), Object::Boolean(expected), "source: {source}");
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Conditionals & return
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_if_else_expressions() {
    assert_cases(&[
        ("if (true) { 10 }", Object::Integer(10)),
        ("if (false) { 10 }", Object::Null),
        ("if (1) { 10 }", Object::Integer(10)),
        ("if (0) { 10 } else { 20 }", Object::Integer(10)),
        ("if (1 < 2) { 10 }", Object::Integer(10)),
        ("if (1 > 2) { 10 }", Object::Null),
        ("if (1 > 2) { 10 } else { 20 }", Object::Integer(20)),
        ("if (1 < 2) { 10 } else { 20 }", Object::Integer(10)),
        ("if (true) { }", Object::Null),
    ]);
}

#[test]
fn test_return_statements() {
    assert_cases(&[
        ("return 10;", Object::Integer(10)),
        ("return 10; 9;", Object::Integer(10)),
        ("return 2 * 5; 9;", Object::Integer(10)),
        ("9; return 2 * 5; 9;", Object::Integer(10)),
        (
            "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
            Object::Integer(10),
        ),
        ("{ return 3; } 4", Object::Integer(3)),
    ]);
}

#[test]
fn test_return_does_not_escape_function() {
    assert_eq!(run("let f = fn() { return 1; 2 }; f() + 10"), Object::Integer(11));
    assert_eq!(
        run("let f = fn(x) { if (x > 0) { return x; } 0 - x }; f(3) + f(-4)"),
        Object::Integer(7)
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Errors
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_error_handling() {
    let cases = [
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
        ("\"a\" + 1", "type mismatch: STRING + INTEGER"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("-\"a\"", "unknown operator: -STRING"),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
        ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
        (
            "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
            "unknown operator: BOOLEAN + BOOLEAN",
        ),
        ("true < false", "unknown operator: BOOLEAN < BOOLEAN"),
        ("[1] + [2]", "unknown operator: ARRAY + ARRAY"),
        ("foobar", "identifier not found: foobar"),
        ("\"Hello\" - \"World\"", "unknown operator: STRING - STRING"),
        ("\"a\" == \"a\"", "unknown operator: STRING == STRING"),
        ("1 / 0", "division by zero"),
        ("5(1)", "not a function: INTEGER"),
        ("\"f\"()", "not a function: STRING"),
        ("1[0]", "index operator not supported: INTEGER"),
        ("[1][true]", "index operator not supported: BOOLEAN"),
        ("fn(x) { x }()", "wrong number of arguments to function: want=1, got=0"),
        ("fn() { 1 }(1, 2)", "wrong number of arguments to function: want=0, got=2"),
    ];
    for (source, expected) in cases {
        assert_eq!(error_message(source), expected, "source: {source}");
    }
}

#[test]
fn test_error_inspects_with_prefix() {
    assert_eq!(run("foobar").inspect(), "ERROR: identifier not found: foobar");
}

#[test]
fn test_first_argument_error_wins() {
    assert_eq!(error_message("len(a, b)"), "identifier not found: a");
    assert_eq!(error_message("[1, x, y]"), "identifier not found: x");
    assert_eq!(error_message("(1 + true) + y"), "type mismatch: INTEGER + BOOLEAN");
}

#[test]
fn test_error_stops_let_binding() {
    let env = new_env();
    let result = evaluate(&program("let a = 1; let a = b; a"), &env);
    assert_eq!(result, Object::Error("identifier not found: b".into()));
    assert_eq!(env.borrow().get("a"), Some(Object::Integer(1)));
}

// ══════════════════════════════════════════════════════════════════════════════
// Let bindings & scope
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_let_statements() {
    assert_cases(&[
        ("let a = 5; a;", Object::Integer(5)),
        ("let a = 5 * 5; a;", Object::Integer(25)),
        ("let a = 5; let b = a; b;", Object::Integer(5)),
        ("let a = 5; let b = a; let c = a + b + 5; c;", Object::Integer(15)),
        ("let a = 1", Object::Null),
        ("", Object::Null),
    ]);
}

#[test]
fn test_bare_block_shares_scope() {
    assert_eq!(run("{ let a = 1; } a"), Object::Integer(1));
}

#[test]
fn test_function_scope_does_not_leak() {
    assert_eq!(
        error_message("let f = fn() { let inner = 1; inner }; f(); inner"),
        "identifier not found: inner"
    );
    assert_eq!(
        run("let x = 1; let f = fn(x) { x * 10 }; f(5) + x"),
        Object::Integer(51)
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Functions & closures
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_function_object() {
    match run("fn(x) { x + 2; };") {
        Object::Function(func) => {
            assert_eq!(func.parameters.len(), 1);
            assert_eq!(func.parameters[0].value, "x");
            assert_eq!(func.body.to_string(), "{ (x + 2) }");
        }
        other => panic!("expected function, got {other:?}"),
    }
    assert_eq!(run("fn(x, y) { x + y; }").inspect(), "fn(x, y) { (x + y) }");
}

#[test]
fn test_function_application() {
    assert_cases(&[
        ("let identity = fn(x) { x; }; identity(5);", Object::Integer(5)),
        ("let identity = fn(x) { return x; }; identity(5);", Object::Integer(5)),
        ("let double = fn(x) { x * 2; }; double(5);", Object::Integer(10)),
        ("let add = fn(x, y) { x + y; }; add(5, 5);", Object::Integer(10)),
        ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", Object::Integer(20)),
        ("fn(x) { x; }(5)", Object::Integer(5)),
        ("let noop = fn() { }; noop()", Object::Null),
    ]);
}

#[test]
fn test_closures() {
    let source = "
        let newAdder = fn(x) {
            fn(y) { x + y };
        };
        let addTwo = newAdder(2);
        addTwo(2);";
    assert_eq!(run(source), Object::Integer(4));
}

#[test]
fn test_closure_sees_later_bindings_in_captured_scope() {
    assert_eq!(
        run("let x = 1; let f = fn() { x }; let x = 2; f()"),
        Object::Integer(2)
    );
}

#[test]
fn test_recursive_functions() {
    let fib = "
        let fib = fn(n) {
            if (n < 2) { n } else { fib(n - 1) + fib(n - 2) }
        };
        fib(15)";
    assert_eq!(run(fib), Object::Integer(610));

    let count = "let count = fn(n) { if (n == 0) { 0 } else { 1 + count(n - 1) } }; count(400)";
    assert_eq!(run(count), Object::Integer(400));
}

#[test]
fn test_higher_order_functions() {
    let map = "
        let map = fn(arr, f) {
            let iter = fn(arr, acc) {
                if (len(arr) == 0) { acc } else { iter(rest(arr), push(acc, f(first(arr)))) }
            };
            iter(arr, [])
        };
        let double = fn(x) { x * 2 };
        map([1, 2, 3, 4], double)";
    assert_eq!(run(map), ints(&[2, 4, 6, 8]));

    let reduce = "
        let reduce = fn(arr, initial, f) {
            let iter = fn(arr, result) {
                if (len(arr) == 0) { result } else { iter(rest(arr), f(result, first(arr))) }
            };
            iter(arr, initial)
        };
        let sum = fn(arr) { reduce(arr, 0, fn(initial, el) { initial + el }) };
        sum([1, 2, 3, 4, 5])";
    assert_eq!(run(reduce), Object::Integer(15));
}

// ══════════════════════════════════════════════════════════════════════════════
// Call-depth guard
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_unbounded_recursion_is_an_error() {
    assert_eq!(
        error_message("let loop = fn(n) { loop(n + 1) }; loop(0)"),
        "maximum call depth of 512 exceeded"
    );
}

#[test]
fn test_custom_max_depth() {
    let source = |n: i64| {
        format!("let f = fn(n) {{ if (n == 0) {{ 0 }} else {{ f(n - 1) }} }}; f({n})")
    };
    let mut evaluator = Evaluator::with_max_depth(10);
    assert_eq!(evaluator.max_depth(), 10);

    assert_eq!(evaluator.eval(&program(&source(9)), &new_env()), Object::Integer(0));
    assert_eq!(
        evaluator.eval(&program(&source(10)), &new_env()),
        Object::Error("maximum call depth of 10 exceeded".into())
    );
    // Still usable after hitting the limit.
    assert_eq!(evaluator.eval(&program(&source(3)), &new_env()), Object::Integer(0));
}

// ══════════════════════════════════════════════════════════════════════════════
// Strings
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_string_literal() {
    assert_eq!(run("\"Hello World!\""), Object::from("Hello World!"));
    assert_eq!(run("\"tab\\there\""), Object::from("tab\there"));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(run("\"Hello\" + \" \" + \"World!\""), Object::from("Hello World!"));
    assert_eq!(
        run("let greet = fn(name) { \"hi \" + name }; greet(\"bob\")").inspect(),
        "hi bob"
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Builtins
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_builtin_functions() {
    assert_cases(&[
        ("len(\"\")", Object::Integer(0)),
        ("len(\"four\")", Object::Integer(4)),
        ("len(\"hello world\")", Object::Integer(11)),
        ("len([1, 2, 3])", Object::Integer(3)),
        ("len([])", Object::Integer(0)),
        ("first([1, 2, 3])", Object::Integer(1)),
        ("first([])", Object::Null),
        ("last([1, 2, 3])", Object::Integer(3)),
        ("last([])", Object::Null),
        ("rest([1, 2, 3])", ints(&[2, 3])),
        ("rest([])", Object::Null),
        ("push([], 1)", ints(&[1])),
        ("push([1, 2], 3)", ints(&[1, 2, 3])),
    ]);
}

#[test]
fn test_builtin_errors() {
    let cases = [
        ("len(1)", "argument to `len` not supported, got INTEGER"),
        ("len(\"one\", \"two\")", "wrong number of arguments. got=2, want=1"),
        ("first(1)", "argument to `first` must be ARRAY, got INTEGER"),
        ("last(\"abc\")", "argument to `last` must be ARRAY, got STRING"),
        ("rest(true)", "argument to `rest` must be ARRAY, got BOOLEAN"),
        ("push(1, 1)", "argument to `push` must be ARRAY, got INTEGER"),
        ("push([1])", "wrong number of arguments. got=1, want=2"),
    ];
    for (source, expected) in cases {
        assert_eq!(error_message(source), expected, "source: {source}");
    }
}

#[test]
fn test_push_does_not_modify_original() {
    let env = new_env();
    let result = evaluate(&program("let a = [1]; let b = push(a, 2); b"), &env);
    assert_eq!(result, ints(&[1, 2]));
    assert_eq!(env.borrow().get("a"), Some(ints(&[1])));
}

#[test]
fn test_builtins_are_values_and_can_be_shadowed() {
    assert_eq!(run("let f = len; f([1, 2])"), Object::Integer(2));
    assert_eq!(run("len").inspect(), "builtin function");
    assert_eq!(run("let len = fn(x) { 42 }; len(\"abc\")"), Object::Integer(42));
}

// ══════════════════════════════════════════════════════════════════════════════
// Arrays & indexing
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_array_literals() {
    assert_eq!(run("[1, 2 * 2, 3 + 3]"), ints(&[1, 4, 6]));
    assert_eq!(run("[]"), ints(&[]));
    assert_eq!(run("[1, \"two\", [3]]").inspect(), "[1, two, [3]]");
}

#[test]
fn test_array_index_expressions() {
    assert_cases(&[
        ("[1, 2, 3][0]", Object::Integer(1)),
        ("[1, 2, 3][1]", Object::Integer(2)),
        ("[1, 2, 3][2]", Object::Integer(3)),
        ("let i = 0; [1][i];", Object::Integer(1)),
        ("[1, 2, 3][1 + 1];", Object::Integer(3)),
        ("let myArray = [1, 2, 3]; myArray[2];", Object::Integer(3)),
        (
            "let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
            Object::Integer(6),
        ),
        ("let myArray = [1, 2, 3]; let i = myArray[0]; myArray[i]", Object::Integer(2)),
        ("[1, 2, 3][3]", Object::Null),
        ("[1, 2, 3][-1]", Object::Null),
        ("[[1, 2], [3]][0][1]", Object::Integer(2)),
    ]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Equality
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_equality_across_types() {
    let cases = [
        ("5 == true", false),
        ("5 != true", true),
        ("true == if (false) { 1 }", false),
        ("if (false) { 1 } == if (false) { 2 }", true),
        ("let a = [1]; a == a", true),
        ("[1] == [1]", false),
        ("[1] != [1]", true),
        ("let f = fn() { 1 }; f == f", true),
        ("fn() { 1 } == fn() { 1 }", false),
        ("len == len", true),
        ("len == first", false),
    ];
    for (source, expected) in cases {
        assert_eq!(run(source), Object::Boolean(expected), "source: {source}");
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Environment reuse
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_reevaluation_is_idempotent() {
    let env: Env = new_env();
    evaluate(&program("let x = 3;"), &env);
    let expr = program("x * 2 + len([1, 2])");
    let first = evaluate(&expr, &env);
    assert_eq!(first, Object::Integer(8));
    for _ in 0..10 {
        assert_eq!(evaluate(&expr, &env), first);
    }
}

#[test]
fn test_bindings_persist_across_programs() {
    let env = new_env();
    evaluate(&program("let add = fn(a, b) { a + b };"), &env);
    evaluate(&program("let five = add(2, 3);"), &env);
    assert_eq!(evaluate(&program("add(five, five)"), &env), Object::Integer(10));
}
