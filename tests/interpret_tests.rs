use pretty_assertions::assert_eq;
use mkc::interpreter::environment::make_environment;
use mkc::interpreter::object::Object;
use mkc::{interpret, Error};

#[test]
fn test_interpret_shares_environment_between_calls() {
    let env = make_environment();

    interpret("let fib = fn(n) { if (n < 2) { return n; } fib(n - 1) + fib(n - 2) };", &env).unwrap();
    let result = interpret("fib(20)", &env).unwrap();

    assert_eq!(Object::Integer(6765), result);
    assert_eq!("6765", result.inspect());
}

#[test]
fn test_interpret_reports_parse_errors() {
    let env = make_environment();

    match interpret("let x 5; x", &env) {
        Err(Error::Parse(errors)) => assert_eq!(
            vec![String::from("[line 1 column 7] expected next token to be =, got INT instead")],
            errors,
        ),
        other => panic!("expected parse errors, got {:?}", other),
    }

    // Nothing was evaluated, so `x` is still unbound.
    assert_eq!(
        "Erroridentifier not found: x",
        interpret("x", &env).unwrap().inspect(),
    );
}

#[test]
fn test_parse_error_display() {
    let error = Error::Parse(vec![String::from("first"), String::from("second")]);

    assert_eq!("Parser errors:\n\tfirst\n\tsecond", error.to_string());
}

#[test]
fn test_runtime_errors_are_values() {
    let env = make_environment();

    assert_eq!(
        Object::error("type mismatch: INTEGER + BOOLEAN"),
        interpret("let a = 1; a + true", &env).unwrap(),
    );
}
