use iris::{ErrorKind, Value};
use iris_runtime::{Runtime, RunError};

fn run(source: &str) -> Result<Value, RunError> {
    Runtime::default().run_str(source)
}

fn error_kind(source: &str) -> ErrorKind {
    match run(source) {
        Err(RunError::Script { error, .. }) => error.kind(),
        other => panic!("expected a script error from {source:?}, got {other:?}"),
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_int_arithmetic() {
    assert_eq!(run("(+ 1 2)").unwrap(), Value::Int(3));
    assert_eq!(run("(- 1 2)").unwrap(), Value::Int(-1));
    assert_eq!(run("(* -4 5)").unwrap(), Value::Int(-20));
    assert_eq!(run("(/ 7 2)").unwrap(), Value::Int(3));
}

#[test]
fn test_float_promotion() {
    assert_eq!(run("(+ 1 2.0)").unwrap(), Value::Float(3.0));
    assert_eq!(run("(* 0.5 4)").unwrap(), Value::Float(2.0));
    assert_eq!(run("(/ 7 2.0)").unwrap(), Value::Float(3.5));
}

#[test]
fn test_arithmetic_errors() {
    assert_eq!(error_kind("(+ 9223372036854775807 1)"), ErrorKind::OverflowError);
    assert_eq!(error_kind("(/ 1 0)"), ErrorKind::ZeroDivisionError);
    assert_eq!(error_kind("(/ 1.0 0.0)"), ErrorKind::ZeroDivisionError);
    assert_eq!(error_kind("(* 'a 2)"), ErrorKind::TypeError);
}

// ============================================================================
// Sequences
// ============================================================================

#[test]
fn test_list_first_rest() {
    assert_eq!(run("(first (list 1 2 3))").unwrap(), Value::Int(1));
    assert_eq!(run("(first '())").unwrap(), Value::None);
    assert_eq!(run("(rest '(1 2 3))").unwrap().to_string(), "(2 3)");
    assert_eq!(error_kind("(first 1)"), ErrorKind::TypeError);
    assert_eq!(error_kind("(rest)"), ErrorKind::ContractViolation);
}

#[test]
fn test_len() {
    assert_eq!(run("(len '(1 2 3))").unwrap(), Value::Int(3));
    assert_eq!(run("(len \"naïve\")").unwrap(), Value::Int(5));
    assert_eq!(run("(len \"\")").unwrap(), Value::Int(0));
}

// ============================================================================
// Higher-order and Evaluation
// ============================================================================

#[test]
fn test_reduce() {
    assert_eq!(run("(reduce + '(1 2 3 4))").unwrap(), Value::Int(10));
    assert_eq!(run("(reduce * (list 1 2 3 4))").unwrap(), Value::Int(24));
    assert_eq!(run("(reduce + '(1 2.5))").unwrap(), Value::Float(3.5));
    assert_eq!(error_kind("(reduce + '(1))"), ErrorKind::ContractViolation);
    assert_eq!(error_kind("(reduce 1 '(1 2))"), ErrorKind::TypeError);
    assert_eq!(error_kind("(reduce + '(1 \"x\"))"), ErrorKind::TypeError);
}

#[test]
fn test_eval() {
    assert_eq!(run("(eval '(+ 1 2))").unwrap(), Value::Int(3));
    assert_eq!(run("(eval '(reduce + '(1 2 3)))").unwrap(), Value::Int(6));
    assert_eq!(run("(eval 5)").unwrap(), Value::Int(5));
    assert_eq!(error_kind("(eval '(+ fresh 1))"), ErrorKind::NameError);
}

#[test]
fn test_echo_returns_none() {
    assert_eq!(run("(echo \"from the test suite\" 1 2.5)").unwrap(), Value::None);
    assert_eq!(run("(echo)").unwrap(), Value::None);
}
