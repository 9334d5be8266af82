//! Standard library native functions
//!
//! This module provides the native functions and macros available in the
//! standard Iris scope.

use std::io::{self, Write};
use std::process;
use std::time::Instant;

use iris::native::{
    QUOTE_NAME, check_arity_exact, check_arity_range, expect_callable, expect_int, expect_seq,
    quote,
};
use iris::{Callable, Context, Dict, ErrorKind, ErrorValue, Int, Value};
use tracing::debug;

use crate::numeric::Number;

// ============================================================================
// Standard I/O
// ============================================================================

/// Print the repr of each argument, separated by spaces, then a newline
/// Usage: (echo "hello" 1) => prints "hello" 1, returns None
pub fn echo(args: &[Value], _ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    let line = args.iter().map(Value::repr).collect::<Vec<_>>().join(" ");
    let mut handle = io::stdout().lock();
    writeln!(handle, "{line}")
        .and_then(|()| handle.flush())
        .map_err(|e| ErrorValue::new(ErrorKind::UserError, format!("echo: I/O error: {e}")))?;
    Ok(Value::None)
}

/// Exit the process
/// Usage: (quit) or (quit 3)
pub fn quit(args: &[Value], _ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    check_arity_range("quit", args, 0, 1)?;
    let code = match args.first() {
        Some(value) => {
            let code = expect_int("quit", value)?;
            i32::try_from(code).map_err(|_| {
                ErrorValue::contract(format!("quit: exit status {code} out of range"))
            })?
        }
        None => 0,
    };
    debug!(code, "quit");
    process::exit(code)
}

// ============================================================================
// Sequences
// ============================================================================

/// First item of a sequence, None when it is empty
/// Usage: (first '(1 2 3)) => 1
pub fn first(args: &[Value], _ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    check_arity_exact("first", args, 1)?;
    Ok(expect_seq("first", &args[0])?
        .first()
        .cloned()
        .unwrap_or_default())
}

/// Every item but the first
/// Usage: (rest '(1 2 3)) => (2 3)
pub fn rest(args: &[Value], _ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    check_arity_exact("rest", args, 1)?;
    let seq = expect_seq("rest", &args[0])?;
    Ok(Value::Seq(seq.iter().skip(1).cloned().collect()))
}

/// Usage: (list 1 (+ 1 1)) => (1 2)
pub fn list(args: &[Value], _ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    Ok(Value::Seq(args.iter().cloned().collect()))
}

/// Item count of a sequence, character count of a text
/// Usage: (len '(1 2)) => 2, (len "héllo") => 5
pub fn len(args: &[Value], _ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    check_arity_exact("len", args, 1)?;
    let count = match args[0].resolved() {
        Value::Seq(seq) => seq.len(),
        Value::Text(text) => text.char_count(),
        other => {
            return Err(ErrorValue::type_error(format!(
                "len: expected Seq or Text, got {}",
                other.kind()
            )));
        }
    };
    Ok(Value::Int(count as Int))
}

// ============================================================================
// Arithmetic
// ============================================================================

fn binary_op(
    name: &str,
    args: &[Value],
    op: fn(Number, Number) -> Result<Number, ErrorValue>,
) -> Result<Value, ErrorValue> {
    check_arity_exact(name, args, 2)?;
    let a = Number::from_value(name, &args[0])?;
    let b = Number::from_value(name, &args[1])?;
    op(a, b).map(Value::from)
}

/// Usage: (+ 1 2) => 3, (+ 1 2.0) => 3.0
pub fn add(args: &[Value], _ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    binary_op("+", args, Number::add)
}

/// Usage: (- 5 3) => 2
pub fn sub(args: &[Value], _ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    binary_op("-", args, Number::sub)
}

/// Usage: (* 2 3) => 6
pub fn mul(args: &[Value], _ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    binary_op("*", args, Number::mul)
}

/// Usage: (/ 7 2) => 3, (/ 7.0 2) => 3.5
pub fn div(args: &[Value], _ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    binary_op("/", args, Number::div)
}

// ============================================================================
// Higher-order and Evaluation
// ============================================================================

/// Fold a two-argument callable over a sequence of at least two items
/// Usage: (reduce + '(1 2 3)) => 6
pub fn reduce(args: &[Value], ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    check_arity_exact("reduce", args, 2)?;
    let func = expect_callable("reduce", &args[0])?;
    let items = expect_seq("reduce", &args[1])?.as_slice();
    let [head, tail @ ..] = items else {
        return Err(reduce_too_short(0));
    };
    if tail.is_empty() {
        return Err(reduce_too_short(1));
    }
    tail.iter().try_fold(head.clone(), |acc, item| {
        ctx.call(func, &[acc, item.clone()])
    })
}

fn reduce_too_short(len: usize) -> ErrorValue {
    ErrorValue::contract(format!(
        "reduce: expected a sequence of at least 2 items, got {len}"
    ))
}

/// Resolve and evaluate a quoted form
/// Usage: (eval '(+ 1 2)) => 3
pub fn eval(args: &[Value], ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    check_arity_exact("eval", args, 1)?;
    let code = ctx.resolve(&args[0])?;
    ctx.eval(&code)
}

/// Time one evaluation of the body, in seconds
/// Usage: (timeit! (reduce + '(1 2 3))) => 0.000012
pub fn timeit(args: &[Value], ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    check_arity_exact("timeit!", args, 1)?;
    let start = Instant::now();
    let code = ctx.resolve(&args[0])?;
    ctx.eval(&code)?;
    Ok(Value::Float(start.elapsed().as_secs_f64()))
}

/// Evaluate the body n times, dropping the results
/// Usage: (repeat-eval! 3 (echo "hi")) => prints "hi" three times, returns None
pub fn repeat_eval(args: &[Value], ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    check_arity_exact("repeat-eval!", args, 2)?;
    let count = ctx.eval(&ctx.resolve(&args[0])?)?;
    let count = expect_int("repeat-eval!", &count)?;
    if count < 0 {
        return Err(ErrorValue::contract(format!(
            "repeat-eval!: expected a non-negative count, got {count}"
        )));
    }
    let body = ctx.resolve(&args[1])?;
    for _ in 0..count {
        ctx.eval(&body)?;
    }
    Ok(Value::None)
}

// ============================================================================
// Registration
// ============================================================================

/// Register all standard library functions in the scope
pub fn register_stdlib(scope: &mut Dict) {
    // Macros
    scope.bind(QUOTE_NAME, Callable::macro_(quote));
    scope.bind("timeit!", Callable::macro_(timeit));
    scope.bind("repeat-eval!", Callable::macro_(repeat_eval));

    // I/O and process
    scope.bind("echo", Callable::function(echo));
    scope.bind("quit", Callable::function(quit));

    // Sequences
    scope.bind("first", Callable::function(first));
    scope.bind("rest", Callable::function(rest));
    scope.bind("list", Callable::function(list));
    scope.bind("len", Callable::function(len));

    // Arithmetic
    scope.bind("+", Callable::function(add));
    scope.bind("-", Callable::function(sub));
    scope.bind("*", Callable::function(mul));
    scope.bind("/", Callable::function(div));

    // Higher-order
    scope.bind("reduce", Callable::function(reduce));
    scope.bind("eval", Callable::function(eval));

    debug!(bindings = scope.len(), "standard library registered");
}

/// A fresh scope holding the standard library
pub fn standard_scope() -> Dict {
    let mut scope = Dict::new();
    register_stdlib(&mut scope);
    scope
}

#[cfg(test)]
mod tests {
    use super::*;
    use iris::Seq;

    fn call(func: iris::NativeFn, args: &[Value]) -> Result<Value, ErrorValue> {
        let scope = standard_scope();
        let ctx = Context::new(&scope);
        func(args, &ctx)
    }

    fn seq(items: &[Int]) -> Value {
        Value::Seq(items.iter().copied().map(Value::Int).collect::<Seq>())
    }

    #[test]
    fn test_first_and_rest() {
        assert_eq!(call(first, &[seq(&[1, 2, 3])]), Ok(Value::Int(1)));
        assert_eq!(call(first, &[seq(&[])]), Ok(Value::None));
        assert_eq!(call(rest, &[seq(&[1, 2, 3])]), Ok(seq(&[2, 3])));
        assert_eq!(call(rest, &[seq(&[])]), Ok(seq(&[])));
    }

    #[test]
    fn test_len() {
        assert_eq!(call(len, &[seq(&[1, 2])]), Ok(Value::Int(2)));
        assert_eq!(call(len, &[Value::from("héllo")]), Ok(Value::Int(5)));
        assert_eq!(
            call(len, &[Value::Int(3)]).unwrap_err().kind(),
            ErrorKind::TypeError
        );
    }

    #[test]
    fn test_arithmetic_arity() {
        for func in [add, sub, mul, div] {
            assert_eq!(
                call(func, &[Value::Int(1)]).unwrap_err().kind(),
                ErrorKind::ContractViolation
            );
            assert_eq!(
                call(func, &[Value::Int(1), Value::Int(2), Value::Int(3)])
                    .unwrap_err()
                    .kind(),
                ErrorKind::ContractViolation
            );
        }
    }

    #[test]
    fn test_reduce_needs_two_items() {
        let plus = Value::Callable(Callable::function(add));
        assert_eq!(
            call(reduce, &[plus.clone(), seq(&[1])]).unwrap_err().kind(),
            ErrorKind::ContractViolation
        );
        assert_eq!(call(reduce, &[plus, seq(&[1, 2, 3, 4])]), Ok(Value::Int(10)));
    }

    #[test]
    fn test_register_stdlib_binds_every_name() {
        let scope = standard_scope();
        for name in [
            "quote!", "timeit!", "repeat-eval!", "echo", "quit", "first", "rest", "list", "len",
            "+", "-", "*", "/", "reduce", "eval",
        ] {
            assert!(scope.has(name), "{name} is not bound");
        }
        assert!(scope.get_view("quote!").and_then(Value::as_callable).unwrap().is_macro());
        assert!(!scope.get_view("echo").and_then(Value::as_callable).unwrap().is_macro());
    }
}
