//! Native function utilities and helpers
//!
//! Natives validate their own arity and argument kinds. These helpers
//! produce the matching `ContractViolation` and `TypeError` values.

use crate::error::ErrorValue;
use crate::interpreter::Context;
use crate::seq::Seq;
use crate::value::{Callable, Float, Int, Value};

/// Name the reader's quote macro is registered under.
pub const QUOTE_NAME: &str = "quote!";

// ============================================================================
// Arity Helpers
// ============================================================================

pub fn check_arity_exact(name: &str, args: &[Value], expected: usize) -> Result<(), ErrorValue> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ErrorValue::contract(format!(
            "{name}: expected {expected} argument{}, got {}",
            if expected == 1 { "" } else { "s" },
            args.len()
        )))
    }
}

pub fn check_arity_range(
    name: &str,
    args: &[Value],
    min: usize,
    max: usize,
) -> Result<(), ErrorValue> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(ErrorValue::contract(format!(
            "{name}: expected {min} to {max} arguments, got {}",
            args.len()
        )))
    }
}

// ============================================================================
// Value Extraction Helpers
// ============================================================================

pub fn expect_int(name: &str, value: &Value) -> Result<Int, ErrorValue> {
    match value.resolved() {
        Value::Int(n) => Ok(*n),
        other => Err(ErrorValue::type_error(format!(
            "{name}: expected Int, got {}",
            other.kind()
        ))),
    }
}

/// Extract a number as Float, converting integers
pub fn expect_number(name: &str, value: &Value) -> Result<Float, ErrorValue> {
    match value.resolved() {
        Value::Int(n) => Ok(*n as Float),
        Value::Float(x) => Ok(*x),
        other => Err(ErrorValue::type_error(format!(
            "{name}: expected number, got {}",
            other.kind()
        ))),
    }
}

pub fn expect_seq<'v>(name: &str, value: &'v Value) -> Result<&'v Seq, ErrorValue> {
    value.as_seq().ok_or_else(|| {
        ErrorValue::type_error(format!(
            "{name}: expected Seq, got {}",
            value.resolved().kind()
        ))
    })
}

pub fn expect_callable<'v>(name: &str, value: &'v Value) -> Result<&'v Callable, ErrorValue> {
    value.as_callable().ok_or_else(|| {
        ErrorValue::type_error(format!(
            "{name}: expected Callable, got {}",
            value.resolved().kind()
        ))
    })
}

// ============================================================================
// Quote
// ============================================================================

/// Return the single argument unevaluated.
/// Usage: (quote! (+ 1 2)) => (+ 1 2)
pub fn quote(args: &[Value], _ctx: &Context<'_>) -> Result<Value, ErrorValue> {
    check_arity_exact(QUOTE_NAME, args, 1)?;
    Ok(args[0].clone())
}
