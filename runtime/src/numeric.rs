use std::fmt;

use iris::{ErrorKind, ErrorValue, Float, Int, Value};

// ============================================================================
// Numeric Type System
// ============================================================================

/// Arithmetic operand: an Int or a Float value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Exact integer, never silently wrapped
    Int(Int),

    /// IEEE 754 double precision floating point
    Float(Float),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Int(n) => Value::Int(n),
            Number::Float(x) => Value::Float(x),
        }
    }
}

impl Number {
    /// Extract a number from a value, naming `op` in the type error.
    pub fn from_value(op: &str, value: &Value) -> Result<Number, ErrorValue> {
        match value.resolved() {
            Value::Int(n) => Ok(Number::Int(*n)),
            Value::Float(x) => Ok(Number::Float(*x)),
            other => Err(ErrorValue::type_error(format!(
                "{op}: expected number, got {}",
                other.kind()
            ))),
        }
    }

    pub fn to_float(self) -> Float {
        match self {
            Number::Int(n) => n as Float,
            Number::Float(x) => x,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(x) => x == 0.0,
        }
    }
}

// ============================================================================
// Arithmetic Operations
// ============================================================================

fn overflow(op: &str, a: Int, b: Int) -> ErrorValue {
    ErrorValue::new(
        ErrorKind::OverflowError,
        format!("{a} {op} {b} does not fit in an Int"),
    )
}

impl Number {
    /// Addition, promoting to Float when either side is a Float
    pub fn add(self, other: Number) -> Result<Number, ErrorValue> {
        use Number::*;

        match (self, other) {
            (Int(a), Int(b)) => a.checked_add(b).map(Int).ok_or_else(|| overflow("+", a, b)),
            (a, b) => Ok(Float(a.to_float() + b.to_float())),
        }
    }

    /// Subtraction, promoting to Float when either side is a Float
    pub fn sub(self, other: Number) -> Result<Number, ErrorValue> {
        use Number::*;

        match (self, other) {
            (Int(a), Int(b)) => a.checked_sub(b).map(Int).ok_or_else(|| overflow("-", a, b)),
            (a, b) => Ok(Float(a.to_float() - b.to_float())),
        }
    }

    /// Multiplication, promoting to Float when either side is a Float
    pub fn mul(self, other: Number) -> Result<Number, ErrorValue> {
        use Number::*;

        match (self, other) {
            (Int(a), Int(b)) => a.checked_mul(b).map(Int).ok_or_else(|| overflow("*", a, b)),
            (a, b) => Ok(Float(a.to_float() * b.to_float())),
        }
    }

    /// Division. Integer division truncates toward zero; any zero divisor
    /// is an error.
    pub fn div(self, other: Number) -> Result<Number, ErrorValue> {
        use Number::*;

        if other.is_zero() {
            return Err(ErrorValue::new(
                ErrorKind::ZeroDivisionError,
                format!("{self} / {other}"),
            ));
        }
        match (self, other) {
            (Int(a), Int(b)) => a.checked_div(b).map(Int).ok_or_else(|| overflow("/", a, b)),
            (a, b) => Ok(Float(a.to_float() / b.to_float())),
        }
    }
}
