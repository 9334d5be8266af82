//! The Iris value model
//!
//! Every expression evaluates to a [`Value`]. Each variant owns its heap
//! storage outright; only [`Value::Shared`] aliases, through an `Arc`.
//! Copying is `Clone`, moving out of a place is [`Value::take`], and
//! destruction is `Drop`.

use std::fmt;
use std::sync::Arc;

use crate::dict::Dict;
use crate::error::ErrorValue;
use crate::interpreter::Context;
use crate::seq::Seq;
use crate::text::Text;

pub type Int = i64;
pub type Float = f64;

/// Signature of every native callable.
///
/// Functions receive evaluated arguments, macros receive the raw tail of
/// the call form. The context exposes the scope and the evaluator.
pub type NativeFn = fn(&[Value], &Context<'_>) -> Result<Value, ErrorValue>;

// ============================================================================
// Value
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    None,
    Int(Int),
    Float(Float),
    Text(Text),
    Seq(Seq),
    Dict(Dict),
    Callable(Callable),
    Error(ErrorValue),
    Shared(Arc<Value>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    None,
    Int,
    Float,
    Text,
    Seq,
    Dict,
    Callable,
    Error,
    Shared,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::None => "None",
            Kind::Int => "Int",
            Kind::Float => "Float",
            Kind::Text => "Text",
            Kind::Seq => "Seq",
            Kind::Dict => "Dict",
            Kind::Callable => "Callable",
            Kind::Error => "Error",
            Kind::Shared => "Shared",
        };
        write!(f, "{name}")
    }
}

impl Value {
    /// Wrap a value for shared ownership.
    pub fn shared(value: Value) -> Self {
        Value::Shared(Arc::new(value))
    }

    /// Move the value out, leaving `None` behind.
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::None => Kind::None,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Text(_) => Kind::Text,
            Value::Seq(_) => Kind::Seq,
            Value::Dict(_) => Kind::Dict,
            Value::Callable(_) => Kind::Callable,
            Value::Error(_) => Kind::Error,
            Value::Shared(_) => Kind::Shared,
        }
    }

    /// The value behind any number of `Shared` layers.
    pub fn resolved(&self) -> &Value {
        let mut current = self;
        while let Value::Shared(inner) = current {
            current = inner;
        }
        current
    }

    /// Lift an `Error` value into the `Err` channel.
    pub fn into_result(self) -> Result<Value, ErrorValue> {
        match self {
            Value::Error(err) => Err(err),
            other => Ok(other),
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self.resolved() {
            Value::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&Seq> {
        match self.resolved() {
            Value::Seq(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self.resolved() {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Per-variant well-formedness.
    pub fn is_valid(&self) -> bool {
        match self {
            Value::None | Value::Int(_) | Value::Float(_) => true,
            Value::Text(text) => text.is_valid(),
            Value::Seq(seq) => seq.is_valid(),
            Value::Dict(dict) => dict.is_valid(),
            Value::Callable(Callable::Native { .. }) => true,
            Value::Callable(Callable::Code(code)) => code.is_valid(),
            Value::Error(err) => err.message().is_none_or(Text::is_valid),
            Value::Shared(inner) => inner.is_valid(),
        }
    }

    /// Representation form: text quoted, errors as `"Kind": "message"`.
    pub fn repr(&self) -> String {
        match self {
            Value::Text(text) => format!("\"{text}\""),
            Value::Error(err) => err.repr(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Text(text) => write!(f, "{text}"),
            Value::Seq(seq) => {
                write!(f, "(")?;
                for (i, item) in seq.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item.repr())?;
                }
                write!(f, ")")
            }
            Value::Dict(dict) => write!(f, "{dict}"),
            Value::Callable(callable) => write!(f, "{callable}"),
            Value::Error(err) => write!(f, "{err}"),
            Value::Shared(inner) => write!(f, "<shared | {}>", inner.repr()),
        }
    }
}

impl From<Int> for Value {
    fn from(n: Int) -> Self {
        Value::Int(n)
    }
}

impl From<Float> for Value {
    fn from(x: Float) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(Text::from(s))
    }
}

impl From<Text> for Value {
    fn from(text: Text) -> Self {
        Value::Text(text)
    }
}

impl From<Seq> for Value {
    fn from(seq: Seq) -> Self {
        Value::Seq(seq)
    }
}

impl From<Dict> for Value {
    fn from(dict: Dict) -> Self {
        Value::Dict(dict)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(callable)
    }
}

impl From<ErrorValue> for Value {
    fn from(err: ErrorValue) -> Self {
        Value::Error(err)
    }
}

// ============================================================================
// Callables
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    /// Arguments are evaluated before the call.
    Function,
    /// Arguments are handed over unevaluated.
    Macro,
}

#[derive(Clone)]
pub enum Callable {
    Native { func: NativeFn, kind: CallKind },
    /// Lazily evaluated code, run on a zero-argument call.
    Code(Box<Seq>),
}

impl Callable {
    pub fn function(func: NativeFn) -> Self {
        Callable::Native {
            func,
            kind: CallKind::Function,
        }
    }

    pub fn macro_(func: NativeFn) -> Self {
        Callable::Native {
            func,
            kind: CallKind::Macro,
        }
    }

    pub fn code(code: Seq) -> Self {
        Callable::Code(Box::new(code))
    }

    pub fn is_macro(&self) -> bool {
        matches!(
            self,
            Callable::Native {
                kind: CallKind::Macro,
                ..
            }
        )
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Callable::Native { func: a, kind: ka },
                Callable::Native { func: b, kind: kb },
            ) => *a as usize == *b as usize && ka == kb,
            (Callable::Code(a), Callable::Code(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native { func, kind } => f
                .debug_struct("Native")
                .field("func", &(*func as usize as *const ()))
                .field("kind", kind)
                .finish(),
            Callable::Code(code) => f.debug_tuple("Code").field(code).finish(),
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native {
                kind: CallKind::Function,
                ..
            } => write!(f, "<function>"),
            Callable::Native {
                kind: CallKind::Macro,
                ..
            } => write!(f, "<macro>"),
            Callable::Code(code) => {
                write!(f, "<code {}>", Value::Seq(code.as_ref().clone()))
            }
        }
    }
}
