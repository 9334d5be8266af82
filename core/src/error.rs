//! Error values
//!
//! Script-level failures are ordinary data: an [`ErrorValue`] travels in the
//! `Err` channel of every reader, resolver and evaluator step, and can be
//! stored in a [`Value::Error`](crate::value::Value::Error).

use std::fmt;

use once_cell::sync::Lazy;

use crate::dict::Dict;
use crate::text::Text;
use crate::value::{Int, Value};

/// Categories of script errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    TypeError = 1,
    ContractViolation,
    NameError,
    /// Generic failure reported through the embedding API
    UserError,
    SyntaxError,
    OverflowError,
    UnderflowError,
    EncodingError,
    StackError,
    ZeroDivisionError,
}

const ALL_KINDS: [ErrorKind; 10] = [
    ErrorKind::TypeError,
    ErrorKind::ContractViolation,
    ErrorKind::NameError,
    ErrorKind::UserError,
    ErrorKind::SyntaxError,
    ErrorKind::OverflowError,
    ErrorKind::UnderflowError,
    ErrorKind::EncodingError,
    ErrorKind::StackError,
    ErrorKind::ZeroDivisionError,
];

static DESCRIPTIONS: Lazy<Dict> = Lazy::new(|| {
    let mut table = Dict::new();
    for kind in ALL_KINDS {
        let desc = match kind {
            ErrorKind::TypeError => "operation applied to a value of the wrong type",
            ErrorKind::ContractViolation => {
                "violation of contract between caller and callee, usually a wrong arity"
            }
            ErrorKind::NameError => "symbol resolution failed",
            ErrorKind::UserError => "unspecified error signalled through the API",
            ErrorKind::SyntaxError => "source text is not well-formed",
            ErrorKind::OverflowError => "integer literal or result above the Int range",
            ErrorKind::UnderflowError => "integer literal below the Int range",
            ErrorKind::EncodingError => "source bytes are not valid UTF-8",
            ErrorKind::StackError => "call exceeds the argument limit",
            ErrorKind::ZeroDivisionError => "division by zero",
        };
        table.insert(kind.code(), Value::from(desc));
    }
    table
});

impl ErrorKind {
    pub fn code(self) -> Int {
        self as Int
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ContractViolation => "ContractViolation",
            ErrorKind::NameError => "NameError",
            ErrorKind::UserError => "UserError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::OverflowError => "OverflowError",
            ErrorKind::UnderflowError => "UnderflowError",
            ErrorKind::EncodingError => "EncodingError",
            ErrorKind::StackError => "StackError",
            ErrorKind::ZeroDivisionError => "ZeroDivisionError",
        }
    }

    /// Human-readable description of the kind.
    pub fn description(self) -> String {
        match DESCRIPTIONS.get_view(self.code()) {
            Some(Value::Text(desc)) => desc.to_string(),
            _ => "UnknownError".to_string(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An error kind with an optional message.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorValue {
    kind: ErrorKind,
    message: Option<Text>,
}

impl ErrorValue {
    pub fn new(kind: ErrorKind, message: impl Into<Text>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    /// An error carrying only its kind.
    pub fn bare(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&Text> {
        self.message.as_ref()
    }

    pub fn type_error(msg: impl Into<Text>) -> Self {
        Self::new(ErrorKind::TypeError, msg)
    }

    pub fn contract(msg: impl Into<Text>) -> Self {
        Self::new(ErrorKind::ContractViolation, msg)
    }

    pub fn name_error(msg: impl Into<Text>) -> Self {
        Self::new(ErrorKind::NameError, msg)
    }

    pub fn syntax(msg: impl Into<Text>) -> Self {
        Self::new(ErrorKind::SyntaxError, msg)
    }

    /// `"Kind": "message"`, or `"Kind": no message`.
    pub fn repr(&self) -> String {
        match &self.message {
            Some(msg) if !msg.is_empty() => format!("\"{}\": \"{msg}\"", self.kind),
            _ => format!("\"{}\": no message", self.kind),
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) if !msg.is_empty() => write!(f, "{}: {msg}", self.kind),
            _ => write!(f, "{}: no message", self.kind),
        }
    }
}

impl std::error::Error for ErrorValue {}
